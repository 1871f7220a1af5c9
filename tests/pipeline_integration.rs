mod common;

use evaldraft::compress::compress;
use evaldraft::config::Config;
use evaldraft::draft::byte_len;
use evaldraft::pipeline::{Aggregator, DraftSource, Warning};
use evaldraft::section::{CONFLICT_LINE, Category, build_section};

use common::{config_with_phrases, full_sheet, sheet_of};

#[test]
fn test_duplicate_technical_opinions_collapse() {
    let section = build_section(
        Category::Technical,
        "기술성",
        &["기술력이 우수함", "기술력이 우수함."],
        0.8,
    );
    assert_eq!(section.display, vec!["기술력이 우수함"]);
    assert!(!section.conflict);
}

#[test]
fn test_opposing_business_opinions_conflict() {
    let agg = Aggregator::new(Config::default()).unwrap();
    let report = agg.run(&sheet_of(&[
        (Category::Business, "사업성이 우수함"),
        (Category::Business, "사업성이 미흡함"),
    ]));

    let business = &report.sections[1];
    assert_eq!(business.category, Category::Business);
    assert_eq!(business.display.len(), 2);
    assert!(business.conflict);
    assert!(business.section_text.contains(CONFLICT_LINE));
    assert!(report.has_conflict);
}

#[test]
fn test_missing_mandatory_phrase_reported() {
    let agg = Aggregator::new(config_with_phrases(&["협약 시 보완사항"])).unwrap();
    let report = agg.run(&full_sheet());

    assert!(!report.draft.is_empty());
    assert_eq!(report.missing_phrases, vec!["협약 시 보완사항"]);
}

#[test]
fn test_present_mandatory_phrase_not_reported() {
    let agg = Aggregator::new(config_with_phrases(&["평가단 승인사항", "협약 시 보완사항"]))
        .unwrap();
    let report = agg.run(&full_sheet());
    assert_eq!(report.missing_phrases, vec!["협약 시 보완사항"]);
}

#[test]
fn test_compression_prefers_keyword_sentences() {
    let keyword = "시장 반응이 긍정적임.";
    let filler = "기술 개발 일정이 타당함.";
    let mut sentences = Vec::new();
    while byte_len(&sentences.join(" ")) < 5000 {
        sentences.push(filler);
        sentences.push(keyword);
    }
    let text = sentences.join(" ");
    assert!(byte_len(&text) >= 5000);

    let out = compress(&text, 4000, &["시장"]).unwrap();
    assert!(byte_len(&out) <= 4000);

    // Every keyword sentence ranks ahead of every filler sentence.
    let parts: Vec<&str> = out.split(". ").collect();
    let first_filler = parts.iter().position(|p| p.starts_with("기술"));
    let last_keyword = parts.iter().rposition(|p| p.starts_with("시장"));
    if let (Some(f), Some(k)) = (first_filler, last_keyword) {
        assert!(k < f);
    }
    let keyword_count = parts.iter().filter(|p| p.starts_with("시장")).count();
    assert_eq!(keyword_count, sentences.len() / 2);
}

#[test]
fn test_full_sheet_draft() {
    let agg = Aggregator::new(Config::default()).unwrap();
    let report = agg.run(&full_sheet());

    let expected = "\
[기술성]
- 기술력이 우수함
- 핵심 기술의 차별성이 탁월함. 특허 확보 계획이 구체적임

[사업성]
⚠️ 위원 간 의견이 상이합니다:
- 사업성이 우수함
- 사업성이 미흡함

[연구개발비 조정]
- 연구개발비 10% 조정 필요

[기타사항]
- 평가단 승인사항 반영";

    assert_eq!(report.source, DraftSource::Lexical);
    assert_eq!(report.draft, expected);
    assert_eq!(report.byte_len, expected.len());
    assert_eq!(report.byte_limit, 4000);
    assert_eq!(
        report.warnings,
        vec![Warning::Conflict {
            category: Category::Business,
            label: "사업성".to_string(),
        }]
    );
}

#[test]
fn test_custom_labels_rendered() {
    let mut config = Config::default();
    config.labels.technical = "기술성 평가".to_string();
    let agg = Aggregator::new(config).unwrap();
    let report = agg.run(&full_sheet());
    assert!(report.draft.starts_with("[기술성 평가]\n"));
    assert_eq!(report.sections[0].label, "기술성 평가");
}

#[test]
fn test_run_is_deterministic() {
    let agg = Aggregator::new(Config::default()).unwrap();
    let first = agg.run(&full_sheet());
    for _ in 0..3 {
        assert_eq!(agg.run(&full_sheet()), first);
    }
}

#[test]
fn test_compress_on_demand_starts_from_full_draft() {
    let config = Config {
        byte_limit: 500,
        ..Default::default()
    };
    let agg = Aggregator::new(config).unwrap();
    let long = "시장 규모가 크고 성장 가능성이 높음. 매출 계획이 다소 낙관적임. ".repeat(12);
    let report = agg.run(&sheet_of(&[(Category::Other, long.as_str())]));
    assert!(report.over_budget());

    let first = agg.compress(&report).unwrap();
    let second = agg.compress(&report).unwrap();
    assert_eq!(first, second);
    assert!(first.byte_len <= 500);
    assert_eq!(first.byte_len, byte_len(&first.text));
}

#[test]
fn test_report_serializes() {
    let agg = Aggregator::new(Config::default()).unwrap();
    let report = agg.run(&full_sheet());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["source"], "lexical");
    assert_eq!(json["sections"][1]["category"], "business");
    assert_eq!(json["sections"][1]["conflict"], true);
    assert_eq!(json["warnings"][0]["kind"], "conflict");
}

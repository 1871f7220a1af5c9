#![allow(dead_code)]

use evaldraft::config::Config;
use evaldraft::section::Category;
use evaldraft::sheet::{OpinionSheet, ReviewerOpinions};

/// Build a sheet with one reviewer per entry, each filling a single category.
pub fn sheet_of(entries: &[(Category, &str)]) -> OpinionSheet {
    let reviewers = entries
        .iter()
        .map(|(category, text)| {
            let mut reviewer = ReviewerOpinions::default();
            reviewer.set(*category, *text);
            reviewer
        })
        .collect();
    OpinionSheet { reviewers }
}

/// A three-reviewer sheet covering every category.
pub fn full_sheet() -> OpinionSheet {
    OpinionSheet::from_toml(FULL_SHEET_TOML).unwrap()
}

pub const FULL_SHEET_TOML: &str = r#"
[[reviewers]]
name = "위원1"
technical = "기술력이 우수함"
business = "사업성이 우수함"
budget_adjustment = "연구개발비 10% 조정 필요"
other = "평가단 승인사항 반영"

[[reviewers]]
name = "위원2"
technical = "기술력이 우수함."
business = "사업성이 미흡함"
budget_adjustment = "연구개발비 10% 조정 필요."

[[reviewers]]
name = "위원3"
technical = "핵심 기술의 차별성이 탁월함\n특허 확보 계획이 구체적임"
other = "  "
"#;

/// Defaults with the given mandatory phrases.
pub fn config_with_phrases(phrases: &[&str]) -> Config {
    Config {
        required_phrases: phrases.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

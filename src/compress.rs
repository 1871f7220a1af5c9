use std::cmp::Reverse;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::draft::byte_len;
use crate::error::{Error, Result};

/// Marker appended when a sentence has to be cut.
pub const ELLIPSIS: &str = "…";

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Split whitespace-collapsed text after every period that precedes a space.
fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(". ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn keyword_score<S: AsRef<str>>(sentence: &str, keep_keywords: &[S]) -> usize {
    keep_keywords
        .iter()
        .map(|k| k.as_ref())
        .filter(|k| !k.is_empty() && sentence.contains(*k))
        .count()
}

/// Cut `sentence` on a char boundary so that it plus the ellipsis fits.
fn truncate_with_ellipsis(sentence: &str, byte_limit: usize) -> Result<String> {
    if byte_len(sentence) <= byte_limit {
        return Ok(sentence.to_string());
    }
    if ELLIPSIS.len() > byte_limit {
        return Err(Error::Compression(format!(
            "byte limit {byte_limit} is smaller than the {}-byte truncation marker",
            ELLIPSIS.len()
        )));
    }

    let mut cut = byte_limit - ELLIPSIS.len();
    while !sentence.is_char_boundary(cut) {
        cut -= 1;
    }
    Ok(format!("{}{ELLIPSIS}", sentence[..cut].trim_end()))
}

/// Shrink `text` to at most `byte_limit` UTF-8 bytes.
///
/// Sentences are ranked by how many `keep_keywords` they contain, then by
/// length, and taken greedily in that order; a sentence that would overflow
/// is skipped and later, shorter ones are still tried. The result is in rank
/// order, not document order. When no sentence fits, the first sentence is
/// cut and suffixed with [`ELLIPSIS`].
pub fn compress<S: AsRef<str>>(
    text: &str,
    byte_limit: usize,
    keep_keywords: &[S],
) -> Result<String> {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let collapsed = collapsed.trim();

    let mut sentences = split_sentences(collapsed);
    if sentences.is_empty() {
        sentences.push(collapsed);
    }

    let mut ranked: Vec<(usize, &str)> = sentences
        .iter()
        .map(|s| (keyword_score(s, keep_keywords), *s))
        .collect();
    ranked.sort_by_key(|(score, s)| (Reverse(*score), s.chars().count()));

    let mut kept: Vec<&str> = Vec::new();
    let mut kept_bytes = 0;
    for &(_, sentence) in &ranked {
        let next = if kept.is_empty() {
            byte_len(sentence)
        } else {
            kept_bytes + 1 + byte_len(sentence)
        };
        if next <= byte_limit {
            kept.push(sentence);
            kept_bytes = next;
        }
    }

    debug!(
        sentences = sentences.len(),
        kept = kept.len(),
        bytes = kept_bytes,
        byte_limit,
        "compressed draft"
    );

    if kept.is_empty() {
        return truncate_with_ellipsis(sentences[0], byte_limit);
    }
    Ok(kept.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_KEYWORDS: [&str; 0] = [];

    #[test]
    fn test_fits_unchanged_single_sentence() {
        assert_eq!(compress("짧은 문장", 100, &NO_KEYWORDS).unwrap(), "짧은 문장");
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(compress("", 100, &NO_KEYWORDS).unwrap(), "");
        assert_eq!(compress(" \n\t ", 100, &NO_KEYWORDS).unwrap(), "");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(compress("a  b\n\nc", 100, &NO_KEYWORDS).unwrap(), "a b c");
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(split_sentences("하나. 둘. 셋"), vec!["하나.", "둘.", "셋"]);
        assert_eq!(split_sentences("3.5% 성장. 끝."), vec!["3.5% 성장.", "끝."]);
    }

    #[test]
    fn test_reorders_shortest_first_without_keywords() {
        let text = "가장 긴 첫 번째 문장입니다. 짧은 둘째. 중간 길이 셋째 문장.";
        assert_eq!(
            compress(text, 1000, &NO_KEYWORDS).unwrap(),
            "짧은 둘째. 중간 길이 셋째 문장. 가장 긴 첫 번째 문장입니다."
        );
    }

    #[test]
    fn test_keyword_sentences_ranked_first() {
        let text = "매출 계획이 구체적임. 시장 분석 양호. 팀 구성 양호.";
        let out = compress(text, 1000, &["시장"]).unwrap();
        assert!(out.starts_with("시장 분석 양호."));
    }

    #[test]
    fn test_keyword_outranks_shorter_sentence_under_tight_limit() {
        // "aa bb." is 6 bytes, "시장 분석 aa." is 17; only one fits in 17.
        let text = "aa bb. 시장 분석 aa.";
        assert_eq!(compress(text, 17, &["시장"]).unwrap(), "시장 분석 aa.");
        assert_eq!(compress(text, 17, &NO_KEYWORDS).unwrap(), "aa bb.");
    }

    #[test]
    fn test_skips_overflowing_sentence_and_keeps_trying() {
        let text = "aaaaaaaaaaaaaaaaaaaa. bb. cccccc.";
        // Ranked by length: "bb." (3), "cccccc." (7), long (21).
        let out = compress(text, 12, &NO_KEYWORDS).unwrap();
        assert_eq!(out, "bb. cccccc.");
    }

    #[test]
    fn test_oversized_single_sentence_truncated() {
        let text = "시장".repeat(100);
        let out = compress(&text, 50, &NO_KEYWORDS).unwrap();
        assert!(out.ends_with(ELLIPSIS));
        assert!(byte_len(&out) <= 50);
        // 47 bytes available, 15 whole syllables.
        assert_eq!(out.chars().count(), 16);
    }

    #[test]
    fn test_budget_respected_for_many_limits() {
        let text = "기술 개발 역량이 우수하며 핵심 인력을 보유함. \
                    시장 진입 전략은 다소 미흡함.\n사업모델 검토가 필요함. \
                    연구개발비는 일부 조정이 필요함. 협약 시 보완사항을 이행할 것. "
            .repeat(8);
        for limit in [50, 51, 64, 99, 128, 500, 1000, 4000] {
            let out = compress(&text, limit, &["시장", "보완"]).unwrap();
            assert!(byte_len(&out) <= limit, "limit {limit}: {} bytes", byte_len(&out));
            assert!(!out.is_empty());
        }
    }

    #[test]
    fn test_limit_below_marker_is_error() {
        let err = compress("가나다라마", 2, &NO_KEYWORDS).unwrap_err();
        assert!(err.to_string().contains("truncation marker"));
    }

    #[test]
    fn test_limit_equal_to_marker_yields_marker() {
        assert_eq!(compress("가나다라마", 3, &NO_KEYWORDS).unwrap(), ELLIPSIS);
    }

    #[test]
    fn test_empty_keywords_ignored() {
        assert_eq!(keyword_score("anything", &["", "any"]), 1);
    }
}

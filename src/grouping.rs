use serde::Serialize;

use crate::normalize::normalize;
use crate::similarity::similarity;

/// Opinions judged to say the same thing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpinionGroup {
    /// Shortest text ever placed in the group; the earliest wins on ties.
    pub representative: String,
    /// Normalized members in insertion order.
    pub members: Vec<String>,
}

impl OpinionGroup {
    fn new(text: String) -> Self {
        Self {
            representative: text.clone(),
            members: vec![text],
        }
    }

    fn insert(&mut self, text: String) {
        if text.chars().count() < self.representative.chars().count() {
            self.representative = text.clone();
        }
        self.members.push(text);
    }
}

/// Cluster raw opinions into groups of similar statements.
///
/// Texts are normalized and blanks dropped. Each text is compared only with
/// the current representative of every existing group, in group order, and
/// joins the first group scoring at least `threshold`. A member can therefore
/// end up dissimilar to siblings that joined under an earlier representative.
pub fn group<S: AsRef<str>>(texts: &[S], threshold: f64) -> Vec<OpinionGroup> {
    let mut groups: Vec<OpinionGroup> = Vec::new();

    for raw in texts {
        let text = normalize(raw.as_ref());
        if text.is_empty() {
            continue;
        }

        match groups
            .iter_mut()
            .find(|g| similarity(&text, &g.representative) >= threshold)
        {
            Some(existing) => existing.insert(text),
            None => groups.push(OpinionGroup::new(text)),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let texts: [&str; 0] = [];
        assert!(group(&texts, 0.8).is_empty());
        assert!(group(&["", "  ", "\n"], 0.8).is_empty());
    }

    #[test]
    fn test_near_duplicates_merge_to_shorter() {
        let groups = group(&["기술력이 우수함.", "기술력이 우수함"], 0.8);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative, "기술력이 우수함");
        assert_eq!(groups[0].members, vec!["기술력이 우수함.", "기술력이 우수함"]);
    }

    #[test]
    fn test_dissimilar_texts_split() {
        let groups = group(&["사업성이 우수함", "사업성이 미흡함"], 0.8);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].representative, "사업성이 우수함");
        assert_eq!(groups[1].representative, "사업성이 미흡함");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let groups = group(&["매출 증가 예상", "예상 증가 매출"], 0.8);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative, "매출 증가 예상");
    }

    #[test]
    fn test_first_matching_group_wins() {
        // "a b c d" matches both earlier groups at 0.5; it joins the first.
        let groups = group(&["a b", "c d", "a b c d"], 0.5);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].members, vec!["a b", "a b c d"]);
        assert_eq!(groups[1].members, vec!["c d"]);
    }

    #[test]
    fn test_compares_against_representative_only() {
        // "a b c e f" joins via rep "a b c" (3/5 = 0.6) after the rep has
        // shrunk, even though it only shares 3 of 7 tokens with "a b c d g".
        let groups = group(&["a b c d g", "a b c", "a b c e f"], 0.6);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].representative, "a b c");
        assert!(similarity("a b c d g", "a b c e f") < 0.6);
        assert_eq!(groups[0].members.len(), 3);
    }

    #[test]
    fn test_deterministic() {
        let input = ["시장 규모 큼", "시장 규모가 큼", "기술 부족", "시장 규모 큼."];
        let first = group(&input, 0.5);
        for _ in 0..5 {
            assert_eq!(group(&input, 0.5), first);
        }
    }

    #[test]
    fn test_representative_is_minimal() {
        let input = [
            "시장 진입 전략이 구체적임",
            "시장 진입 전략 구체적",
            "시장 진입 전략이 매우 구체적임",
            "전혀 다른 의견",
        ];
        for g in group(&input, 0.3) {
            let rep_len = g.representative.chars().count();
            assert!(g.members.iter().all(|m| rep_len <= m.chars().count()));
        }
    }

    #[test]
    fn test_threshold_one_requires_identical_token_sets() {
        let groups = group(&["a b", "a b c"], 1.0);
        assert_eq!(groups.len(), 2);
    }
}

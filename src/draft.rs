use crate::section::SectionResult;

/// UTF-8 encoded length of `s`.
pub fn byte_len(s: &str) -> usize {
    s.len()
}

/// Join section blocks into the draft, in category order regardless of the
/// order they are passed in. Blank blocks are skipped.
pub fn compose(sections: &[SectionResult]) -> String {
    let mut ordered: Vec<&SectionResult> = sections.iter().collect();
    ordered.sort_by_key(|s| s.category);

    ordered
        .iter()
        .map(|s| s.section_text.as_str())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

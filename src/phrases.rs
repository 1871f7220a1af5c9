/// Required phrases that do not occur verbatim in `draft`.
///
/// Matching is an exact, case-sensitive substring test with no
/// normalization on either side. Blank phrases are ignored and the report
/// keeps the order of `required`.
pub fn missing_phrases<S: AsRef<str>>(draft: &str, required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(|p| p.as_ref())
        .filter(|p| !p.trim().is_empty())
        .filter(|p| !draft.contains(*p))
        .map(str::to_string)
        .collect()
}

use std::collections::HashSet;

use crate::normalize::tokenize;

/// Jaccard index over the token sets of `a` and `b`.
///
/// Returns `0.0` when either side has no tokens, so blank input never
/// matches anything.
pub fn similarity(a: &str, b: &str) -> f64 {
    let ta: HashSet<String> = tokenize(a).into_iter().collect();
    let tb: HashSet<String> = tokenize(b).into_iter().collect();
    if ta.is_empty() || tb.is_empty() {
        return 0.0;
    }

    let intersection = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    intersection as f64 / union as f64
}

use serde::Serialize;

use crate::normalize::normalize;

const POSITIVE_WORDS: &[&str] = &["우수", "탁월", "강점", "높다", "긍정", "양호", "적합", "우수함"];
const NEGATIVE_WORDS: &[&str] = &["어렵", "미흡", "부족", "낮다", "부정", "취약", "부적합", "문제"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Polarity {
    Pos,
    Neg,
    Neu,
}

/// Label a text by counting which lexicon words it contains.
///
/// Each lexicon word counts once when present as a substring, so "우수함"
/// scores twice on the positive side ("우수" and "우수함"). Ties are neutral.
pub fn polarity(text: &str) -> Polarity {
    let t = normalize(text);
    let pos = POSITIVE_WORDS.iter().filter(|w| t.contains(*w)).count();
    let neg = NEGATIVE_WORDS.iter().filter(|w| t.contains(*w)).count();

    if pos > neg {
        Polarity::Pos
    } else if neg > pos {
        Polarity::Neg
    } else {
        Polarity::Neu
    }
}

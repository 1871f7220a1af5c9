use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Zero-width code points that reviewers paste in from word processors.
const ZERO_WIDTH: &[char] = &['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\p{Zs}]+").expect("valid horizontal whitespace regex"));

// A run of line breaks, including the horizontal whitespace hugging them.
static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\t\p{Zs}]*(?:(?:\r\n|\r|\n)[\t\p{Zs}]*)+").expect("valid line break regex")
});

/// Canonicalize a raw opinion so that equivalent inputs compare equal.
///
/// Zero-width characters are removed before NFC composition so that a
/// zero-width joiner sitting between a base letter and its combining mark
/// cannot leave the result half-composed. Line breaks become `". "` which
/// keeps sentence boundaries visible to the compressor.
///
/// The function is deterministic and idempotent.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !ZERO_WIDTH.contains(c)).collect();
    // Line breaks alone must not survive as ".".
    if stripped.trim().is_empty() {
        return String::new();
    }

    let composed: String = stripped.nfc().collect();
    let collapsed = HORIZONTAL_WS.replace_all(&composed, " ");
    let sentences = LINE_BREAKS.replace_all(&collapsed, ". ");
    sentences.trim().to_string()
}

/// Split text into lowercase comparison tokens.
///
/// Anything other than letters, digits, `%` and whitespace acts as a
/// separator. Order follows the input; callers treat the result as a set.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '%' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().map(str::to_string).collect()
}

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::stopwords::StopwordPolicy;

/// Minimum token length in letters.
pub const MIN_TOKEN_LEN: usize = 3;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"^[a-z]{3,}$").expect("static word pattern");
}

/// Letters, digits and `_` make up a word. Combining marks and joiners do
/// not, so NFD "u\u{0308}ber" splits after the "u".
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Deduplicated tokens of one document.
pub type TokenSet = HashSet<String>;

/// Lowercase `text` and return every qualifying word, in order of appearance.
/// Repeats are kept; callers that need a set use [`token_set`].
pub fn tokenize(text: &str, stopwords: StopwordPolicy) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    // A run such as "für" or "abc123" is one word and yields nothing
    // rather than a fragment.
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !is_word_char(c))
        .filter(|w| WORD.is_match(w))
        .filter(|w| !stopwords.contains(w))
        .map(str::to_string)
        .collect()
}

pub fn token_set(text: &str, stopwords: StopwordPolicy) -> TokenSet {
    tokenize(text, stopwords).into_iter().collect()
}

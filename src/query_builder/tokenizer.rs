use once_cell::sync::Lazy;

use super::tables::PROTECTED_PHRASES;

/// Protected phrases broken into their component words, longest first,
/// so greedy matching prefers "artifact creature" over "artifact".
static PHRASE_WORDS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    let mut phrases: Vec<Vec<&str>> = PROTECTED_PHRASES
        .iter()
        .map(|p| p.split_whitespace().collect())
        .collect();
    phrases.sort_by(|a, b| b.len().cmp(&a.len()));
    phrases
});

/// Split a normalized (lower-cased, trimmed) phrase into tokens,
/// keeping multi-word domain phrases whole.
///
/// Idempotent: tokenizing the space-joined output yields the same
/// sequence, since a preserved phrase re-splits into the exact words
/// that matched it in the first place.
pub fn tokenize(input: &str) -> Vec<String> {
    let words: Vec<&str> = input.split_whitespace().collect();
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let mut matched = None;
        for phrase in PHRASE_WORDS.iter() {
            if phrase.len() > 1
                && i + phrase.len() <= words.len()
                && words[i..i + phrase.len()] == phrase[..]
            {
                matched = Some(phrase.len());
                break;
            }
        }
        match matched {
            Some(len) => {
                tokens.push(words[i..i + len].join(" "));
                i += len;
            }
            None => {
                tokens.push(words[i].to_string());
                i += 1;
            }
        }
    }

    tokens
}

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::state::{ColorSet, TypeKeyword};

/// Multi-word domain phrases the tokenizer must keep whole. Matched
/// greedily, longest first, against the word stream.
pub static PROTECTED_PHRASES: &[&str] = &[
    "+1/+1 counters",
    "+1/+1 counter",
    "artifact creature",
    "legendary creature",
    "enchantment creature",
    "tribal instant",
    "card draw",
    "mana acceleration",
    "graveyard hate",
    "dual land",
    "basic land",
    "utility land",
    "vanilla creature",
    "double-faced card",
    "double faced card",
];

pub static COLOR_WORDS: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        ("white", 'W'),
        ("blue", 'U'),
        ("black", 'B'),
        ("red", 'R'),
        ("green", 'G'),
    ])
});

pub static GUILDS: Lazy<HashMap<&'static str, ColorSet>> = Lazy::new(|| {
    [
        ("azorius", "WU"),
        ("dimir", "UB"),
        ("rakdos", "BR"),
        ("gruul", "RG"),
        ("selesnya", "GW"),
        ("orzhov", "WB"),
        ("izzet", "UR"),
        ("golgari", "BG"),
        ("boros", "RW"),
        ("simic", "GU"),
    ]
    .into_iter()
    .map(|(name, letters)| (name, ColorSet::from_letters(letters)))
    .collect()
});

pub static SHARDS: Lazy<HashMap<&'static str, ColorSet>> = Lazy::new(|| {
    [
        ("bant", "GWU"),
        ("esper", "WUB"),
        ("grixis", "UBR"),
        ("jund", "BRG"),
        ("naya", "RGW"),
    ]
    .into_iter()
    .map(|(name, letters)| (name, ColorSet::from_letters(letters)))
    .collect()
});

pub static WEDGES: Lazy<HashMap<&'static str, ColorSet>> = Lazy::new(|| {
    [
        ("abzan", "WBG"),
        ("jeskai", "URW"),
        ("sultai", "BGU"),
        ("mardu", "RWB"),
        ("temur", "GUR"),
    ]
    .into_iter()
    .map(|(name, letters)| (name, ColorSet::from_letters(letters)))
    .collect()
});

/// Phrases that flag deck-building intent. Detection is independent of
/// which color rule fires; it only decides the operator family at
/// compile time.
pub static DECK_CONTEXT_KEYWORDS: &[&str] = &[
    "for my",
    "in my",
    "my deck",
    "commander deck",
    "deck",
    "commander",
    "edh",
    "legal in",
];

/// Compound type phrases arrive from the tokenizer as single tokens and
/// map straight to an ordered type sequence, bypassing bare-word
/// detection.
pub static COMPOUND_TYPES: Lazy<HashMap<&'static str, &'static [TypeKeyword]>> = Lazy::new(|| {
    HashMap::from([
        (
            "artifact creature",
            &[TypeKeyword::Artifact, TypeKeyword::Creature][..],
        ),
        (
            "legendary creature",
            &[TypeKeyword::Legendary, TypeKeyword::Creature][..],
        ),
        (
            "enchantment creature",
            &[TypeKeyword::Enchantment, TypeKeyword::Creature][..],
        ),
        (
            "tribal instant",
            &[TypeKeyword::Tribal, TypeKeyword::Instant][..],
        ),
    ])
});

/// Formats worth recognizing as bare words. "commander" is deliberately
/// absent: bare, it is the special-form archetype; with deck phrasing
/// it is a context keyword.
pub static FORMAT_WORDS: &[&str] = &[
    "standard", "modern", "legacy", "vintage", "pioneer", "pauper",
];

/// Units that qualify a number as a mana-cost phrase.
pub static CMC_UNITS: &[&str] = &["mana", "cost", "cmc"];

/// True when `needle` occurs in `haystack` aligned on word boundaries
/// on both sides. Naive substring search is how "artifact" once matched
/// a commander named "tifa"; every phrase-level match in this module
/// family goes through here instead.
pub fn contains_word_bounded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let h: Vec<char> = haystack.chars().collect();
    let n: Vec<char> = needle.chars().collect();
    let boundary = |c: Option<&char>| match c {
        None => true,
        Some(ch) => !ch.is_alphanumeric(),
    };
    let mut start = 0;
    while start + n.len() <= h.len() {
        if h[start..start + n.len()] == n[..] {
            let before = if start == 0 { None } else { h.get(start - 1) };
            if boundary(before) && boundary(h.get(start + n.len())) {
                return true;
            }
        }
        start += 1;
    }
    false
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::commanders::CommanderLookup;

use super::state::{ColorSet, FilterState, TypeKeyword};
use super::tables::{
    contains_word_bounded, COLOR_WORDS, DECK_CONTEXT_KEYWORDS, GUILDS, SHARDS, WEDGES,
};

/// Templates for carving a deck/commander name out of the phrase, most
/// specific first. Each candidate span is tried against the resolver
/// until one resolves or all are exhausted.
static NAME_TEMPLATES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bfor my ([a-z0-9'\-][a-z0-9'\- ]*?) deck\b",
        r"\bin my ([a-z0-9'\-][a-z0-9'\- ]*?) deck\b",
        r"\b([a-z0-9'\-][a-z0-9'\- ]*?) commander\b",
        r"\bfor ([a-z0-9'\-][a-z0-9'\- ]*)$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("name template"))
    .collect()
});

/// A candidate is worth a resolver round trip only if at least one of
/// its words is not a generic attribute word. Keeps spans like "my
/// deck" or "white removal" from ever reaching the lookup, where the
/// containment fallback could misfire.
fn is_plausible_deck_name(candidate: &str) -> bool {
    candidate.split_whitespace().any(|word| {
        !COLOR_WORDS.contains_key(word)
            && TypeKeyword::base_from_word(word).is_none()
            && !matches!(
                word,
                "my" | "deck"
                    | "commander"
                    | "edh"
                    | "for"
                    | "in"
                    | "the"
                    | "a"
                    | "an"
                    | "that"
                    | "with"
                    | "and"
                    | "or"
                    | "cards"
                    | "card"
                    | "spells"
                    | "spell"
                    | "removal"
                    | "counterspell"
                    | "counterspells"
                    | "ramp"
                    | "draw"
                    | "burn"
                    | "token"
                    | "tokens"
            )
    })
}

fn candidate_spans(phrase: &str) -> Vec<String> {
    let mut spans = Vec::new();
    for template in NAME_TEMPLATES.iter() {
        for caps in template.captures_iter(phrase) {
            let span = caps[1].trim().to_string();
            if !span.is_empty() && is_plausible_deck_name(&span) && !spans.contains(&span) {
                spans.push(span);
            }
        }
    }
    spans
}

/// Color / color-identity resolution, first match wins:
/// guild → shard → wedge → named deck → individual color words.
///
/// Guild/shard/wedge names always land in `color_identity` (they name
/// decks and archetypes, not printed cards); individual colors always
/// land in `colors`. A resolved deck name overrides either and forces
/// commander context.
pub fn extract_colors(state: &mut FilterState, tokens: &[String], resolver: &dyn CommanderLookup) {
    let phrase = tokens.join(" ");

    for keyword in DECK_CONTEXT_KEYWORDS {
        if contains_word_bounded(&phrase, keyword) {
            state.commander_context = true;
            state.note("color:deck_context", *keyword);
            break;
        }
    }

    let mut named_set = None;
    for token in tokens {
        if let Some(set) = GUILDS.get(token.as_str()) {
            named_set = Some((*set, "color:guild", token.as_str()));
            break;
        }
    }
    if named_set.is_none() {
        for token in tokens {
            if let Some(set) = SHARDS.get(token.as_str()) {
                named_set = Some((*set, "color:shard", token.as_str()));
                break;
            }
            if let Some(set) = WEDGES.get(token.as_str()) {
                named_set = Some((*set, "color:wedge", token.as_str()));
                break;
            }
        }
    }

    if let Some((set, rule, matched)) = named_set {
        state.color_identity = Some(set);
        state.note(rule, matched);
    } else {
        let mut set = ColorSet::new();
        let mut words = Vec::new();
        for token in tokens {
            if let Some(letter) = COLOR_WORDS.get(token.as_str()) {
                set.insert(*letter);
                words.push(token.as_str());
            }
        }
        if !set.is_empty() {
            // Individual color words name the printed card, never a
            // deck identity.
            state.colors = Some(set);
            state.commander_context = false;
            state.note("color:words", words.join(" "));
        }
    }

    // A named deck overrides whatever matched above and always means
    // deck-legality semantics.
    for span in candidate_spans(&phrase) {
        match resolver.lookup(&span) {
            Some(identity) => {
                state.color_identity = Some(ColorSet::from_letters(&identity));
                state.colors = None;
                state.commander_context = true;
                state.note("color:named_deck", span);
                return;
            }
            None => {
                state.note("color:named_deck_miss", span);
            }
        }
    }
}

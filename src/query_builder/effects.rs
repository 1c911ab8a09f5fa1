use once_cell::sync::Lazy;
use regex::Regex;

use super::state::{FilterState, TypeClass, TypeKeyword};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Pump,
    Counterspell,
    GraveyardHate,
    Removal,
    Ramp,
    Draw,
    Token,
    Burn,
}

struct EffectRule {
    kind: EffectKind,
    name: &'static str,
    pattern: &'static Lazy<Regex>,
}

macro_rules! effect_regex {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).expect("effect pattern"));
    };
}

effect_regex!(PUMP_RE, r"\+1/\+1|\badds? [a-z ]*counters?\b");
effect_regex!(COUNTERSPELL_RE, r"\bcounterspells?\b|\bcounter\b");
effect_regex!(
    GRAVEYARD_RE,
    r"graveyard hate|exile [a-z ]*graveyards?\b|graveyards? [a-z ]*exile|graveyard removal"
);
effect_regex!(REMOVAL_RE, r"\bremoval\b|\bdestroys?\b|\bremoves?\b");
effect_regex!(RAMP_RE, r"\bramp\b|mana acceleration|\bsearch\b[a-z ]*\bland");
effect_regex!(DRAW_RE, r"\bdraws?\b|card draw");
effect_regex!(TOKEN_RE, r"\btokens?\b|\bcreates?\b[a-z ]*\bcreature");
effect_regex!(BURN_RE, r"\bburn\b|\bdamage\b|\bdeals?\b[a-z ]*\bdamage");

/// Negation idioms that must suppress the bare-"counter" pattern.
effect_regex!(COUNTER_NEGATION_RE, r"cannot be countered|can't be countered");
effect_regex!(COUNTERSPELL_WORD_RE, r"\bcounterspells?\b");

/// Ordered effect table: first match wins, one effect per phrase.
/// Specific phrasings come before generic ones (pump before the bare
/// "counter" word, graveyard hate before generic removal) so that
/// "+1/+1 counter" and "graveyard removal" never misclassify.
static EFFECT_TABLE: &[EffectRule] = &[
    EffectRule { kind: EffectKind::Pump, name: "pump", pattern: &PUMP_RE },
    EffectRule { kind: EffectKind::Counterspell, name: "counterspell", pattern: &COUNTERSPELL_RE },
    EffectRule { kind: EffectKind::GraveyardHate, name: "graveyard_hate", pattern: &GRAVEYARD_RE },
    EffectRule { kind: EffectKind::Removal, name: "removal", pattern: &REMOVAL_RE },
    EffectRule { kind: EffectKind::Ramp, name: "ramp", pattern: &RAMP_RE },
    EffectRule { kind: EffectKind::Draw, name: "draw", pattern: &DRAW_RE },
    EffectRule { kind: EffectKind::Token, name: "token", pattern: &TOKEN_RE },
    EffectRule { kind: EffectKind::Burn, name: "burn", pattern: &BURN_RE },
];

const REMOVAL_VERBS: &str = r#"o:destroy or o:"put into" or o:exile"#;
const REMOVAL_GENERIC_TARGETS: &str =
    "o:creature or o:artifact or o:enchantment or o:planeswalker or o:permanent";

fn predicate_for(kind: EffectKind) -> String {
    match kind {
        EffectKind::Pump => r#"o:"+1/+1 counter""#.to_string(),
        EffectKind::Counterspell => r#"o:"counter target""#.to_string(),
        EffectKind::GraveyardHate => {
            r#"o:exile and (o:graveyard or o:"from graveyard" or o:"all graveyards")"#.to_string()
        }
        EffectKind::Removal => format!("({REMOVAL_VERBS}) and ({REMOVAL_GENERIC_TARGETS})"),
        EffectKind::Ramp => r#"(o:"search your library" o:land) or (o:"add" o:"mana")"#.to_string(),
        EffectKind::Draw => r#"o:"draw" o:"card""#.to_string(),
        EffectKind::Token => r#"o:"create" o:"token""#.to_string(),
        EffectKind::Burn => r#"o:"deal" o:"damage""#.to_string(),
    }
}

fn detect(phrase: &str) -> Option<&'static EffectRule> {
    for rule in EFFECT_TABLE {
        if !rule.pattern.is_match(phrase) {
            continue;
        }
        if rule.kind == EffectKind::Counterspell
            && !COUNTERSPELL_WORD_RE.is_match(phrase)
            && COUNTER_NEGATION_RE.is_match(phrase)
        {
            // Bare "counter" inside "cannot be countered" is not a
            // counterspell request; the explicit word always is.
            continue;
        }
        return Some(rule);
    }
    None
}

/// Modifier/transform stage: detect one functional effect and reconcile
/// it with whatever type was extracted earlier. The reconciliation is a
/// decision table keyed by (effect, type class).
pub fn apply_effect(state: &mut FilterState, phrase: &str) {
    let rule = match detect(phrase) {
        Some(rule) => rule,
        None => return,
    };
    state.effects.push(rule.name);
    state.note("effect", rule.name);

    match rule.kind {
        // Counterspells are definitionally instants; whatever type was
        // mentioned, the spell we search for is the instant.
        EffectKind::Counterspell => {
            state.types = vec![TypeKeyword::Instant];
            state.oracle_predicates.push(predicate_for(rule.kind));
        }

        // Spell types stay structured (the removal spell itself is an
        // instant); target and ambiguous types are folded into the
        // oracle predicate as the thing being destroyed. Types that can
        // be permanents accept "permanent" as alternative wording.
        EffectKind::Removal => {
            let (spell_types, target_types): (Vec<TypeKeyword>, Vec<TypeKeyword>) = state
                .types
                .iter()
                .copied()
                .partition(|t| t.class() == TypeClass::PureSpell);

            if target_types.is_empty() {
                state.oracle_predicates.push(predicate_for(rule.kind));
            } else {
                let mut clauses = vec![format!("({REMOVAL_VERBS})")];
                for target in &target_types {
                    if target.has_permanent_alternative() {
                        clauses.push(format!("(o:{} or o:permanent)", target.as_str()));
                    } else {
                        clauses.push(format!("o:{}", target.as_str()));
                    }
                    state.note("effect:removal_target", target.as_str());
                }
                state.oracle_predicates.push(clauses.join(" and "));
            }
            state.types = spell_types;
        }

        // The search engine needs the type and the counter text
        // co-located in one free-text fragment, so the structured type
        // moves out of the type field.
        EffectKind::Pump => {
            if state.types.is_empty() {
                state.oracle_predicates.push(predicate_for(rule.kind));
            } else {
                let mut fragment: Vec<String> = state
                    .types
                    .iter()
                    .map(|t| format!("type:{}", t.as_str()))
                    .collect();
                fragment.push(predicate_for(rule.kind));
                state.oracle = Some(fragment.join(" "));
                state.types.clear();
            }
        }

        // Everything else keeps the type filter as-is and attaches the
        // effect predicate alongside.
        _ => {
            state.oracle_predicates.push(predicate_for(rule.kind));
        }
    }
}

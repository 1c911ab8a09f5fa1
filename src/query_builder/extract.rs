use once_cell::sync::Lazy;
use regex::Regex;

use super::state::{CmcFilter, CmcOp, FilterState, TypeKeyword};
use super::tables::{CMC_UNITS, COMPOUND_TYPES, FORMAT_WORDS};

fn is_unit(token: Option<&String>) -> bool {
    token.map(|t| CMC_UNITS.contains(&t.as_str())).unwrap_or(false)
}

fn set_cmc(state: &mut FilterState, op: CmcOp, value: u32, rule: &str, span: &str) {
    state.cmc = Some(CmcFilter { op, value });
    state.note(rule, span);
}

/// Mana-cost extraction, one rule ladder in fixed priority order:
/// ranges, then qualitative words, then exact amounts, then "zero",
/// then variable-cost spells. The first rule that matches wins; at most
/// one cmc constraint ever lands in the state.
pub fn extract_mana_cost(state: &mut FilterState, tokens: &[String]) {
    // "3+ mana", "N or less/fewer mana", "N or more mana"
    for (i, token) in tokens.iter().enumerate() {
        if let Some(digits) = token.strip_suffix('+') {
            if let Ok(value) = digits.parse::<u32>() {
                if is_unit(tokens.get(i + 1)) {
                    set_cmc(state, CmcOp::Ge, value, "cmc:range", format!("{token} {}", tokens[i + 1]).as_str());
                    return;
                }
            }
        }
        if let Ok(value) = token.parse::<u32>() {
            if tokens.get(i + 1).map(String::as_str) == Some("or")
                && matches!(tokens.get(i + 2).map(String::as_str), Some("less") | Some("fewer"))
                && is_unit(tokens.get(i + 3))
            {
                set_cmc(state, CmcOp::Le, value, "cmc:range", tokens[i..=i + 3].join(" ").as_str());
                return;
            }
            if tokens.get(i + 1).map(String::as_str) == Some("or")
                && tokens.get(i + 2).map(String::as_str) == Some("more")
                && is_unit(tokens.get(i + 3))
            {
                set_cmc(state, CmcOp::Ge, value, "cmc:range", tokens[i..=i + 3].join(" ").as_str());
                return;
            }
        }
    }

    // "high cmc", "cheap cost": the qualitative word needs a unit right
    // after it, or a bare "cmc" somewhere in the phrase. A unit that
    // belongs to a number ("expensive 3 mana") stays with the number.
    let has_cmc_anywhere = tokens.iter().any(|t| t == "cmc");
    for (i, token) in tokens.iter().enumerate() {
        match token.as_str() {
            "high" | "expensive" if is_unit(tokens.get(i + 1)) || has_cmc_anywhere => {
                set_cmc(state, CmcOp::Ge, 6, "cmc:qualitative", token.as_str());
                return;
            }
            "low" | "cheap" if is_unit(tokens.get(i + 1)) || has_cmc_anywhere => {
                set_cmc(state, CmcOp::Le, 2, "cmc:qualitative", token.as_str());
                return;
            }
            _ => {}
        }
    }

    // "2 mana"
    for (i, token) in tokens.iter().enumerate() {
        if let Ok(value) = token.parse::<u32>() {
            if is_unit(tokens.get(i + 1)) {
                set_cmc(state, CmcOp::Eq, value, "cmc:exact", format!("{token} {}", tokens[i + 1]).as_str());
                return;
            }
        }
    }

    // "zero mana"
    for (i, token) in tokens.iter().enumerate() {
        if token == "zero" && is_unit(tokens.get(i + 1)) {
            set_cmc(state, CmcOp::Eq, 0, "cmc:zero", "zero");
            return;
        }
    }

    // "x cost": variable-cost spells always cost at least one
    for (i, token) in tokens.iter().enumerate() {
        if token == "x" && matches!(tokens.get(i + 1).map(String::as_str), Some("cost") | Some("mana")) {
            set_cmc(state, CmcOp::Ge, 1, "cmc:variable", "x");
            return;
        }
    }
}

/// `P/T` standing alone between whitespace (or string boundaries), so
/// "+1/+1" never reads as a 1/1 body. Runs over the raw input to keep
/// the separator intact.
static PT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)(\d{1,2})/(\d{1,2})(?:\s|$)").expect("P/T regex"));

/// Power and toughness are always set together, never one without the
/// other.
pub fn extract_power_toughness(state: &mut FilterState, raw_input: &str) {
    if let Some(caps) = PT_RE.captures(raw_input) {
        let power: u32 = caps[1].parse().expect("digits");
        let toughness: u32 = caps[2].parse().expect("digits");
        state.power = Some(power);
        state.toughness = Some(toughness);
        state.note("power_toughness", &caps[0]);
    }
}

/// Card-type extraction. Compound phrases (already single tokens) win
/// outright; otherwise every base type word found is kept and the set
/// is canonically ordered.
pub fn extract_types(state: &mut FilterState, tokens: &[String]) {
    for token in tokens {
        if let Some(sequence) = COMPOUND_TYPES.get(token.as_str()) {
            state.types.extend_from_slice(sequence);
            state.note("type:compound", token.as_str());
            state.canonicalize_types();
            return;
        }
    }

    for token in tokens {
        if let Some(keyword) = TypeKeyword::base_from_word(token) {
            state.types.push(keyword);
            state.note("type:base", token.as_str());
        }
    }
    state.canonicalize_types();
}

pub fn extract_format(state: &mut FilterState, tokens: &[String]) {
    for token in tokens {
        if FORMAT_WORDS.contains(&token.as_str()) {
            state.format = Some(token.clone());
            state.note("format", token.as_str());
            return;
        }
        if token == "edh" {
            state.format = Some("commander".to_string());
            state.note("format", "edh");
            return;
        }
    }
}

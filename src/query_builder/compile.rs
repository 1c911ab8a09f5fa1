use super::state::FilterState;

/// Physical-product-only anchor every compiled query starts with.
pub const SCOPE_CLAUSE: &str = "game:paper";

/// Serialize the final filter state into the target query string.
///
/// Operator families matter here: cmc compiles with its comparison
/// operator, card color with the exact-match `color=`, deck identity
/// with the subset `color<=`, and text fields with `:`. Getting one of
/// these wrong silently returns the wrong cards, so the choices are
/// pinned down by tests rather than left to the call sites.
pub fn compile(state: &FilterState, normalized_input: &str) -> String {
    let mut parts = vec![SCOPE_CLAUSE.to_string()];

    if let Some(fragment) = &state.oracle {
        parts.push(fragment.clone());
    }

    if let Some(cmc) = &state.cmc {
        parts.push(format!("cmc{}{}", cmc.op.as_str(), cmc.value));
    }

    if let (Some(power), Some(toughness)) = (state.power, state.toughness) {
        parts.push(format!("pow={power}"));
        parts.push(format!("tou={toughness}"));
    }

    for keyword in &state.types {
        parts.push(format!("type:{}", keyword.as_str()));
    }

    if let Some(colors) = &state.colors {
        if !colors.is_empty() {
            parts.push(format!("color={}", colors.letters()));
        }
    }

    if let Some(identity) = &state.color_identity {
        if !identity.is_empty() {
            if state.commander_context {
                // Deck legality: the card must fit within the deck's
                // identity, not equal it.
                parts.push(format!("color<={}", identity.letters()));
            } else {
                // Guild/shard/wedge names denote an exact color pair or
                // triple.
                parts.push(format!("color={}", identity.letters()));
            }
        }
    }

    if let Some(format) = &state.format {
        parts.push(format!("legal:{format}"));
    }

    for predicate in &state.oracle_predicates {
        parts.push(format!("({predicate})"));
    }

    // Nothing discriminating survived extraction: fall back to a name
    // search over the raw phrase instead of a query that matches every
    // card in the catalog.
    if !state.has_discriminating_clause() {
        let name = normalized_input.replace('"', "");
        if !name.is_empty() {
            parts.push(format!("name:\"{name}\""));
        }
    }

    parts.join(" ")
}

mod colors;
mod compile;
mod effects;
mod extract;
mod special;
mod state;
pub(crate) mod tables;
mod tokenizer;

use serde::Serialize;

use crate::commanders::CommanderLookup;

pub use state::{CmcOp, FilterState, TypeKeyword};
pub use tokenizer::tokenize;

/// Result of running one phrase through the pipeline: the compiled
/// query string plus the filter state it was compiled from (served back
/// to clients for display and debugging).
#[derive(Debug, Clone, Serialize)]
pub struct Compiled {
    pub query: String,
    pub filters: FilterState,
}

/// Run the full pipeline over one phrase.
///
/// Stages, in order: special forms (whole-phrase archetypes short-
/// circuit everything; land subtypes keep only the color extractor),
/// then the attribute extractors, the color/identity resolution with
/// the named-deck resolver, and the effect modifier stage. The state is
/// then frozen and compiled.
///
/// Pure and synchronous: the resolver is the only external call, and it
/// answers from an in-memory snapshot. Unrecognized input never fails;
/// it compiles to the documented safe default.
pub fn compile_prompt(prompt: &str, resolver: &dyn CommanderLookup) -> Compiled {
    let state = build_state(prompt, resolver);
    let normalized = prompt.trim().to_lowercase();
    let query = compile::compile(&state, &normalized);
    Compiled { query, filters: state }
}

fn build_state(prompt: &str, resolver: &dyn CommanderLookup) -> FilterState {
    let normalized = prompt.trim().to_lowercase();
    let tokens = tokenizer::tokenize(&normalized);
    let phrase = tokens.join(" ");
    let mut state = FilterState::new();

    log::debug!("tokens: {tokens:?}");

    if let Some(form) = special::match_archetype(&phrase) {
        state.oracle = Some(form.fragment.to_string());
        state.note("special:archetype", form.name);
        return state;
    }

    if let Some(form) = special::match_land_form(&phrase) {
        state.oracle = Some(form.fragment.to_string());
        state.note("special:land", form.name);
        // Land vernacular still composes with a color clause
        // ("azorius fetchland"); everything else is superseded by the
        // fragment.
        colors::extract_colors(&mut state, &tokens, resolver);
        return state;
    }

    extract::extract_mana_cost(&mut state, &tokens);
    extract::extract_power_toughness(&mut state, prompt);
    extract::extract_types(&mut state, &tokens);
    extract::extract_format(&mut state, &tokens);
    colors::extract_colors(&mut state, &tokens, resolver);
    effects::apply_effect(&mut state, &phrase);
    state.canonicalize_types();

    state
}

use super::tables::contains_word_bounded;

/// Vernacular land subtypes mapped to ready-made query fragments. These
/// match anywhere inside the phrase; a color clause may still be
/// appended by the color extractor.
static LAND_FORMS: &[(&str, &str)] = &[
    ("fetchland", r#"o:"search your library" o:"shuffle" type:land"#),
    ("shockland", r#"o:"as ~ enters" o:"2 damage" type:land"#),
    ("triome", r#"o:cycling o:"enters tapped" type:land"#),
    ("dual land", r#"o:"{" o:"}" type:land"#),
    ("basic land", "type:basic type:land"),
    ("utility land", "type:land -type:basic"),
];

/// Vernacular archetypes that stand for a whole query on their own.
/// These only fire when the normalized phrase IS the vernacular; inside
/// a longer phrase the same words keep their ordinary meaning
/// ("commander" flags deck context, for one).
static ARCHETYPES: &[(&str, &str)] = &[
    ("commander", "is:commander"),
    ("vanilla creature", "is:vanilla type:creature"),
    ("double-faced card", "is:dfc"),
    ("double faced card", "is:dfc"),
];

pub struct SpecialMatch {
    pub name: &'static str,
    pub fragment: &'static str,
}

pub fn match_archetype(phrase: &str) -> Option<SpecialMatch> {
    let trimmed = phrase.trim();
    for (name, fragment) in ARCHETYPES {
        if trimmed == *name || trimmed == format!("{name}s") {
            return Some(SpecialMatch { name, fragment });
        }
    }
    None
}

pub fn match_land_form(phrase: &str) -> Option<SpecialMatch> {
    for (name, fragment) in LAND_FORMS {
        let plural = format!("{name}s");
        if contains_word_bounded(phrase, name) || contains_word_bounded(phrase, &plural) {
            return Some(SpecialMatch { name, fragment });
        }
    }
    None
}

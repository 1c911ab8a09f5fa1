//! End-to-end checks over the whole prompt → query pipeline, using an
//! isolated in-memory commander snapshot per test.

use crate::commanders::CommanderDb;
use crate::query_builder::compile_prompt;

fn snapshot() -> CommanderDb {
    CommanderDb::from_entries(&[
        ("atraxa", "WUBG"),
        ("chulane", "GWU"),
        ("korvold", "BRG"),
        ("omnath", "WUBRG"),
        ("niv-mizzet", "UR"),
        ("edgar markov", "RWB"),
        ("meren", "BG"),
    ])
}

#[test]
fn test_sample_queries_compile_to_expected_clauses() {
    let db = snapshot();
    // (prompt, must contain, must not contain)
    let samples: &[(&str, &[&str], &[&str])] = &[
        ("1 mana counterspell", &["cmc=1", r#"o:"counter target""#, "type:instant"], &[]),
        ("2 cmc rakdos instant", &["cmc=2", "color=BR", "type:instant"], &["color<="]),
        (
            "blue artifact removal",
            &["color=U", "o:destroy", "(o:artifact or o:permanent)"],
            &["type:artifact", "color<="],
        ),
        ("removal for atraxa", &["color<=WUBG", "o:permanent"], &["color="]),
        ("counterspell for my chulane deck", &["color<=WUG", "type:instant"], &[]),
        ("ramp for omnath", &["color<=WUBRG", r#"o:"search your library""#], &[]),
        ("draw for niv-mizzet", &["color<=UR", r#"o:"draw""#], &[]),
        ("fetchland", &[r#"o:"search your library""#, "type:land"], &["name:"]),
        ("azorius counterspell", &["color=WU"], &["color<="]),
        ("6+ mana creature", &["cmc>=6", "type:creature"], &[]),
        ("x cost spell", &["cmc>=1"], &[]),
    ];

    for (prompt, wanted, unwanted) in samples {
        let compiled = compile_prompt(prompt, &db);
        for needle in *wanted {
            assert!(
                compiled.query.contains(needle),
                "{prompt:?} compiled to {:?}, missing {needle:?}",
                compiled.query
            );
        }
        for needle in *unwanted {
            assert!(
                !compiled.query.contains(needle),
                "{prompt:?} compiled to {:?}, must not contain {needle:?}",
                compiled.query
            );
        }
        assert!(compiled.query.starts_with("game:paper"), "{prompt:?}");
    }
}

#[test]
fn test_multi_word_commander_resolves() {
    let db = snapshot();
    let compiled = compile_prompt("removal for my edgar markov deck", &db);
    assert!(compiled.query.contains("color<=WBR"));
    assert!(compiled.filters.commander_context);
}

#[test]
fn test_every_prompt_compiles_without_panicking() {
    let db = snapshot();
    // junk, near-miss and adversarial inputs must all reach a query
    for prompt in [
        "",
        "    ",
        "qwerty asdf",
        "+1/+1",
        "3/3",
        "for my deck",
        "or less mana",
        "99999999999999999999 mana",
        "\"quoted\" name",
        "cannot be countered",
    ] {
        let compiled = compile_prompt(prompt, &db);
        assert!(compiled.query.starts_with("game:paper"), "{prompt:?} → {:?}", compiled.query);
        assert!(!compiled.query.is_empty());
    }
}

#[test]
fn test_filters_survive_serialization() {
    let db = snapshot();
    let compiled = compile_prompt("2 cmc rakdos instant", &db);
    let json = serde_json::to_value(&compiled).expect("serializable");
    assert_eq!(json["query"], "game:paper cmc=2 type:instant color=BR");
    assert_eq!(json["filters"]["cmc"]["op"], "=");
    assert_eq!(json["filters"]["color_identity"], "BR");
}

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::thread::sleep;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::query_builder::tables::contains_word_bounded;

const SEARCH_QUERY: &str = "legal:commander type:legendary type:creature";
const MAX_PAGES: u32 = 100;
const MAX_CONSECUTIVE_FAILURES: u32 = 3;
const PAGE_DELAY: Duration = Duration::from_millis(100);

/// The one contract the core depends on: a case-insensitive name →
/// color-identity lookup. Not-found is the only failure mode; a
/// resolver that is still loading answers not-found rather than block.
pub trait CommanderLookup {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Resolver that knows nothing. Used where deck resolution is
/// deliberately disabled.
pub struct NoCommanders;

impl CommanderLookup for NoCommanders {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

/// In-memory snapshot of commander names and their color identities.
/// Populated once (from the remote catalog or the static fallback) and
/// read-only afterwards.
#[derive(Debug, Default)]
pub struct CommanderDb {
    commanders: HashMap<String, String>,
    loaded: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogCard {
    name: String,
    #[serde(default)]
    color_identity: Vec<String>,
    #[serde(default)]
    promo: bool,
    #[serde(default)]
    lang: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    data: Vec<CatalogCard>,
    #[serde(default)]
    has_more: bool,
}

/// Multi-word commander names that must not be reduced to their first
/// word.
static MULTI_WORD_NAMES: &[&str] = &[
    "edgar markov",
    "the ur-dragon",
    "sliver overlord",
    "sliver queen",
    "child of alara",
    "xiahou dun",
    "elesh norn",
    "niv-mizzet",
];

/// Popular commanders used when the live snapshot is unavailable.
static FALLBACK_COMMANDERS: &[(&str, &str)] = &[
    ("kenrith", "WUBRG"),
    ("golos", "WUBRG"),
    ("the ur-dragon", "WUBRG"),
    ("jodah", "WUBRG"),
    ("sliver overlord", "WUBRG"),
    ("sliver queen", "WUBRG"),
    ("child of alara", "WUBRG"),
    ("progenitus", "WUBRG"),
    ("omnath", "WUBRG"),
    ("atraxa", "WUBG"),
    ("breya", "WUBR"),
    ("yidris", "UBRG"),
    ("chulane", "GWU"),
    ("korvold", "BRG"),
    ("edgar markov", "RWB"),
    ("alesha", "RWB"),
    ("muldrotha", "UBG"),
    ("oloro", "WUB"),
    ("zur", "WUB"),
    ("nekusar", "UBR"),
    ("marath", "RGW"),
    ("derevi", "GWU"),
    ("meren", "BG"),
    ("niv-mizzet", "UR"),
    ("rhys", "GW"),
    ("teysa", "WB"),
    ("karlov", "WB"),
    ("talrand", "U"),
    ("baral", "U"),
    ("krenko", "R"),
    ("purphoros", "R"),
    ("azusa", "G"),
    ("selvala", "G"),
    ("meria", "RG"),
    ("sheoldred", "B"),
    ("gonti", "B"),
    ("avacyn", "W"),
    ("thalia", "W"),
    ("kozilek", ""),
    ("ulamog", ""),
    ("karn", ""),
];

impl CommanderDb {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot seeded with the static fallback table.
    pub fn with_fallback() -> Self {
        let commanders = FALLBACK_COMMANDERS
            .iter()
            .map(|(name, identity)| (name.to_string(), identity.to_string()))
            .collect();
        Self { commanders, loaded: true }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.commanders.len()
    }

    #[cfg(test)]
    pub fn from_entries(entries: &[(&str, &str)]) -> Self {
        let commanders = entries
            .iter()
            .map(|(name, identity)| (name.to_string(), identity.to_string()))
            .collect();
        Self { commanders, loaded: true }
    }

    /// Populate the snapshot from the remote catalog: one paginated
    /// search, bounded pages, bounded consecutive failures.
    pub fn load_from_scryfall(base_url: &str, timeout: Duration) -> Result<Self> {
        let started = Instant::now();
        let client = reqwest::blocking::Client::builder()
            .user_agent(crate::scryfall::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building http client")?;

        let url = format!("{}/cards/search", base_url.trim_end_matches('/'));
        let mut raw: Vec<CatalogCard> = Vec::new();
        let mut page: u32 = 1;
        let mut consecutive_failures: u32 = 0;

        while page <= MAX_PAGES {
            if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                bail!("giving up after {consecutive_failures} consecutive failed pages");
            }

            let page_str = page.to_string();
            let response = client
                .get(&url)
                .query(&[
                    ("q", SEARCH_QUERY),
                    ("page", page_str.as_str()),
                    ("order", "name"),
                ])
                .send();

            let response = match response {
                Ok(r) => r,
                Err(err) => {
                    log::warn!("commander page {page} failed: {err}");
                    consecutive_failures += 1;
                    sleep(PAGE_DELAY * 5);
                    continue;
                }
            };

            if !response.status().is_success() {
                log::warn!("commander page {page} returned {}", response.status());
                consecutive_failures += 1;
                page += 1;
                sleep(PAGE_DELAY * 5);
                continue;
            }

            let body: CatalogPage = response.json().context("decoding commander page")?;
            consecutive_failures = 0;
            raw.extend(body.data);

            if !body.has_more {
                break;
            }
            page += 1;
            sleep(PAGE_DELAY);
        }

        let commanders = reduce_to_canonical(raw);
        log::info!(
            "loaded {} commanders in {:.2}s",
            commanders.len(),
            started.elapsed().as_secs_f64()
        );

        Ok(Self { commanders, loaded: true })
    }

    /// Exact match first, then word-boundary containment in either
    /// direction (so "my atraxa" still resolves). Plain substring
    /// containment is off the table: it once made "artifact" resolve to
    /// a commander named "tifa".
    pub fn get(&self, name: &str) -> Option<&str> {
        if !self.loaded {
            return None;
        }
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(identity) = self.commanders.get(&needle) {
            return Some(identity);
        }
        self.commanders
            .iter()
            .find(|(key, _)| {
                contains_word_bounded(&needle, key) || contains_word_bounded(key, &needle)
            })
            .map(|(_, identity)| identity.as_str())
    }
}

impl CommanderLookup for CommanderDb {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(|identity| identity.to_string())
    }
}

/// Shared handle for the daemon: the loader thread swaps the snapshot
/// in behind the lock, lookups use try_read so a busy lock degrades to
/// not-found instead of blocking the pipeline.
#[derive(Clone)]
pub struct SharedCommanderDb(pub Arc<RwLock<CommanderDb>>);

impl SharedCommanderDb {
    pub fn new(db: CommanderDb) -> Self {
        Self(Arc::new(RwLock::new(db)))
    }
}

impl CommanderLookup for SharedCommanderDb {
    fn lookup(&self, name: &str) -> Option<String> {
        let guard = self.0.try_read().ok()?;
        guard.get(name).map(|identity| identity.to_string())
    }
}

/// Reduce raw printings to one canonical entry per base name.
fn reduce_to_canonical(raw: Vec<CatalogCard>) -> HashMap<String, String> {
    let mut groups: HashMap<String, Vec<CatalogCard>> = HashMap::new();
    for card in raw {
        groups.entry(base_name(&card.name)).or_default().push(card);
    }

    groups
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, mut variants)| {
            variants.sort_by(|a, b| variant_score(b).total_cmp(&variant_score(a)));
            let canonical = &variants[0];
            (key, canonical.color_identity.concat())
        })
        .collect()
}

/// "Atraxa, Praetors' Voice" → "atraxa"; "The Ur-Dragon" keeps its
/// article; the multi-word allowlist keeps names like "edgar markov"
/// whole.
fn base_name(full_name: &str) -> String {
    let before_comma = full_name.split(',').next().unwrap_or("").trim();
    let lowered = before_comma.to_lowercase();

    if lowered.starts_with("the ") {
        return lowered;
    }
    for multi in MULTI_WORD_NAMES {
        if contains_word_bounded(&lowered, multi) {
            return multi.to_string();
        }
    }
    lowered.split_whitespace().next().unwrap_or("").to_string()
}

/// Prefer non-double-faced, non-promo, English, shorter names when
/// several printings share a base name.
fn variant_score(card: &CatalogCard) -> f64 {
    let mut score = 0.0;
    if !card.name.contains("//") {
        score += 10.0;
    }
    if !card.promo {
        score += 3.0;
    }
    if card.lang.as_deref().unwrap_or("en") == "en" {
        score += 2.0;
    }
    score - card.name.len() as f64 * 0.01
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, identity: &[&str]) -> CatalogCard {
        CatalogCard {
            name: name.to_string(),
            color_identity: identity.iter().map(|s| s.to_string()).collect(),
            promo: false,
            lang: Some("en".to_string()),
        }
    }

    #[test]
    fn test_base_name_reduction() {
        assert_eq!(base_name("Atraxa, Praetors' Voice"), "atraxa");
        assert_eq!(base_name("Chulane, Teller of Tales"), "chulane");
        assert_eq!(base_name("The Ur-Dragon"), "the ur-dragon");
        assert_eq!(base_name("Edgar Markov"), "edgar markov");
    }

    #[test]
    fn test_canonical_prefers_plain_printing() {
        let raw = vec![
            card("Atraxa, Praetors' Voice", &["W", "U", "B", "G"]),
            CatalogCard {
                name: "Atraxa, Praetors' Voice // Atraxa, Praetors' Voice".to_string(),
                color_identity: vec!["W".into(), "U".into(), "B".into(), "G".into()],
                promo: true,
                lang: Some("en".to_string()),
            },
        ];
        let reduced = reduce_to_canonical(raw);
        assert_eq!(reduced.len(), 1);
        assert_eq!(reduced["atraxa"], "WUBG");
    }

    #[test]
    fn test_lookup_exact_and_contained() {
        let db = CommanderDb::from_entries(&[("atraxa", "WUBG"), ("chulane", "GWU")]);
        assert_eq!(db.get("atraxa"), Some("WUBG"));
        assert_eq!(db.get("Atraxa"), Some("WUBG"));
        assert_eq!(db.get("my atraxa"), Some("WUBG"));
        assert_eq!(db.get("nothing here"), None);
    }

    #[test]
    fn test_lookup_rejects_inner_substrings() {
        // "tifa" is buried inside "artifact" with no word boundary;
        // this exact pairing was a production defect once.
        let db = CommanderDb::from_entries(&[("tifa", "G")]);
        assert_eq!(db.get("artifact"), None);
        assert_eq!(db.get("tifa"), Some("G"));

        let db = CommanderDb::from_entries(&[("enchantress", "GW")]);
        assert_eq!(db.get("enchantment"), None);
    }

    #[test]
    fn test_unloaded_db_answers_not_found() {
        let db = CommanderDb::empty();
        assert_eq!(db.get("atraxa"), None);
    }

    #[test]
    fn test_fallback_table_loads() {
        let db = CommanderDb::with_fallback();
        assert!(db.is_loaded());
        assert_eq!(db.get("atraxa"), Some("WUBG"));
        assert_eq!(db.get("the ur-dragon"), Some("WUBRG"));
    }
}

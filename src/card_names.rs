use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Snapshot of the full card-name catalog, used for autocomplete.
/// Loaded once at startup; an unloaded cache answers with no matches.
#[derive(Debug, Default)]
pub struct CardNamesCache {
    names: Vec<String>,
    loaded: bool,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(default)]
    data: Vec<String>,
}

impl CardNamesCache {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[cfg(test)]
    pub fn from_names(names: &[&str]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            loaded: true,
        }
    }

    pub fn load_from_scryfall(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(crate::scryfall::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("building http client")?;

        let url = format!("{}/catalog/card-names", base_url.trim_end_matches('/'));
        let catalog: Catalog = client
            .get(&url)
            .send()
            .context("fetching card-name catalog")?
            .error_for_status()
            .context("card-name catalog status")?
            .json()
            .context("decoding card-name catalog")?;

        log::info!("loaded {} card names", catalog.data.len());
        Ok(Self { names: catalog.data, loaded: true })
    }

    /// Case-insensitive prefix search, first `limit` hits in catalog
    /// order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<String> {
        if !self.loaded || query.is_empty() {
            return Vec::new();
        }
        let query = query.to_lowercase();
        self.names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&query))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn is_exact_name(&self, query: &str) -> bool {
        self.loaded && self.names.iter().any(|name| name == query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_search() {
        let cache =
            CardNamesCache::from_names(&["Counterspell", "Countersquall", "Abrupt Decay"]);
        assert_eq!(
            cache.search("counter", 10),
            vec!["Counterspell".to_string(), "Countersquall".to_string()]
        );
        assert_eq!(cache.search("counter", 1).len(), 1);
        assert!(cache.search("xyz", 10).is_empty());
        assert!(cache.search("", 10).is_empty());
    }

    #[test]
    fn test_exact_name() {
        let cache = CardNamesCache::from_names(&["Counterspell"]);
        assert!(cache.is_exact_name("Counterspell"));
        assert!(!cache.is_exact_name("counterspell"));
    }

    #[test]
    fn test_unloaded_cache_is_silent() {
        let cache = CardNamesCache::empty();
        assert!(cache.search("counter", 10).is_empty());
        assert!(!cache.is_exact_name("Counterspell"));
    }
}

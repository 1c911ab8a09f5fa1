use std::thread::sleep;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

pub const USER_AGENT: &str = concat!("mtgq/", env!("CARGO_PKG_VERSION"));

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

/// The slice of a card object we care about when presenting results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mana_cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_line: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oracle_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_identity: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scryfall_uri: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<Card>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cards: Option<u64>,
}

/// Blocking client that executes a compiled query against the remote
/// search endpoint. One bounded retry loop per call; a 404 is the
/// engine's "no cards matched" answer, not an error.
#[derive(Debug, Clone)]
pub struct SearchClient {
    base_url: String,
    timeout: Duration,
}

impl SearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn search(&self, query: &str, page: u32) -> Result<SearchPage> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .context("building http client")?;

        let url = format!("{}/cards/search", self.base_url);
        let page = page.max(1);

        for attempt in 1..=MAX_RETRIES {
            if attempt > 1 {
                log::debug!("search retry {attempt} for {query:?}");
                sleep(RETRY_DELAY);
            }

            let page_str = page.to_string();
            let response = match client
                .get(&url)
                .query(&[("q", query), ("page", page_str.as_str())])
                .send()
            {
                Ok(r) => r,
                Err(err) => {
                    log::warn!("search request failed: {err}");
                    continue;
                }
            };

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(SearchPage::default());
            }
            if !status.is_success() {
                log::warn!("search returned {status} for {query:?}");
                continue;
            }

            return response.json().context("decoding search response");
        }

        bail!("search failed after {MAX_RETRIES} attempts: {query:?}");
    }
}

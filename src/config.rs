use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_SCRYFALL_BASE_URL: &str = "https://api.scryfall.com";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_scryfall_base_url() -> String {
    DEFAULT_SCRYFALL_BASE_URL.to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the card-search engine.
    #[serde(default = "default_scryfall_base_url")]
    pub scryfall_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Address the daemon binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Populate the commander snapshot from the network at daemon
    /// startup. When off, the static fallback table is used.
    #[serde(default = "default_true")]
    pub load_commanders: bool,

    /// Populate the card-name autocomplete cache at daemon startup.
    #[serde(default = "default_true")]
    pub load_card_names: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scryfall_base_url: default_scryfall_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            listen_addr: default_listen_addr(),
            load_commanders: true,
            load_card_names: true,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }
        url::Url::parse(&self.scryfall_base_url)
            .with_context(|| format!("scryfall_base_url is not a url: {}", self.scryfall_base_url))?;
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            bail!("listen_addr is not a socket address: {}", self.listen_addr);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn default_dir() -> PathBuf {
        match homedir::my_home() {
            Ok(Some(home)) => home.join(".config").join("mtgq"),
            _ => PathBuf::from("."),
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_with(&Self::default_dir())
    }

    /// Load config.yaml from `base_path`, creating it with defaults on
    /// first run and re-saving when the schema gained fields.
    pub fn load_with(base_path: &Path) -> Result<Self> {
        let path = base_path.join("config.yaml");

        if !path.exists() {
            fs::create_dir_all(base_path)
                .with_context(|| format!("creating {}", base_path.display()))?;
            let default = Self::default();
            fs::write(&path, serde_yml::to_string(&default)?)
                .with_context(|| format!("writing {}", path.display()))?;
            return Ok(default);
        }

        let config_str =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;
        config.validate()?;

        // resave in case the config schema needs an upgrade
        let resaved = serde_yml::to_string(&config)?;
        if config_str != resaved {
            fs::write(&path, resaved).with_context(|| format!("writing {}", path.display()))?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_default_on_first_load() {
        let tmp = tempfile::tempdir().expect("temp dir");
        let config = Config::load_with(tmp.path()).expect("load");
        assert_eq!(config.scryfall_base_url, DEFAULT_SCRYFALL_BASE_URL);
        assert!(tmp.path().join("config.yaml").exists());

        // second load reads the file we just wrote
        let again = Config::load_with(tmp.path()).expect("reload");
        assert_eq!(again.listen_addr, config.listen_addr);
    }

    #[test]
    fn test_rejects_bad_values() {
        let tmp = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            tmp.path().join("config.yaml"),
            "scryfall_base_url: not a url\n",
        )
        .expect("write");
        assert!(Config::load_with(tmp.path()).is_err());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let tmp = tempfile::tempdir().expect("temp dir");
        std::fs::write(tmp.path().join("config.yaml"), "load_commanders: false\n")
            .expect("write");
        let config = Config::load_with(tmp.path()).expect("load");
        assert!(!config.load_commanders);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }
}

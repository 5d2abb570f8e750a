//! Portfolio ledger and market data configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Where the ledger lives and how market prices are fetched and cached.
#[derive(Debug, Clone, Deserialize)]
pub struct PortfolioConfig {
    /// Enable the portfolio commands.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Candidate ledger locations, searched in order.
    #[serde(default = "default_ledger_paths")]
    pub ledger_paths: Vec<PathBuf>,
    /// Write a demo ledger when none of the candidates exists.
    #[serde(default = "default_true")]
    pub create_sample: bool,
    /// Directory holding the market price cache.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// History range requested from the provider (e.g. "1y").
    #[serde(default = "default_period")]
    pub period: String,
    /// Bar interval requested from the provider (e.g. "1d").
    #[serde(default = "default_interval")]
    pub interval: String,
    /// Age after which the price cache is ignored.
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,
    /// Pause between consecutive provider requests (milliseconds).
    #[serde(default = "default_fetch_pause_ms")]
    pub fetch_pause_ms: u64,
    /// Total expense ratio (percent per year) for securities that omit one.
    #[serde(default = "default_ter")]
    pub default_ter: f64,
}

const fn default_true() -> bool {
    true
}

fn default_ledger_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from("portafoglio_data.json"),
        PathBuf::from("/app/data/portafoglio_data.json"),
        PathBuf::from("data/portafoglio_data.json"),
    ]
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_period() -> String {
    "1y".into()
}

fn default_interval() -> String {
    "1d".into()
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_fetch_pause_ms() -> u64 {
    100
}

const fn default_ter() -> f64 {
    0.10
}

impl PortfolioConfig {
    /// Ledger search order, with `QRFOLIO_LEDGER` (if set) tried first.
    #[must_use]
    pub fn ledger_search_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::with_capacity(self.ledger_paths.len() + 1);
        if let Ok(extra) = std::env::var("QRFOLIO_LEDGER") {
            if !extra.trim().is_empty() {
                paths.push(PathBuf::from(extra.trim()));
            }
        }
        paths.extend(self.ledger_paths.iter().cloned());
        paths
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            ledger_paths: default_ledger_paths(),
            create_sample: default_true(),
            cache_dir: default_cache_dir(),
            period: default_period(),
            interval: default_interval(),
            cache_ttl_hours: default_cache_ttl_hours(),
            fetch_pause_ms: default_fetch_pause_ms(),
            default_ter: default_ter(),
        }
    }
}

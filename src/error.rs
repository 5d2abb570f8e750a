use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors raised while locating or reading the transaction ledger.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("no ledger file found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to parse ledger {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ledger {path} is unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ledger has no securities or no operations")]
    Empty,
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("price provider {provider} failed for {ticker}: {message}")]
    Provider {
        provider: &'static str,
        ticker: String,
        message: String,
    },

    #[error("no price data for {0}")]
    NoData(String),

    #[error("price cache error: {0}")]
    Cache(String),
}

/// Image rendering errors.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Qr(String),

    #[error("chart drawing failed: {0}")]
    Chart(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("{0}")]
    NoData(&'static str),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid link: {0}")]
    InvalidLink(String),
}

pub type Result<T> = std::result::Result<T, Error>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

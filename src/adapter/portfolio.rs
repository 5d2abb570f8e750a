//! Portfolio snapshots read from the ledger file and the market cache.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::adapter::market::MarketData;
use crate::config::PortfolioConfig;
use crate::domain::Ledger;
use crate::error::{Error, LedgerError, Result};
use crate::port::{PortfolioSnapshot, PortfolioSource};

/// [`PortfolioSource`] backed by the JSON ledger and [`MarketData`].
pub struct LedgerPortfolio {
    ledger_paths: Vec<PathBuf>,
    create_sample: bool,
    market: MarketData,
}

impl LedgerPortfolio {
    #[must_use]
    pub fn new(config: &PortfolioConfig, market: MarketData) -> Self {
        Self {
            ledger_paths: config.ledger_search_paths(),
            create_sample: config.create_sample,
            market,
        }
    }

    /// Load the ledger, rejecting one with nothing to value.
    pub fn ledger(&self) -> Result<Ledger> {
        load_ledger(&self.ledger_paths, self.create_sample)
    }
}

fn load_ledger(paths: &[PathBuf], create_sample: bool) -> Result<Ledger> {
    let ledger = Ledger::load_from(paths, create_sample)?;
    if ledger.is_empty() {
        return Err(LedgerError::Empty.into());
    }
    Ok(ledger)
}

#[async_trait]
impl PortfolioSource for LedgerPortfolio {
    async fn snapshot(&self) -> Result<PortfolioSnapshot> {
        let paths = self.ledger_paths.clone();
        let create_sample = self.create_sample;
        let ledger = tokio::task::spawn_blocking(move || load_ledger(&paths, create_sample))
            .await
            .map_err(|e| Error::Io(io::Error::other(e)))??;
        let prices = self.market.prices(&ledger.tickers()).await;
        Ok(PortfolioSnapshot { ledger, prices })
    }
}

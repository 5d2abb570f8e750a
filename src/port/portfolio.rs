//! Portfolio data port.

use async_trait::async_trait;

use crate::domain::{Ledger, PriceTable};
use crate::error::Result;

/// Ledger together with the price history of its securities.
#[derive(Debug, Clone, Default)]
pub struct PortfolioSnapshot {
    pub ledger: Ledger,
    pub prices: PriceTable,
}

/// Loads the data every portfolio command works on.
///
/// Called once per command so edits to the ledger file are picked up
/// without restarting the bot.
#[async_trait]
pub trait PortfolioSource: Send + Sync {
    async fn snapshot(&self) -> Result<PortfolioSnapshot>;
}

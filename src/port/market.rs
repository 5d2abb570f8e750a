//! Market data port.

use async_trait::async_trait;

use crate::domain::PriceSeries;
use crate::error::MarketError;

/// Source of historical daily closes.
///
/// `period` and `interval` use the provider range notation (`"1y"`, `"1d"`).
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Provider name for logs and errors.
    fn name(&self) -> &'static str;

    /// Fetch the closing prices of `ticker` over `period`.
    async fn fetch_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<PriceSeries, MarketError>;
}

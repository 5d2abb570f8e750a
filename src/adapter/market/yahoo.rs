//! Yahoo Finance price provider.

use async_trait::async_trait;
use chrono::DateTime;
use tracing::debug;
use yahoo_finance_api::YahooConnector;

use crate::domain::{PricePoint, PriceSeries};
use crate::error::MarketError;
use crate::port::PriceProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Daily closes from Yahoo Finance's public chart endpoint.
pub struct YahooProvider {
    connector: YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketError> {
        let connector = YahooConnector::new().map_err(|e| MarketError::Provider {
            provider: PROVIDER,
            ticker: String::new(),
            message: format!("failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: &str,
        interval: &str,
    ) -> Result<PriceSeries, MarketError> {
        let provider_err = |message: String| MarketError::Provider {
            provider: PROVIDER,
            ticker: ticker.to_string(),
            message,
        };

        let response = self
            .connector
            .get_quote_range(ticker, interval, period)
            .await
            .map_err(|e| provider_err(format!("request failed: {e}")))?;
        let quotes = response
            .quotes()
            .map_err(|e| provider_err(format!("malformed quotes: {e}")))?;

        let series = PriceSeries::new(quotes.iter().filter_map(|q| {
            let date = DateTime::from_timestamp(q.timestamp as i64, 0)?.date_naive();
            Some(PricePoint::new(date, q.close))
        }));
        debug!(ticker, points = series.len(), "Fetched price history");

        if series.is_empty() {
            return Err(MarketError::NoData(ticker.to_string()));
        }
        Ok(series)
    }
}

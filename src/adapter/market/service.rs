//! Cache-aware price retrieval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::config::PortfolioConfig;
use crate::domain::{PriceSeries, PriceTable};
use crate::port::PriceProvider;

use super::PriceCache;

/// Serves price histories from the cache, fetching only what is missing.
pub struct MarketData {
    provider: Arc<dyn PriceProvider>,
    cache: PriceCache,
    period: String,
    interval: String,
    fetch_pause: Duration,
    /// Serializes refreshes so concurrent commands do not fetch twice.
    refresh: Mutex<()>,
}

impl MarketData {
    #[must_use]
    pub fn new(provider: Arc<dyn PriceProvider>, config: &PortfolioConfig) -> Self {
        let ttl_hours = i64::try_from(config.cache_ttl_hours).unwrap_or(i64::MAX / 3600);
        Self {
            provider,
            cache: PriceCache::new(
                &config.cache_dir,
                &config.period,
                &config.interval,
                chrono::Duration::hours(ttl_hours),
            ),
            period: config.period.clone(),
            interval: config.interval.clone(),
            fetch_pause: Duration::from_millis(config.fetch_pause_ms),
            refresh: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    /// Price history for every ticker.
    ///
    /// A fresh cache is reused and topped up with the tickers it lacks; a
    /// stale or missing one triggers a full refetch. Tickers the provider
    /// cannot serve come back as empty series.
    pub async fn prices(&self, tickers: &[String]) -> PriceTable {
        let _guard = self.refresh.lock().await;

        match self.load_cache().await {
            Some(mut table) => {
                let missing: Vec<String> = tickers
                    .iter()
                    .filter(|t| !table.contains_key(t.as_str()))
                    .cloned()
                    .collect();
                if missing.is_empty() {
                    info!(tickers = table.len(), "Prices served from cache");
                    return table;
                }

                info!(missing = missing.len(), "Fetching tickers missing from cache");
                table.extend(self.fetch_all(&missing).await);
                self.persist(&table).await;
                table
            }
            None => {
                info!(
                    tickers = tickers.len(),
                    provider = self.provider.name(),
                    "Fetching market data"
                );
                let table = self.fetch_all(tickers).await;
                self.persist(&table).await;
                table
            }
        }
    }

    async fn fetch_all(&self, tickers: &[String]) -> PriceTable {
        let mut table = PriceTable::with_capacity(tickers.len());
        for (i, ticker) in tickers.iter().enumerate() {
            if i > 0 && !self.fetch_pause.is_zero() {
                tokio::time::sleep(self.fetch_pause).await;
            }
            let series = match self
                .provider
                .fetch_history(ticker, &self.period, &self.interval)
                .await
            {
                Ok(series) => series,
                Err(e) => {
                    error!(ticker = %ticker, error = %e, "Price fetch failed");
                    PriceSeries::default()
                }
            };
            table.insert(ticker.clone(), series);
        }
        table
    }

    async fn load_cache(&self) -> Option<PriceTable> {
        let cache = self.cache.clone();
        match tokio::task::spawn_blocking(move || cache.load(Utc::now())).await {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "Price cache read task failed");
                None
            }
        }
    }

    async fn persist(&self, table: &PriceTable) {
        let cache = self.cache.clone();
        let table = table.clone();
        let saved = tokio::task::spawn_blocking(move || cache.save(&table, Utc::now())).await;
        match saved {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to save price cache"),
            Err(e) => warn!(error = %e, "Price cache write task failed"),
        }
    }
}

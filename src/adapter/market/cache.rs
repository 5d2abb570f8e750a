//! On-disk cache of price histories, one file per period and interval.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{PricePoint, PriceSeries, PriceTable};
use crate::error::MarketError;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    timestamp: DateTime<Utc>,
    #[serde(alias = "periodo")]
    period: String,
    #[serde(alias = "granularita")]
    interval: String,
    #[serde(alias = "dati")]
    data: BTreeMap<String, CachedSeries>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CachedSeries {
    index: Vec<NaiveDate>,
    close: Vec<f64>,
}

impl From<&PriceSeries> for CachedSeries {
    fn from(series: &PriceSeries) -> Self {
        let (index, close) = series.points().iter().map(|p| (p.date, p.close)).unzip();
        Self { index, close }
    }
}

impl From<CachedSeries> for PriceSeries {
    fn from(cached: CachedSeries) -> Self {
        PriceSeries::new(
            cached
                .index
                .into_iter()
                .zip(cached.close)
                .map(|(date, close)| PricePoint::new(date, close)),
        )
    }
}

/// Price cache file `market_cache_{period}_{interval}.json`.
#[derive(Debug, Clone)]
pub struct PriceCache {
    path: PathBuf,
    period: String,
    interval: String,
    ttl: Duration,
}

impl PriceCache {
    #[must_use]
    pub fn new(dir: &Path, period: &str, interval: &str, ttl: Duration) -> Self {
        Self {
            path: dir.join(Self::file_name(period, interval)),
            period: period.to_string(),
            interval: interval.to_string(),
            ttl,
        }
    }

    #[must_use]
    pub fn file_name(period: &str, interval: &str) -> String {
        format!("market_cache_{period}_{interval}.json")
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached prices, or `None` when the file is missing, unreadable or
    /// older than the TTL.
    #[must_use]
    pub fn load(&self, now: DateTime<Utc>) -> Option<PriceTable> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "No price cache");
            return None;
        }

        let file = match fs::read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<CacheFile>(&s).map_err(|e| e.to_string()))
        {
            Ok(file) => file,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable price cache");
                return None;
            }
        };

        let age = now - file.timestamp;
        if age > self.ttl {
            debug!(age_hours = age.num_hours(), "Price cache expired");
            return None;
        }

        Some(
            file.data
                .into_iter()
                .map(|(ticker, cached)| (ticker, PriceSeries::from(cached)))
                .collect(),
        )
    }

    /// Persist every non-empty series, stamped with `now`.
    pub fn save(&self, prices: &PriceTable, now: DateTime<Utc>) -> Result<(), MarketError> {
        let file = CacheFile {
            timestamp: now,
            period: self.period.clone(),
            interval: self.interval.clone(),
            data: prices
                .iter()
                .filter(|(_, series)| !series.is_empty())
                .map(|(ticker, series)| (ticker.clone(), CachedSeries::from(series)))
                .collect(),
        };

        let json =
            serde_json::to_string_pretty(&file).map_err(|e| MarketError::Cache(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| MarketError::Cache(e.to_string()))?;
        }
        fs::write(&self.path, json).map_err(|e| MarketError::Cache(e.to_string()))?;
        debug!(path = %self.path.display(), tickers = file.data.len(), "Price cache saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn table() -> PriceTable {
        let mut t = PriceTable::new();
        t.insert(
            "AAA".into(),
            PriceSeries::new(vec![
                PricePoint::new(d(2024, 1, 2), 10.0),
                PricePoint::new(d(2024, 1, 3), 10.5),
            ]),
        );
        t.insert("EMPTY".into(), PriceSeries::default());
        t
    }

    #[test]
    fn file_name_includes_period_and_interval() {
        let dir = tempdir().unwrap();
        let cache = PriceCache::new(dir.path(), "1y", "1d", Duration::hours(24));
        assert_eq!(cache.path(), dir.path().join("market_cache_1y_1d.json"));
    }

    #[test]
    fn save_then_load_skips_empty_series() {
        let dir = tempdir().unwrap();
        let cache = PriceCache::new(dir.path(), "1y", "1d", Duration::hours(24));
        let now = Utc::now();
        cache.save(&table(), now).unwrap();

        let loaded = cache.load(now + Duration::hours(1)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["AAA"], table()["AAA"]);
    }

    #[test]
    fn expired_cache_is_ignored() {
        let dir = tempdir().unwrap();
        let cache = PriceCache::new(dir.path(), "1y", "1d", Duration::hours(24));
        let now = Utc::now();
        cache.save(&table(), now).unwrap();
        assert!(cache.load(now + Duration::hours(25)).is_none());
    }

    #[test]
    fn corrupt_or_missing_cache_is_ignored() {
        let dir = tempdir().unwrap();
        let cache = PriceCache::new(dir.path(), "1y", "1d", Duration::hours(24));
        assert!(cache.load(Utc::now()).is_none());

        fs::write(cache.path(), "not json").unwrap();
        assert!(cache.load(Utc::now()).is_none());
    }

    #[test]
    fn reads_legacy_field_names() {
        let dir = tempdir().unwrap();
        let cache = PriceCache::new(dir.path(), "1y", "1d", Duration::hours(24));
        let now = Utc::now();
        let json = format!(
            r#"{{"timestamp": "{}", "periodo": "1y", "granularita": "1d",
                "dati": {{"X.MI": {{"index": ["2024-05-01"], "close": [3.5]}}}}}}"#,
            now.to_rfc3339()
        );
        fs::write(cache.path(), json).unwrap();

        let loaded = cache.load(now).unwrap();
        assert_eq!(loaded["X.MI"].last().unwrap().close, 3.5);
    }
}

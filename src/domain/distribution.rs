//! Geographic and market-type breakdown of the current portfolio.

use std::collections::HashMap;

use super::ledger::{Ledger, Side};
use super::price::PriceTable;

/// Buckets smaller than this share are merged into [`OTHER_BUCKET`].
pub const MIN_BUCKET_SHARE: f64 = 0.01;

pub const OTHER_BUCKET: &str = "Other";

/// Net position valued at the latest market close.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPosition {
    pub ticker: String,
    pub quantity: f64,
    /// Latest close, 0 when no price is known.
    pub price: f64,
    pub value: f64,
}

/// Net quantity per ticker (buys minus sells), keeping positive positions only.
#[must_use]
pub fn market_positions(ledger: &Ledger, prices: &PriceTable) -> Vec<MarketPosition> {
    let mut order: Vec<&str> = Vec::new();
    let mut quantities: HashMap<&str, f64> = HashMap::new();

    for op in &ledger.operations {
        let entry = quantities.entry(op.ticker.as_str()).or_insert_with(|| {
            order.push(op.ticker.as_str());
            0.0
        });
        match op.side {
            Side::Buy => *entry += op.quantity,
            Side::Sell => *entry -= op.quantity,
        }
    }

    order
        .into_iter()
        .filter_map(|ticker| {
            let quantity = quantities[ticker];
            if quantity <= 0.0 {
                return None;
            }
            let price = prices
                .get(ticker)
                .and_then(|s| s.last())
                .map_or(0.0, |p| p.close);
            Some(MarketPosition {
                ticker: ticker.to_string(),
                quantity,
                price,
                value: quantity * price,
            })
        })
        .collect()
}

/// Weighted shares (0..=1) of the portfolio per label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    /// `(label, share)` in order of first appearance.
    pub buckets: Vec<(String, f64)>,
    /// Market value the shares refer to.
    pub total_value: f64,
}

impl Distribution {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Share of a label, if present.
    #[must_use]
    pub fn share(&self, label: &str) -> Option<f64> {
        self.buckets
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, s)| *s)
    }

    fn add(&mut self, label: &str, share: f64) {
        match self.buckets.iter_mut().find(|(l, _)| l == label) {
            Some((_, s)) => *s += share,
            None => self.buckets.push((label.to_string(), share)),
        }
    }

    /// Merge buckets below `threshold` into a single [`OTHER_BUCKET`].
    #[must_use]
    pub fn with_small_buckets_merged(self, threshold: f64) -> Self {
        let mut merged = Self {
            buckets: Vec::with_capacity(self.buckets.len()),
            total_value: self.total_value,
        };
        let mut other = 0.0;
        for (label, share) in self.buckets {
            if share >= threshold {
                merged.add(&label, share);
            } else {
                other += share;
            }
        }
        if other > 0.0 {
            merged.add(OTHER_BUCKET, other);
        }
        merged
    }
}

/// Country breakdown, with buckets under 1% merged into "Other".
#[must_use]
pub fn geographic(ledger: &Ledger, prices: &PriceTable) -> Distribution {
    weighted(ledger, prices, |security| {
        security
            .geographic_distribution
            .iter()
            .map(|w| (w.country.as_str(), w.percentage))
            .collect()
    })
    .with_small_buckets_merged(MIN_BUCKET_SHARE)
}

/// Market-type breakdown (equity, bonds, ...).
#[must_use]
pub fn market_types(ledger: &Ledger, prices: &PriceTable) -> Distribution {
    weighted(ledger, prices, |security| {
        security
            .market_types
            .iter()
            .map(|w| (w.kind.as_str(), w.percentage))
            .collect()
    })
}

fn weighted<F>(ledger: &Ledger, prices: &PriceTable, weights: F) -> Distribution
where
    F: for<'a> Fn(&'a super::ledger::Security) -> Vec<(&'a str, f64)>,
{
    let positions = market_positions(ledger, prices);
    let total_value: f64 = positions.iter().map(|p| p.value).sum();

    let mut distribution = Distribution {
        buckets: Vec::new(),
        total_value,
    };
    if total_value <= 0.0 {
        return distribution;
    }

    for security in &ledger.securities {
        let Some(position) = positions.iter().find(|p| p.ticker == security.ticker) else {
            continue;
        };
        let weight = position.value / total_value;
        for (label, percentage) in weights(security) {
            distribution.add(label, weight * percentage / 100.0);
        }
    }
    distribution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{CountryWeight, MarketTypeWeight, Operation, Security};
    use crate::domain::price::{PricePoint, PriceSeries};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn security(ticker: &str, countries: &[(&str, f64)], kinds: &[(&str, f64)]) -> Security {
        Security {
            name: ticker.into(),
            isin: None,
            ticker: ticker.into(),
            ter: None,
            link: None,
            geographic_distribution: countries
                .iter()
                .map(|(c, p)| CountryWeight {
                    country: (*c).into(),
                    percentage: *p,
                })
                .collect(),
            market_types: kinds
                .iter()
                .map(|(k, p)| MarketTypeWeight {
                    kind: (*k).into(),
                    percentage: *p,
                })
                .collect(),
        }
    }

    fn buy(ticker: &str, quantity: f64) -> Operation {
        Operation {
            date: d(2024, 1, 2),
            quantity,
            side: Side::Buy,
            ticker: ticker.into(),
            traded_amount: None,
        }
    }

    fn table() -> PriceTable {
        let mut t = PriceTable::new();
        t.insert(
            "EQ".into(),
            PriceSeries::new(vec![PricePoint::new(d(2024, 1, 2), 30.0)]),
        );
        t.insert(
            "BD".into(),
            PriceSeries::new(vec![PricePoint::new(d(2024, 1, 2), 10.0)]),
        );
        t
    }

    fn ledger() -> Ledger {
        Ledger {
            securities: vec![
                security(
                    "EQ",
                    &[("USA", 60.0), ("Japan", 39.5), ("Peru", 0.5)],
                    &[("Equity", 100.0)],
                ),
                security("BD", &[("Italy", 100.0)], &[("Bonds", 100.0)]),
            ],
            operations: vec![buy("EQ", 1.0), buy("BD", 7.0)],
        }
    }

    #[test]
    fn positions_net_out_sells() {
        let mut ledger = ledger();
        ledger.operations.push(Operation {
            side: Side::Sell,
            ..buy("BD", 7.0)
        });
        let positions = market_positions(&ledger, &table());
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].ticker, "EQ");
        assert_eq!(positions[0].value, 30.0);
    }

    #[test]
    fn position_without_price_is_worth_zero() {
        let mut ledger = ledger();
        ledger.operations.push(buy("NOPRICE", 3.0));
        let positions = market_positions(&ledger, &table());
        let orphan = positions.iter().find(|p| p.ticker == "NOPRICE").unwrap();
        assert_eq!(orphan.value, 0.0);
    }

    #[test]
    fn market_types_are_value_weighted() {
        let dist = market_types(&ledger(), &table());
        assert_eq!(dist.total_value, 100.0);
        assert!((dist.share("Equity").unwrap() - 0.3).abs() < 1e-9);
        assert!((dist.share("Bonds").unwrap() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn small_countries_merge_into_other() {
        let dist = geographic(&ledger(), &table());
        // Peru: 0.3 * 0.5% = 0.15% of the portfolio.
        assert!(dist.share("Peru").is_none());
        assert!((dist.share(OTHER_BUCKET).unwrap() - 0.0015).abs() < 1e-9);
        assert!((dist.share("Italy").unwrap() - 0.7).abs() < 1e-9);

        let total: f64 = dist.buckets.iter().map(|(_, s)| s).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn missing_metadata_yields_empty_distribution() {
        let mut ledger = ledger();
        for security in &mut ledger.securities {
            security.geographic_distribution.clear();
        }
        assert!(geographic(&ledger, &table()).is_empty());
    }

    #[test]
    fn zero_value_portfolio_is_empty() {
        let dist = market_types(&ledger(), &PriceTable::new());
        assert!(dist.is_empty());
        assert_eq!(dist.total_value, 0.0);
    }
}

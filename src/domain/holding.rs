//! Holdings, cost basis and returns computed from the ledger.
//!
//! Every buy opens a lot priced at the market close nearest to the trade
//! date; sells consume lots oldest-first (FIFO). Returns are measured
//! against the cost of the lots still open.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::ledger::{Ledger, Operation, Side};
use super::price::PriceTable;

/// Minimum holding period, in days, before CAGR is reported.
pub const CAGR_MIN_DAYS: i64 = 30;

const DAYS_PER_YEAR: f64 = 365.25;

/// An open purchase lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lot {
    /// Date of the price used as cost (nearest market day to the trade).
    pub date: NaiveDate,
    pub quantity: f64,
    pub unit_cost: f64,
}

/// Open lots per ticker, in order of first appearance in the ledger.
#[derive(Debug, Clone, Default)]
pub struct LotBook {
    order: Vec<String>,
    lots: HashMap<String, Vec<Lot>>,
}

impl LotBook {
    /// Replay operations dated on or before `cutoff` (all when `None`).
    ///
    /// Operations are applied in date order; tickers without any price data
    /// are skipped.
    #[must_use]
    pub fn replay(operations: &[Operation], prices: &PriceTable, cutoff: Option<NaiveDate>) -> Self {
        let mut ordered: Vec<&Operation> = operations
            .iter()
            .filter(|op| cutoff.map_or(true, |c| op.date <= c))
            .collect();
        ordered.sort_by_key(|op| op.date);

        let mut book = Self::default();
        for op in ordered {
            let Some(series) = prices.get(&op.ticker).filter(|s| !s.is_empty()) else {
                debug!(ticker = %op.ticker, "No price data, skipping operation");
                continue;
            };
            let Some(point) = series.nearest(op.date) else {
                warn!(ticker = %op.ticker, date = %op.date, "No price near operation date");
                continue;
            };

            match op.side {
                Side::Buy => book.buy(&op.ticker, Lot {
                    date: point.date,
                    quantity: op.quantity,
                    unit_cost: point.close,
                }),
                Side::Sell => book.sell(&op.ticker, op.quantity),
            }
        }
        book
    }

    fn entry(&mut self, ticker: &str) -> &mut Vec<Lot> {
        if !self.lots.contains_key(ticker) {
            self.order.push(ticker.to_string());
        }
        self.lots.entry(ticker.to_string()).or_default()
    }

    fn buy(&mut self, ticker: &str, lot: Lot) {
        self.entry(ticker).push(lot);
    }

    fn sell(&mut self, ticker: &str, quantity: f64) {
        let lots = self.entry(ticker);
        let mut remaining = quantity;
        while remaining > 0.0 {
            let Some(front) = lots.first_mut() else {
                warn!(ticker, unmatched = remaining, "Sell exceeds open quantity");
                break;
            };
            if front.quantity <= remaining {
                remaining -= front.quantity;
                lots.remove(0);
            } else {
                front.quantity -= remaining;
                remaining = 0.0;
            }
        }
    }

    /// Open lots for a ticker.
    #[must_use]
    pub fn lots(&self, ticker: &str) -> &[Lot] {
        self.lots
            .get(ticker)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Tickers with at least one open lot, in ledger order.
    pub fn open_tickers(&self) -> impl Iterator<Item = (&str, &[Lot])> {
        self.order.iter().filter_map(|ticker| {
            self.lots
                .get(ticker)
                .filter(|lots| !lots.is_empty())
                .map(|lots| (ticker.as_str(), lots.as_slice()))
        })
    }

    /// Remaining quantity for a ticker.
    #[must_use]
    pub fn quantity(&self, ticker: &str) -> f64 {
        self.lots
            .get(ticker)
            .map_or(0.0, |lots| lots.iter().map(|l| l.quantity).sum())
    }
}

/// Metrics for one open position.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub ticker: String,
    pub name: String,
    pub quantity: f64,
    pub current_price: f64,
    pub metrics: Metrics,
}

/// Value and return figures shared by holdings and the portfolio total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Metrics {
    /// Cost of the open lots.
    pub initial_value: f64,
    pub current_value: f64,
    pub gross_gain: f64,
    pub gross_return_pct: f64,
    /// Expense-ratio cost for one year at the current value.
    pub annual_cost: f64,
    pub net_gain: f64,
    pub net_return_pct: f64,
    pub cagr_pct: f64,
    /// Date of the oldest open lot.
    pub since: Option<NaiveDate>,
}

impl Metrics {
    fn compute(
        initial_value: f64,
        current_value: f64,
        annual_cost: f64,
        since: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Self {
        let gross_gain = current_value - initial_value;
        let net_gain = gross_gain - annual_cost;
        let years = since.map_or(0.0, |d| years_between(d, today));
        Self {
            initial_value,
            current_value,
            gross_gain,
            gross_return_pct: percent_of(gross_gain, initial_value),
            annual_cost,
            net_gain,
            net_return_pct: percent_of(net_gain, initial_value),
            cagr_pct: since.map_or(0.0, |d| {
                if (today - d).num_days() > CAGR_MIN_DAYS {
                    cagr_pct(initial_value, current_value, years)
                } else {
                    0.0
                }
            }),
            since,
        }
    }
}

/// Portfolio report: one row per open holding plus the totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioReport {
    pub holdings: Vec<Holding>,
    pub total: Metrics,
}

impl PortfolioReport {
    /// Compute the report as of `today`.
    #[must_use]
    pub fn compute(ledger: &Ledger, prices: &PriceTable, today: NaiveDate, default_ter: f64) -> Self {
        let book = LotBook::replay(&ledger.operations, prices, None);
        let names = ledger.names();

        let mut holdings = Vec::new();
        let mut total_initial = 0.0;
        let mut total_current = 0.0;
        let mut total_cost = 0.0;
        let mut earliest: Option<NaiveDate> = None;

        for (ticker, lots) in book.open_tickers() {
            let Some(last) = prices.get(ticker).and_then(|s| s.last()) else {
                continue;
            };

            let quantity: f64 = lots.iter().map(|l| l.quantity).sum();
            let initial_value: f64 = lots.iter().map(|l| l.quantity * l.unit_cost).sum();
            let current_value = quantity * last.close;
            let annual_cost = current_value * ledger.ter_for(ticker, default_ter) / 100.0;
            let since = lots.iter().map(|l| l.date).min();

            total_initial += initial_value;
            total_current += current_value;
            total_cost += annual_cost;
            earliest = match (earliest, since) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            };

            holdings.push(Holding {
                ticker: ticker.to_string(),
                name: names.get(ticker).cloned().unwrap_or_else(|| ticker.to_string()),
                quantity,
                current_price: last.close,
                metrics: Metrics::compute(initial_value, current_value, annual_cost, since, today),
            });
        }

        Self {
            holdings,
            total: Metrics::compute(total_initial, total_current, total_cost, earliest, today),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }
}

/// Compound annual growth rate in percent.
///
/// Reported only for a gain over a positive cost; anything else yields 0.
#[must_use]
pub fn cagr_pct(initial: f64, current: f64, years: f64) -> f64 {
    if years <= 0.0 || initial <= 0.0 || current <= initial {
        return 0.0;
    }
    ((current / initial).powf(1.0 / years) - 1.0) * 100.0
}

/// `part` as a percentage of `whole`, 0 when `whole` is 0.
#[must_use]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

fn years_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / DAYS_PER_YEAR
}

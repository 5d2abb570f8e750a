//! Year-by-year performance of the portfolio.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use super::holding::{percent_of, LotBook};
use super::ledger::{Ledger, Side};
use super::price::{PriceSeries, PriceTable};

/// Performance of a single calendar year.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct YearRow {
    pub year: i32,
    /// Value on January 1st of positions opened in earlier years.
    pub start_value: f64,
    /// Cash put in by buys during the year.
    pub contributions: f64,
    /// Cash taken out by sells during the year.
    pub withdrawals: f64,
    /// Value at December 31st, or today for the running year.
    pub end_value: f64,
    pub gain: f64,
    pub return_pct: f64,
    /// Expense-ratio cost on the end value.
    pub annual_cost: f64,
    pub net_gain: f64,
    pub net_return_pct: f64,
    pub cagr_pct: f64,
    pub net_cagr_pct: f64,
}

impl YearRow {
    /// Capital at work during the year.
    #[must_use]
    pub fn base(&self) -> f64 {
        self.start_value + self.contributions - self.withdrawals
    }
}

/// One row per year covered by the operations or the price history.
#[must_use]
pub fn yearly_breakdown(
    ledger: &Ledger,
    prices: &PriceTable,
    today: NaiveDate,
    default_ter: f64,
) -> Vec<YearRow> {
    let mut years: BTreeSet<i32> = ledger.operation_years();
    for series in prices.values() {
        years.extend(series.points().iter().map(|p| p.date.year()));
    }

    years
        .into_iter()
        .filter_map(|year| year_row(ledger, prices, year, today, default_ter))
        .collect()
}

fn year_row(
    ledger: &Ledger,
    prices: &PriceTable,
    year: i32,
    today: NaiveDate,
    default_ter: f64,
) -> Option<YearRow> {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let year_end = if year == today.year() {
        today
    } else {
        NaiveDate::from_ymd_opt(year, 12, 31)?
    };

    let opening = LotBook::replay(&ledger.operations, prices, year_start.pred_opt());
    let start_value: f64 = opening
        .open_tickers()
        .filter_map(|(ticker, lots)| {
            let price = prices.get(ticker).and_then(|s| opening_price(s, year_start))?;
            Some(lots.iter().map(|l| l.quantity).sum::<f64>() * price)
        })
        .sum();

    let mut contributions = 0.0;
    let mut withdrawals = 0.0;
    for op in ledger
        .operations
        .iter()
        .filter(|op| op.date >= year_start && op.date <= year_end)
    {
        let Some(point) = prices.get(&op.ticker).and_then(|s| s.nearest(op.date)) else {
            continue;
        };
        match op.side {
            Side::Buy => contributions += op.quantity * point.close,
            Side::Sell => withdrawals += op.quantity * point.close,
        }
    }

    let closing = LotBook::replay(&ledger.operations, prices, Some(year_end));
    let mut end_value = 0.0;
    let mut annual_cost = 0.0;
    for (ticker, lots) in closing.open_tickers() {
        let Some(point) = prices.get(ticker).and_then(|s| s.last_on_or_before(year_end)) else {
            continue;
        };
        let value = lots.iter().map(|l| l.quantity).sum::<f64>() * point.close;
        end_value += value;
        annual_cost += value * ledger.ter_for(ticker, default_ter) / 100.0;
    }

    let mut row = YearRow {
        year,
        start_value,
        contributions,
        withdrawals,
        end_value,
        annual_cost,
        ..YearRow::default()
    };

    let base = row.base();
    if base > 0.0 {
        row.gain = end_value - base;
        row.return_pct = percent_of(row.gain, base);
        row.net_gain = row.gain - annual_cost;
        row.net_return_pct = percent_of(row.net_gain, base);
        if end_value > 0.0 {
            row.cagr_pct = (end_value / base - 1.0) * 100.0;
        }
        let net_end = end_value - annual_cost;
        if net_end > 0.0 {
            row.net_cagr_pct = (net_end / base - 1.0) * 100.0;
        }
    }
    Some(row)
}

/// Close on January 1st or the last one before it, else the first January close.
fn opening_price(series: &PriceSeries, year_start: NaiveDate) -> Option<f64> {
    if let Some(point) = series.last_on_or_before(year_start) {
        return Some(point.close);
    }
    series
        .first_on_or_after(year_start)
        .filter(|p| p.date.month() == 1 && p.date.year() == year_start.year())
        .map(|p| p.close)
}

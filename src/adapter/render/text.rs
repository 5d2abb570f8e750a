//! Plain-text renditions of the portfolio for chat messages and the terminal.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::domain::{Distribution, PortfolioReport, YearRow};

/// Euro amount with thousands separators, e.g. `€ 1,234.56`.
#[must_use]
pub fn format_eur(value: f64) -> String {
    format!("€ {}", group_thousands(value))
}

/// Percentage with two decimals, e.g. `12.34%`.
#[must_use]
pub fn format_pct(value: f64) -> String {
    format!("{value:.2}%")
}

fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    format!("{}{grouped}.{frac_part}", if negative { "-" } else { "" })
}

/// The metrics message: value, net gain, net return, CAGR and costs.
#[must_use]
pub fn summary_text(report: &PortfolioReport, now: NaiveDateTime) -> String {
    let total = &report.total;
    format!(
        "📊 Portfolio Metrics\n\n\
        💰 Total Value: {}\n\
        📈 Net Gain: {}\n\
        📊 Net Return: {}\n\
        📉 CAGR: {}\n\
        💸 Annual Costs: {}\n\n\
        🕐 Updated: {}",
        format_eur(total.current_value),
        format_eur(total.net_gain),
        format_pct(total.net_return_pct),
        format_pct(total.cagr_pct),
        format_eur(total.annual_cost),
        now.format("%d/%m/%Y %H:%M"),
    )
}

/// Year-by-year message, one block per year with capital at work.
#[must_use]
pub fn yearly_text(rows: &[YearRow]) -> String {
    let mut text = String::from("📅 Yearly Performance\n");
    let mut any = false;
    for row in rows.iter().filter(|r| r.base() > 0.0) {
        any = true;
        let _ = write!(
            text,
            "\n{}\n\
            • Start: {} | In: {} | Out: {}\n\
            • End: {} | Gain: {}\n\
            • Return: {} | Net: {} | Costs: {}\n",
            row.year,
            format_eur(row.start_value),
            format_eur(row.contributions),
            format_eur(row.withdrawals),
            format_eur(row.end_value),
            format_eur(row.gain),
            format_pct(row.return_pct),
            format_pct(row.net_return_pct),
            format_eur(row.annual_cost),
        );
    }
    if !any {
        text.push_str("\nNo yearly data available.");
    }
    text
}

#[derive(Tabled)]
struct HoldingRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Initial")]
    initial: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Gross %")]
    gross: String,
    #[tabled(rename = "Costs/yr")]
    costs: String,
    #[tabled(rename = "Net %")]
    net: String,
    #[tabled(rename = "CAGR %")]
    cagr: String,
}

/// Holdings plus a totals row.
#[must_use]
pub fn holdings_table(report: &PortfolioReport) -> String {
    let mut rows: Vec<HoldingRow> = report
        .holdings
        .iter()
        .map(|h| HoldingRow {
            name: h.name.clone(),
            ticker: h.ticker.clone(),
            quantity: format!("{:.2}", h.quantity),
            initial: format_eur(h.metrics.initial_value),
            current: format_eur(h.metrics.current_value),
            gross: format_pct(h.metrics.gross_return_pct),
            costs: format_eur(h.metrics.annual_cost),
            net: format_pct(h.metrics.net_return_pct),
            cagr: format_pct(h.metrics.cagr_pct),
        })
        .collect();

    let total = &report.total;
    rows.push(HoldingRow {
        name: "TOTAL".into(),
        ticker: String::new(),
        quantity: String::new(),
        initial: format_eur(total.initial_value),
        current: format_eur(total.current_value),
        gross: format_pct(total.gross_return_pct),
        costs: format_eur(total.annual_cost),
        net: format_pct(total.net_return_pct),
        cagr: format_pct(total.cagr_pct),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct YearTableRow {
    #[tabled(rename = "Year")]
    year: i32,
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "In")]
    contributions: String,
    #[tabled(rename = "Out")]
    withdrawals: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Gain")]
    gain: String,
    #[tabled(rename = "Return")]
    ret: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "CAGR")]
    cagr: String,
    #[tabled(rename = "Net CAGR")]
    net_cagr: String,
}

#[must_use]
pub fn yearly_table(rows: &[YearRow]) -> String {
    let rows = rows.iter().map(|r| YearTableRow {
        year: r.year,
        start: format_eur(r.start_value),
        contributions: format_eur(r.contributions),
        withdrawals: format_eur(r.withdrawals),
        end: format_eur(r.end_value),
        gain: format_eur(r.gain),
        ret: format_pct(r.return_pct),
        net: format_pct(r.net_return_pct),
        cagr: format_pct(r.cagr_pct),
        net_cagr: format_pct(r.net_cagr_pct),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "Bucket")]
    label: String,
    #[tabled(rename = "Share")]
    share: String,
}

/// Buckets sorted by share, largest first.
#[must_use]
pub fn distribution_table(distribution: &Distribution) -> String {
    let mut buckets = distribution.buckets.clone();
    buckets.sort_by(|a, b| b.1.total_cmp(&a.1));
    let rows = buckets.into_iter().map(|(label, share)| ShareRow {
        label,
        share: format_pct(share * 100.0),
    });
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Metrics;
    use chrono::NaiveDate;

    #[test]
    fn euro_amounts_are_grouped() {
        assert_eq!(format_eur(0.0), "€ 0.00");
        assert_eq!(format_eur(999.999), "€ 1,000.00");
        assert_eq!(format_eur(1_234_567.891), "€ 1,234,567.89");
        assert_eq!(format_eur(-2_500.5), "€ -2,500.50");
        assert_eq!(format_eur(-0.001), "€ 0.00");
    }

    #[test]
    fn summary_lists_totals_and_timestamp() {
        let report = PortfolioReport {
            holdings: Vec::new(),
            total: Metrics {
                current_value: 12_345.6,
                net_gain: 345.6,
                net_return_pct: 2.88,
                cagr_pct: 4.1,
                annual_cost: 12.35,
                ..Metrics::default()
            },
        };
        let now = NaiveDate::from_ymd_opt(2025, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let text = summary_text(&report, now);

        assert!(text.contains("Total Value: € 12,345.60"));
        assert!(text.contains("Net Gain: € 345.60"));
        assert!(text.contains("Net Return: 2.88%"));
        assert!(text.contains("CAGR: 4.10%"));
        assert!(text.contains("Annual Costs: € 12.35"));
        assert!(text.ends_with("Updated: 07/03/2025 09:05"));
    }

    #[test]
    fn yearly_text_skips_years_without_capital() {
        let rows = [
            YearRow {
                year: 2023,
                ..YearRow::default()
            },
            YearRow {
                year: 2024,
                contributions: 100.0,
                end_value: 110.0,
                gain: 10.0,
                return_pct: 10.0,
                ..YearRow::default()
            },
        ];
        let text = yearly_text(&rows);
        assert!(!text.contains("2023"));
        assert!(text.contains("2024"));
        assert!(text.contains("Return: 10.00%"));

        assert!(yearly_text(&rows[..1]).contains("No yearly data"));
    }

    #[test]
    fn distribution_table_sorts_by_share() {
        let dist = Distribution {
            buckets: vec![("Bonds".into(), 0.25), ("Equity".into(), 0.75)],
            total_value: 100.0,
        };
        let table = distribution_table(&dist);
        let equity = table.find("Equity").unwrap();
        let bonds = table.find("Bonds").unwrap();
        assert!(equity < bonds);
        assert!(table.contains("75.00%"));
    }
}

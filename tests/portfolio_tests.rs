mod support;

use std::fs;
use std::sync::Arc;

use qrfolio::adapter::market::MarketData;
use qrfolio::adapter::portfolio::LedgerPortfolio;
use qrfolio::domain::{geographic, market_types, yearly_breakdown, Ledger, PortfolioReport};
use qrfolio::error::{Error, LedgerError};
use qrfolio::port::PortfolioSource;
use tempfile::tempdir;

use support::{date, portfolio_config, series, FakeProvider, LEDGER_JSON};

fn provider() -> Arc<FakeProvider> {
    Arc::new(
        FakeProvider::new()
            .with(
                "WRLD.MI",
                series(&[
                    (date(2024, 1, 2), 100.0),
                    (date(2024, 3, 1), 120.0),
                    (date(2024, 6, 3), 125.0),
                    (date(2024, 12, 30), 130.0),
                ]),
            )
            .with("BOND.MI", series(&[(date(2024, 1, 2), 50.0), (date(2024, 12, 30), 50.0)])),
    )
}

fn source(dir: &std::path::Path) -> (LedgerPortfolio, Arc<FakeProvider>) {
    let config = portfolio_config(dir);
    let provider = provider();
    let market = MarketData::new(provider.clone(), &config);
    (LedgerPortfolio::new(&config, market), provider)
}

#[tokio::test]
async fn snapshot_reads_ledger_and_prices() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ledger.json"), LEDGER_JSON).unwrap();
    let (source, provider) = source(dir.path());

    let snapshot = source.snapshot().await.unwrap();
    assert_eq!(snapshot.ledger.securities.len(), 2);
    assert_eq!(snapshot.prices.len(), 2);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn fifo_sells_consume_oldest_lots() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ledger.json"), LEDGER_JSON).unwrap();
    let (source, _) = source(dir.path());
    let snapshot = source.snapshot().await.unwrap();

    let report = PortfolioReport::compute(&snapshot.ledger, &snapshot.prices, date(2025, 1, 2), 0.1);
    let world = report.holdings.iter().find(|h| h.ticker == "WRLD.MI").unwrap();

    // 10 @ 100 and 10 @ 120 bought, 15 sold: 5 units of the second lot remain.
    assert_eq!(world.quantity, 5.0);
    assert_eq!(world.metrics.initial_value, 600.0);
    assert_eq!(world.metrics.current_value, 650.0);
    assert!((world.metrics.annual_cost - 1.3).abs() < 1e-9);
    assert_eq!(world.metrics.since, Some(date(2024, 3, 1)));

    let total = &report.total;
    assert_eq!(total.initial_value, 1600.0);
    assert_eq!(total.current_value, 1650.0);
    assert!(total.cagr_pct > 0.0);
    assert_eq!(total.since, Some(date(2024, 1, 2)));
}

#[tokio::test]
async fn distributions_follow_market_value() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ledger.json"), LEDGER_JSON).unwrap();
    let (source, _) = source(dir.path());
    let snapshot = source.snapshot().await.unwrap();

    let kinds = market_types(&snapshot.ledger, &snapshot.prices);
    // 650 of equity against 1000 of bonds.
    assert!((kinds.share("Equity").unwrap() - 650.0 / 1650.0).abs() < 1e-9);
    assert!((kinds.share("Bonds").unwrap() - 1000.0 / 1650.0).abs() < 1e-9);

    let geo = geographic(&snapshot.ledger, &snapshot.prices);
    assert!(geo.share("Malta").is_none());
    assert!(geo.share("Other").is_some());
}

#[tokio::test]
async fn yearly_rows_cover_operation_years() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("ledger.json"), LEDGER_JSON).unwrap();
    let (source, _) = source(dir.path());
    let snapshot = source.snapshot().await.unwrap();

    let rows = yearly_breakdown(&snapshot.ledger, &snapshot.prices, date(2025, 1, 2), 0.1);
    let row = rows.iter().find(|r| r.year == 2024).unwrap();
    assert_eq!(row.start_value, 0.0);
    assert!(row.contributions > 0.0);
    assert!(row.withdrawals > 0.0);
}

#[tokio::test]
async fn empty_ledger_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("ledger.json"),
        r#"{"securities": [], "operations": []}"#,
    )
    .unwrap();
    let (source, provider) = source(dir.path());

    let err = source.snapshot().await.unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::Empty)));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn missing_ledger_without_sample_is_not_found() {
    let dir = tempdir().unwrap();
    let (source, _) = source(dir.path());

    let err = source.snapshot().await.unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::NotFound { .. })));
}

#[tokio::test]
async fn missing_ledger_with_sample_is_created() {
    let dir = tempdir().unwrap();
    let mut config = portfolio_config(dir.path());
    config.create_sample = true;
    let market = MarketData::new(provider(), &config);
    let source = LedgerPortfolio::new(&config, market);

    let ledger = source.ledger().unwrap();
    assert_eq!(ledger, Ledger::sample());
    assert!(dir.path().join("ledger.json").is_file());
}

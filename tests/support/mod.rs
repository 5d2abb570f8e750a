//! Fakes and fixtures shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use qrfolio::config::PortfolioConfig;
use qrfolio::domain::{PricePoint, PriceSeries};
use qrfolio::error::MarketError;
use qrfolio::port::PriceProvider;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn series(points: &[(NaiveDate, f64)]) -> PriceSeries {
    PriceSeries::new(points.iter().map(|&(d, c)| PricePoint::new(d, c)))
}

/// Price provider serving canned series and recording every request.
#[derive(Default)]
pub struct FakeProvider {
    series: HashMap<String, PriceSeries>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ticker: &str, series: PriceSeries) -> Self {
        self.series.insert(ticker.to_string(), series);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        _period: &str,
        _interval: &str,
    ) -> Result<PriceSeries, MarketError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(ticker.to_string());
        self.series
            .get(ticker)
            .cloned()
            .ok_or_else(|| MarketError::Provider {
                provider: "fake",
                ticker: ticker.to_string(),
                message: "unknown ticker".to_string(),
            })
    }
}

/// Portfolio config rooted in `dir`, with no pauses and no sample ledger.
pub fn portfolio_config(dir: &std::path::Path) -> PortfolioConfig {
    PortfolioConfig {
        ledger_paths: vec![dir.join("ledger.json")],
        create_sample: false,
        cache_dir: dir.to_path_buf(),
        fetch_pause_ms: 0,
        ..PortfolioConfig::default()
    }
}

pub const LEDGER_JSON: &str = r#"{
    "nomi_titoli": [
        {
            "nome": "World ETF",
            "TICKER": "WRLD.MI",
            "TER": 0.2,
            "distribuzione_geografica": [
                {"nazione": "USA", "percentuale": 70},
                {"nazione": "Japan", "percentuale": 29.5},
                {"nazione": "Malta", "percentuale": 0.5}
            ],
            "tipologia_mercato": [{"tipo": "Equity", "percentuale": 100}]
        },
        {
            "nome": "Bond ETF",
            "TICKER": "BOND.MI",
            "tipologia_mercato": [{"tipo": "Bonds", "percentuale": 100}]
        }
    ],
    "operazioni": [
        {"data": "2024-01-02", "quote": 10, "operazione": "acquisto", "titolo": "WRLD.MI"},
        {"data": "2024-03-01", "quote": 10, "operazione": "acquisto", "titolo": "WRLD.MI"},
        {"data": "2024-06-03", "quote": 15, "operazione": "vendita", "titolo": "WRLD.MI"},
        {"data": "2024-01-02", "quote": 20, "operazione": "acquisto", "titolo": "BOND.MI"}
    ]
}"#;

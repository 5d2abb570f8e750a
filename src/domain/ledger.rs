//! Transaction ledger: the securities held and the buy/sell operations.
//!
//! The JSON layout accepts both English keys and the legacy Italian ones
//! used by hand-maintained ledgers (`nomi_titoli`, `operazioni`, ...).

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};

/// Share of a security allocated to one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryWeight {
    #[serde(alias = "nazione")]
    pub country: String,
    /// Percentage, 0..=100.
    #[serde(alias = "percentuale")]
    pub percentage: f64,
}

/// Share of a security allocated to one market type (equity, bonds, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTypeWeight {
    #[serde(alias = "tipo")]
    pub kind: String,
    /// Percentage, 0..=100.
    #[serde(alias = "percentuale")]
    pub percentage: f64,
}

/// A tradable security listed in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Security {
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(default, alias = "ISIN", skip_serializing_if = "Option::is_none")]
    pub isin: Option<String>,
    #[serde(alias = "TICKER")]
    pub ticker: String,
    /// Total expense ratio, percent per year.
    #[serde(default, alias = "TER", skip_serializing_if = "Option::is_none")]
    pub ter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(
        default,
        alias = "distribuzione_geografica",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub geographic_distribution: Vec<CountryWeight>,
    #[serde(
        default,
        alias = "tipologia_mercato",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub market_types: Vec<MarketTypeWeight>,
}

/// Direction of an operation.
///
/// Parsing ignores case and accepts the Italian `acquisto`/`vendita`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        const VARIANTS: &[&str] = &["buy", "sell", "acquisto", "vendita"];

        let raw = String::deserialize(deserializer)?;
        match raw.trim().to_lowercase().as_str() {
            "buy" | "acquisto" => Ok(Side::Buy),
            "sell" | "vendita" => Ok(Side::Sell),
            _ => Err(de::Error::unknown_variant(&raw, VARIANTS)),
        }
    }
}

/// A single buy or sell of a security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    #[serde(alias = "data")]
    pub date: NaiveDate,
    /// Number of units traded.
    #[serde(alias = "quote")]
    pub quantity: f64,
    #[serde(alias = "operazione")]
    pub side: Side,
    #[serde(alias = "titolo")]
    pub ticker: String,
    /// Cash amount actually exchanged, when recorded.
    #[serde(
        default,
        alias = "importo_scambiato",
        skip_serializing_if = "Option::is_none"
    )]
    pub traded_amount: Option<f64>,
}

/// The whole ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(alias = "nomi_titoli")]
    pub securities: Vec<Security>,
    #[serde(alias = "operazioni")]
    pub operations: Vec<Operation>,
}

impl Ledger {
    /// True when there is nothing to compute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.securities.is_empty() || self.operations.is_empty()
    }

    /// Tickers of every listed security, in ledger order.
    #[must_use]
    pub fn tickers(&self) -> Vec<String> {
        self.securities.iter().map(|s| s.ticker.clone()).collect()
    }

    /// Ticker to display name map.
    #[must_use]
    pub fn names(&self) -> HashMap<String, String> {
        self.securities
            .iter()
            .map(|s| (s.ticker.clone(), s.name.clone()))
            .collect()
    }

    /// Look up a security by ticker.
    #[must_use]
    pub fn security(&self, ticker: &str) -> Option<&Security> {
        self.securities.iter().find(|s| s.ticker == ticker)
    }

    /// Expense ratio for a ticker, falling back to `default` when unknown.
    #[must_use]
    pub fn ter_for(&self, ticker: &str, default: f64) -> f64 {
        self.security(ticker).and_then(|s| s.ter).unwrap_or(default)
    }

    /// Calendar years in which at least one operation happened.
    #[must_use]
    pub fn operation_years(&self) -> BTreeSet<i32> {
        use chrono::Datelike;
        self.operations.iter().map(|op| op.date.year()).collect()
    }

    /// Demo ledger written when no ledger file exists yet.
    #[must_use]
    pub fn sample() -> Self {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default();
        Self {
            securities: vec![
                Security {
                    name: "Amundi MSCI World UCITS ETF Acc".into(),
                    isin: Some("IE000BI8OT95".into()),
                    ticker: "MWRD.MI".into(),
                    ter: Some(0.10),
                    link: Some(
                        "https://www.justetf.com/it/etf-profile.html?isin=IE000BI8OT95".into(),
                    ),
                    geographic_distribution: Vec::new(),
                    market_types: Vec::new(),
                },
                Security {
                    name: "Amundi Euro Government Bond 3-5Y UCITS ETF Acc".into(),
                    isin: Some("LU1650488494".into()),
                    ticker: "EM35.MI".into(),
                    ter: Some(0.10),
                    link: Some(
                        "https://www.justetf.com/it/etf-profile.html?isin=LU1650488494".into(),
                    ),
                    geographic_distribution: Vec::new(),
                    market_types: Vec::new(),
                },
            ],
            operations: vec![
                Operation {
                    date: date(2025, 1, 2),
                    quantity: 100.0,
                    side: Side::Buy,
                    ticker: "MWRD.MI".into(),
                    traded_amount: None,
                },
                Operation {
                    date: date(2025, 1, 6),
                    quantity: 50.0,
                    side: Side::Buy,
                    ticker: "EM35.MI".into(),
                    traded_amount: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITALIAN_LEDGER: &str = r#"{
        "nomi_titoli": [
            {
                "nome": "World ETF",
                "ISIN": "IE000",
                "TICKER": "WRLD.MI",
                "TER": 0.2,
                "distribuzione_geografica": [
                    {"nazione": "USA", "percentuale": 70},
                    {"nazione": "Japan", "percentuale": 30}
                ],
                "tipologia_mercato": [{"tipo": "Azionario", "percentuale": 100}]
            }
        ],
        "operazioni": [
            {"data": "2024-03-01", "quote": 10, "operazione": "acquisto", "titolo": "WRLD.MI"},
            {"data": "2024-06-01", "quote": 4, "operazione": "vendita", "titolo": "WRLD.MI",
             "importo_scambiato": 410.5}
        ]
    }"#;

    #[test]
    fn parses_legacy_italian_keys() {
        let ledger: Ledger = serde_json::from_str(ITALIAN_LEDGER).unwrap();

        assert_eq!(ledger.securities.len(), 1);
        let security = &ledger.securities[0];
        assert_eq!(security.ticker, "WRLD.MI");
        assert_eq!(security.ter, Some(0.2));
        assert_eq!(security.geographic_distribution.len(), 2);
        assert_eq!(security.market_types[0].kind, "Azionario");

        assert_eq!(ledger.operations[0].side, Side::Buy);
        assert_eq!(ledger.operations[1].side, Side::Sell);
        assert_eq!(ledger.operations[1].traded_amount, Some(410.5));
        assert_eq!(
            ledger.operations[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn parses_english_keys() {
        let json = r#"{
            "securities": [{"name": "Bond", "ticker": "BND"}],
            "operations": [{"date": "2023-01-10", "quantity": 2.5, "side": "buy", "ticker": "BND"}]
        }"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        assert_eq!(ledger.operations[0].quantity, 2.5);
        assert!(ledger.securities[0].ter.is_none());
    }

    #[test]
    fn rejects_unknown_side() {
        let json = r#"{
            "securities": [],
            "operations": [{"date": "2023-01-10", "quantity": 1, "side": "gift", "ticker": "X"}]
        }"#;
        assert!(serde_json::from_str::<Ledger>(json).is_err());
    }

    #[test]
    fn side_ignores_case() {
        let json = r#"{
            "nomi_titoli": [],
            "operazioni": [
                {"data": "2023-01-10", "quote": 1, "operazione": "ACQUISTO", "titolo": "X"},
                {"data": "2023-02-10", "quote": 1, "operazione": "Vendita", "titolo": "X"},
                {"data": "2023-03-10", "quote": 1, "operazione": "BUY", "titolo": "X"}
            ]
        }"#;
        let ledger: Ledger = serde_json::from_str(json).unwrap();
        let sides: Vec<Side> = ledger.operations.iter().map(|op| op.side).collect();
        assert_eq!(sides, vec![Side::Buy, Side::Sell, Side::Buy]);
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }

    #[test]
    fn ter_falls_back_to_default() {
        let ledger: Ledger = serde_json::from_str(ITALIAN_LEDGER).unwrap();
        assert_eq!(ledger.ter_for("WRLD.MI", 0.1), 0.2);
        assert_eq!(ledger.ter_for("MISSING", 0.1), 0.1);
    }

    #[test]
    fn sample_round_trips_and_is_not_empty() {
        let sample = Ledger::sample();
        assert!(!sample.is_empty());

        let json = serde_json::to_string_pretty(&sample).unwrap();
        let parsed: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample);
        assert_eq!(parsed.names()["MWRD.MI"], "Amundi MSCI World UCITS ETF Acc");
    }

    #[test]
    fn operation_years_are_sorted_and_unique() {
        let ledger: Ledger = serde_json::from_str(ITALIAN_LEDGER).unwrap();
        assert_eq!(ledger.operation_years().into_iter().collect::<Vec<_>>(), vec![2024]);
    }
}

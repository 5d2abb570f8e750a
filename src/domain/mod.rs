//! Ledger model and the portfolio arithmetic built on top of it.

mod distribution;
mod holding;
mod ledger;
mod link;
mod price;
mod yearly;

// Ledger
pub use ledger::{CountryWeight, Ledger, MarketTypeWeight, Operation, Security, Side};

// Prices
pub use price::{PricePoint, PriceSeries, PriceTable};

// Holdings and returns
pub use holding::{
    cagr_pct, percent_of, Holding, Lot, LotBook, Metrics, PortfolioReport, CAGR_MIN_DAYS,
};

// Breakdowns
pub use distribution::{
    geographic, market_positions, market_types, Distribution, MarketPosition, MIN_BUCKET_SHARE,
    OTHER_BUCKET,
};
pub use yearly::{yearly_breakdown, YearRow};

// Links
pub use link::is_valid_url;

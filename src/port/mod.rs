//! Trait definitions (ports). Depend only on domain.
//!
//! Adapters implement these to plug external systems into the bot:
//!
//! ```text
//!   ┌────────────┐     ┌──────────────────┐     ┌───────────────┐
//!   │  Telegram  │ ──▶ │ PortfolioSource  │ ──▶ │ PriceProvider │
//!   │  control   │     │ (ledger + prices)│     │ (Yahoo, ...)  │
//!   └────────────┘     └──────────────────┘     └───────────────┘
//! ```
//!
//! - [`PriceProvider`] - Historical closing prices for one ticker
//! - [`PortfolioSource`] - Ledger plus the prices needed to value it

mod market;
mod portfolio;

// Market data port
pub use market::PriceProvider;

// Portfolio port
pub use portfolio::{PortfolioSnapshot, PortfolioSource};

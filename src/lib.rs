//! qrfolio - a personal Telegram bot for QR codes and portfolio reports.
//!
//! The bot has two modes per user: in QR mode every link sent to it comes
//! back as a QR-code image, in portfolio mode commands report on a JSON
//! ledger of buy and sell operations valued at Yahoo Finance prices.
//!
//! # Architecture
//!
//! - **`domain`** - ledger model, FIFO lots, returns and CAGR, distributions,
//!   yearly breakdown and link validation. No I/O.
//! - **`port`** - traits the domain is fed through (`PriceProvider`,
//!   `PortfolioSource`).
//! - **`adapter`** - ledger files, the Yahoo provider and its price cache,
//!   text/chart/QR rendering and the Telegram bot.
//! - **`cli`** - the `qrfolio` binary's subcommands.
//!
//! # Features
//!
//! - `telegram` (default) - the bot transport, built on teloxide.
//!
//! # Example
//!
//! ```no_run
//! use qrfolio::adapter::render::QrRenderer;
//!
//! let png = QrRenderer::new(10, 4).png("https://example.com").unwrap();
//! std::fs::write("qrcode.png", png).unwrap();
//! ```

pub mod adapter;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;

//! Adapters connecting the domain to files, the network and images.
//!
//! - [`ledger`] - JSON ledger storage
//! - [`market`] - Yahoo Finance prices behind a file cache
//! - [`portfolio`] - ledger plus prices as a [`PortfolioSource`](crate::port::PortfolioSource)
//! - [`render`] - text, tables, charts and QR codes
//! - `telegram` - the bot (feature `telegram`)

pub mod ledger;
pub mod market;
pub mod portfolio;
pub mod render;

#[cfg(feature = "telegram")]
pub mod telegram;

//! Market price retrieval with a file cache in front of the provider.

mod cache;
mod service;
mod yahoo;

pub use cache::PriceCache;
pub use service::MarketData;
pub use yahoo::YahooProvider;

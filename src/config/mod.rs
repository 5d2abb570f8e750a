//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable overrides
//! for sensitive values like `TELEGRAM_BOT_TOKEN`.

mod logging;
mod portfolio;
mod qr;
mod reconnection;
mod settings;
mod telegram;

pub use logging::LoggingConfig;
pub use portfolio::PortfolioConfig;
pub use qr::QrConfig;
pub use reconnection::ReconnectionConfig;
pub use settings::Config;
pub use telegram::{parse_allowed_ids, TelegramConfig, TelegramSettings};

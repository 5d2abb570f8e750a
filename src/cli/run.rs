//! Handler for the `run` command.

#[cfg(feature = "telegram")]
use std::sync::Arc;

#[cfg(feature = "telegram")]
use tracing::{info, warn};

use crate::cli::Cli;
use crate::error::Result;

/// Start the bot and block until it stops.
#[cfg(feature = "telegram")]
pub async fn execute(cli: &Cli) -> Result<()> {
    use crate::adapter::market::{MarketData, YahooProvider};
    use crate::adapter::portfolio::LedgerPortfolio;
    use crate::adapter::render::QrRenderer;
    use crate::adapter::telegram::{self, BotControl};
    use crate::config::TelegramSettings;

    let config = cli.load_config()?;
    let settings = TelegramSettings::from_env(&config.telegram)?;

    let market = MarketData::new(Arc::new(YahooProvider::new()?), &config.portfolio);
    let source = LedgerPortfolio::new(&config.portfolio, market);

    if config.portfolio.enabled {
        match source.ledger() {
            Ok(ledger) => info!(
                securities = ledger.securities.len(),
                operations = ledger.operations.len(),
                "Portfolio ledger ready"
            ),
            Err(e) => warn!(error = %e, "Portfolio commands will fail until the ledger is fixed"),
        }
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        portfolio = config.portfolio.enabled,
        "qrfolio starting"
    );

    let control = BotControl::new(Arc::new(source), QrRenderer::from(&config.qr), &config.portfolio)
        .with_allowed_users(settings.allowed_user_ids.clone());

    telegram::run(settings, config.reconnection.clone(), control).await
}

#[cfg(not(feature = "telegram"))]
pub async fn execute(_cli: &Cli) -> Result<()> {
    Err(crate::error::ConfigError::InvalidValue {
        field: "features",
        reason: "qrfolio was built without the `telegram` feature".to_string(),
    }
    .into())
}

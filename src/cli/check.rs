//! Configuration and ledger validation commands.

use std::collections::BTreeSet;

use crate::adapter::market::PriceCache;
use crate::cli::{output, Cli};
use crate::config::{Config, TelegramSettings};
use crate::domain::Ledger;
use crate::error::Result;

/// Validate the configuration file without starting the bot.
pub fn execute_config(cli: &Cli) -> Result<()> {
    let path = &cli.config;
    output::note_path("Checking configuration", path);

    let config = Config::load(path)?;
    output::ok("Configuration file is valid");

    output::section("Summary");
    output::key_value("Log level", &config.logging.level);
    output::key_value("QR box size", config.qr.box_size);
    output::key_value("QR border", config.qr.border);
    output::key_value("Portfolio", if config.portfolio.enabled { "enabled" } else { "disabled" });
    output::key_value("Price period", &config.portfolio.period);
    output::key_value("Price interval", &config.portfolio.interval);
    output::key_value(
        "Price cache",
        config
            .portfolio
            .cache_dir
            .join(PriceCache::file_name(&config.portfolio.period, &config.portfolio.interval))
            .display(),
    );

    output::section("Telegram");
    match TelegramSettings::from_env(&config.telegram) {
        Ok(settings) if settings.allowed_user_ids.is_empty() => {
            output::ok("Bot token found");
            output::warn("No allow-list: every Telegram user can use the bot");
        }
        Ok(settings) => {
            output::ok("Bot token found");
            output::key_value("Allowed users", settings.allowed_user_ids.len());
        }
        Err(_) => output::warn("TELEGRAM_BOT_TOKEN is not set; `qrfolio run` will refuse to start"),
    }

    Ok(())
}

/// Locate and parse the ledger.
pub fn execute_ledger(cli: &Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config)?;
    let paths = config.portfolio.ledger_search_paths();

    let Some(path) = Ledger::locate(&paths) else {
        output::warn("No ledger file found. Searched:");
        for path in &paths {
            output::key_value("-", path.display());
        }
        return Err(crate::error::LedgerError::NotFound {
            searched: paths.clone(),
        }
        .into());
    };

    let ledger = Ledger::load(path)?;
    output::ok(&format!("Ledger {} is valid", path.display()));
    output::key_value("Securities", ledger.securities.len());
    output::key_value("Operations", ledger.operations.len());

    let unknown: BTreeSet<&str> = ledger
        .operations
        .iter()
        .map(|op| op.ticker.as_str())
        .filter(|t| ledger.security(t).is_none())
        .collect();
    if !unknown.is_empty() {
        let unknown: Vec<&str> = unknown.into_iter().collect();
        output::warn(&format!("Operations on unlisted tickers: {}", unknown.join(", ")));
    }
    Ok(())
}

//! Telegram bot configuration.

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

const fn default_true() -> bool {
    true
}

/// Telegram settings read from the config file.
///
/// The bot token is never read from the file; see [`TelegramSettings`].
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// User IDs allowed to talk to the bot. Empty means everyone.
    #[serde(default)]
    pub allowed_user_ids: Vec<u64>,
    /// Discard updates queued while the bot was offline.
    #[serde(default = "default_true")]
    pub drop_pending_updates: bool,
    /// Publish the command list for the "/" menu at startup.
    #[serde(default = "default_true")]
    pub register_commands: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            allowed_user_ids: Vec::new(),
            drop_pending_updates: default_true(),
            register_commands: default_true(),
        }
    }
}

/// Resolved runtime settings for the bot: file config plus environment.
#[derive(Debug, Clone)]
pub struct TelegramSettings {
    /// Bot API token obtained from BotFather.
    pub bot_token: String,
    /// Allow-listed user IDs. Empty means no restriction.
    pub allowed_user_ids: Vec<u64>,
    pub drop_pending_updates: bool,
    pub register_commands: bool,
}

impl TelegramSettings {
    /// Resolve settings from environment variables on top of `config`.
    ///
    /// Reads `TELEGRAM_BOT_TOKEN` (required) and `TELEGRAM_ALLOWED_IDS`
    /// (optional, replaces the file allow-list when non-empty).
    pub fn from_env(config: &TelegramConfig) -> Result<Self, ConfigError> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingField {
                field: "TELEGRAM_BOT_TOKEN environment variable",
            })?;

        let allowed_user_ids = match std::env::var("TELEGRAM_ALLOWED_IDS") {
            Ok(raw) if !raw.trim().is_empty() => parse_allowed_ids(&raw),
            _ => config.allowed_user_ids.clone(),
        };

        Ok(Self {
            bot_token: bot_token.trim().to_string(),
            allowed_user_ids,
            drop_pending_updates: config.drop_pending_updates,
            register_commands: config.register_commands,
        })
    }
}

/// Parse a comma-separated list of numeric user IDs, skipping anything else.
#[must_use]
pub fn parse_allowed_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<u64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(entry = part, "Skipping non-numeric entry in TELEGRAM_ALLOWED_IDS");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize tests that modify environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn parse_allowed_ids_skips_garbage() {
        assert_eq!(parse_allowed_ids("123, 456 ,abc,,789"), vec![123, 456, 789]);
        assert!(parse_allowed_ids(" , ").is_empty());
        assert!(parse_allowed_ids("-5").is_empty());
    }

    #[test]
    fn from_env_missing_token() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("TELEGRAM_BOT_TOKEN");

        let err = TelegramSettings::from_env(&TelegramConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn from_env_blank_token_is_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "   ");

        assert!(TelegramSettings::from_env(&TelegramConfig::default()).is_err());

        std::env::remove_var("TELEGRAM_BOT_TOKEN");
    }

    #[test]
    fn from_env_prefers_env_allow_list() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "test-token");
        std::env::set_var("TELEGRAM_ALLOWED_IDS", "111,222");

        let config = TelegramConfig {
            allowed_user_ids: vec![999],
            ..TelegramConfig::default()
        };
        let settings = TelegramSettings::from_env(&config).unwrap();
        assert_eq!(settings.bot_token, "test-token");
        assert_eq!(settings.allowed_user_ids, vec![111, 222]);

        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        std::env::remove_var("TELEGRAM_ALLOWED_IDS");
    }

    #[test]
    fn from_env_falls_back_to_file_allow_list() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "test-token");
        std::env::remove_var("TELEGRAM_ALLOWED_IDS");

        let config = TelegramConfig {
            allowed_user_ids: vec![999],
            ..TelegramConfig::default()
        };
        let settings = TelegramSettings::from_env(&config).unwrap();
        assert_eq!(settings.allowed_user_ids, vec![999]);
        assert!(settings.drop_pending_updates);

        std::env::remove_var("TELEGRAM_BOT_TOKEN");
    }
}

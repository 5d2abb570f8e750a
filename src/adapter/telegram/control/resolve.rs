//! Message routing and mode switching.

use tracing::debug;

use crate::domain::is_valid_url;

use super::super::command::{
    command_help, parse_command, portfolio_commands_help, start_text, Command, CommandParseError,
};
use super::super::session::Mode;
use super::{Action, BotControl};

pub(super) const PORTFOLIO_DISABLED: &str = "❌ Investment features are not available.";

impl BotControl {
    /// Route a text message from `user_id`, updating their mode.
    pub fn resolve(&self, user_id: u64, text: &str) -> Action {
        match parse_command(text) {
            Ok(command) => self.resolve_command(user_id, command),
            Err(CommandParseError::NotACommand) => self.resolve_text(user_id, text),
            Err(err) => Action::Reply(format!(
                "❓ {err}\n\n{}",
                command_help(self.portfolio_enabled)
            )),
        }
    }

    fn resolve_command(&self, user_id: u64, command: Command) -> Action {
        debug!(user_id, ?command, "Telegram command");
        match command {
            Command::Start => {
                self.sessions.reset(user_id);
                Action::Reply(start_text(self.portfolio_enabled))
            }
            Command::Help => {
                self.sessions.reset(user_id);
                Action::Reply(command_help(self.portfolio_enabled))
            }
            Command::QrCode => {
                self.sessions.set(user_id, Mode::Qr);
                Action::Reply(
                    "📤 QR code mode enabled!\n\n\
                    Send me any link and I'll turn it into a QR code.\n\
                    Use /stop to disable it."
                        .to_string(),
                )
            }
            Command::Stop => Action::Reply(stop_text(self.sessions.reset(user_id))),
            Command::Investments => {
                if !self.portfolio_enabled {
                    return Action::Reply(PORTFOLIO_DISABLED.to_string());
                }
                self.sessions.set(user_id, Mode::Portfolio);
                Action::Reply(format!(
                    "📊 Investment mode enabled!\n\nAvailable commands:\n{}\nUse /stop to disable it.",
                    portfolio_commands_help()
                ))
            }
            Command::View(view) => {
                if !self.portfolio_enabled {
                    return Action::Reply(PORTFOLIO_DISABLED.to_string());
                }
                if self.sessions.mode(user_id) != Mode::Portfolio {
                    return Action::Reply(
                        "⚠️ Investment mode is not active. Use /investimenti to enable it."
                            .to_string(),
                    );
                }
                Action::View(view)
            }
        }
    }

    fn resolve_text(&self, user_id: u64, text: &str) -> Action {
        let text = text.trim();
        if text.is_empty() {
            return Action::Ignore;
        }

        match self.sessions.mode(user_id) {
            Mode::Qr if is_valid_url(text) => Action::Qr {
                url: text.to_string(),
            },
            Mode::Qr => Action::Reply(
                "❌ Please send a valid link (e.g. https://www.example.com)\n\n\
                Use /stop to disable QR code mode."
                    .to_string(),
            ),
            Mode::Portfolio => Action::Reply(format!(
                "ℹ️ Investment mode is active. Use one of the commands:\n{}",
                portfolio_commands_help()
            )),
            Mode::Idle => Action::Reply(
                "⚠️ No active mode.\n\n\
                Use /qrcode to generate QR codes or /investimenti to analyse the portfolio.\n\
                Use /help for every command."
                    .to_string(),
            ),
        }
    }
}

fn stop_text(previous: Mode) -> String {
    match previous {
        Mode::Idle => "ℹ️ No active mode.".to_string(),
        Mode::Qr => "🛑 Mode disabled:\n• QR code".to_string(),
        Mode::Portfolio => "🛑 Mode disabled:\n• Investments".to_string(),
    }
}

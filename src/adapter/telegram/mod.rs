//! Telegram bot: command parsing, access control, per-user modes and the
//! polling transport.
//!
//! Requires the `telegram` feature to be enabled.

mod auth;
mod backoff;
mod bot;
mod command;
mod control;
mod session;

pub use auth::{is_authorized, ACCESS_DENIED};
pub use backoff::Backoff;
pub use bot::run;
pub use command::{bot_commands, command_help, parse_command, Command, CommandParseError, View};
pub use control::{Action, BotControl, Reply};
pub use session::{Mode, Sessions};

//! Bot behaviour independent of the Telegram transport.
//!
//! A message is first [resolved](BotControl::resolve) into an [`Action`],
//! updating the sender's mode on the way, then [performed](BotControl::perform)
//! into the [`Reply`] values the transport delivers.

use std::sync::Arc;
use std::time::Duration;

use crate::adapter::render::QrRenderer;
use crate::config::PortfolioConfig;
use crate::port::PortfolioSource;

use super::auth::is_authorized;
use super::command::View;
use super::session::Sessions;

mod resolve;
mod view;

/// Pause between the parts of the full report.
const DEFAULT_PART_PAUSE: Duration = Duration::from_secs(1);

/// What to do in response to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to send.
    Ignore,
    /// A text reply known upfront.
    Reply(String),
    /// Encode a validated link.
    Qr { url: String },
    /// Compute and send a portfolio view.
    View(View),
}

impl Action {
    /// Notice sent before a slow action runs.
    #[must_use]
    pub fn progress_text(&self) -> Option<&'static str> {
        let text = match self {
            Self::Ignore | Self::Reply(_) => return None,
            Self::Qr { .. } => "⏳ Generating QR code...",
            Self::View(View::Metrics) => "⏳ Calculating metrics...",
            Self::View(View::Holdings) => "⏳ Preparing the portfolio table...",
            Self::View(View::Composition) => "⏳ Generating the chart...",
            Self::View(View::Trend) => "⏳ Generating the trend chart, this may take a few seconds...",
            Self::View(View::Geography) => "⏳ Generating the geographic distribution chart...",
            Self::View(View::MarketTypes) => "⏳ Generating the market type chart...",
            Self::View(View::Yearly) => "⏳ Calculating yearly performance...",
            Self::View(View::FullReport) => "⏳ Preparing the full report...",
        };
        Some(text)
    }

    /// Whether the progress notice is deleted once the result is out.
    #[must_use]
    pub fn dismisses_progress(&self) -> bool {
        matches!(self, Self::Qr { .. })
    }

    /// Whether the replies are spaced by the part pause.
    #[must_use]
    pub fn is_multi_part(&self) -> bool {
        matches!(self, Self::View(View::FullReport))
    }
}

/// A message to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Photo { png: Vec<u8>, caption: String },
}

impl Reply {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Photo { .. } => None,
        }
    }
}

/// Command executor shared by every message handler.
pub struct BotControl {
    sessions: Sessions,
    source: Arc<dyn PortfolioSource>,
    qr: QrRenderer,
    allowed_user_ids: Vec<u64>,
    portfolio_enabled: bool,
    default_ter: f64,
    part_pause: Duration,
}

impl BotControl {
    #[must_use]
    pub fn new(source: Arc<dyn PortfolioSource>, qr: QrRenderer, portfolio: &PortfolioConfig) -> Self {
        Self {
            sessions: Sessions::new(),
            source,
            qr,
            allowed_user_ids: Vec::new(),
            portfolio_enabled: portfolio.enabled,
            default_ter: portfolio.default_ter,
            part_pause: DEFAULT_PART_PAUSE,
        }
    }

    /// Restrict the bot to these users. Empty means everyone.
    #[must_use]
    pub fn with_allowed_users(mut self, allowed_user_ids: Vec<u64>) -> Self {
        self.allowed_user_ids = allowed_user_ids;
        self
    }

    #[must_use]
    pub fn with_part_pause(mut self, part_pause: Duration) -> Self {
        self.part_pause = part_pause;
        self
    }

    #[must_use]
    pub fn is_authorized(&self, user_id: u64) -> bool {
        is_authorized(user_id, &self.allowed_user_ids)
    }

    #[must_use]
    pub fn sessions(&self) -> &Sessions {
        &self.sessions
    }

    #[must_use]
    pub fn part_pause(&self) -> Duration {
        self.part_pause
    }

    #[must_use]
    pub fn portfolio_enabled(&self) -> bool {
        self.portfolio_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_qr_dismisses_progress() {
        assert!(Action::Qr { url: "https://a.io".into() }.dismisses_progress());
        assert!(!Action::View(View::Metrics).dismisses_progress());
        assert!(!Action::Reply("x".into()).dismisses_progress());
    }

    #[test]
    fn replies_have_no_progress_notice() {
        assert_eq!(Action::Ignore.progress_text(), None);
        assert_eq!(Action::Reply("hi".into()).progress_text(), None);
        assert!(Action::View(View::FullReport).progress_text().is_some());
    }

    #[test]
    fn only_full_report_is_multi_part() {
        assert!(Action::View(View::FullReport).is_multi_part());
        assert!(!Action::View(View::Holdings).is_multi_part());
    }
}

//! Action execution: QR images and portfolio views.

use chrono::Local;
use tracing::{error, info};

use crate::adapter::render::{chart, text};
use crate::domain::{geographic, market_types, yearly_breakdown, PortfolioReport};
use crate::error::{Error, RenderError, Result};
use crate::port::PortfolioSnapshot;

use super::super::command::View;
use super::{Action, BotControl, Reply};

impl BotControl {
    /// Produce the replies for an action.
    ///
    /// Failures are turned into an error reply; nothing is propagated.
    pub async fn perform(&self, action: &Action) -> Vec<Reply> {
        match action {
            Action::Ignore => Vec::new(),
            Action::Reply(text) => vec![Reply::Text(text.clone())],
            Action::Qr { url } => vec![self.qr_reply(url)],
            Action::View(view) => match self.view(*view).await {
                Ok(replies) => replies,
                Err(Error::Render(RenderError::NoData(message))) => {
                    vec![Reply::Text(format!("❌ {message}"))]
                }
                Err(Error::Ledger(e)) => {
                    error!(error = %e, "Portfolio data unavailable");
                    vec![Reply::Text("❌ Could not load portfolio data!".to_string())]
                }
                Err(e) => {
                    error!(view = ?view, error = %e, "Portfolio view failed");
                    vec![Reply::Text(format!("❌ Error: {e}"))]
                }
            },
        }
    }

    fn qr_reply(&self, url: &str) -> Reply {
        match self.qr.png(url) {
            Ok(png) => {
                info!(url, bytes = png.len(), "QR code generated");
                Reply::Photo {
                    png,
                    caption: format!("✅ QR code generated!\n🔗 Link: {url}"),
                }
            }
            Err(e) => {
                error!(url, error = %e, "QR generation failed");
                Reply::Text(format!("❌ Error: {e}"))
            }
        }
    }

    async fn view(&self, view: View) -> Result<Vec<Reply>> {
        let PortfolioSnapshot { ledger, prices } = self.source.snapshot().await?;
        let now = Local::now().naive_local();
        let today = now.date();
        let report = PortfolioReport::compute(&ledger, &prices, today, self.default_ter);

        let replies = match view {
            View::Metrics => vec![metrics_reply(&report, now)],
            View::Holdings => vec![photo(chart::holdings_table(&report)?, "📊 Portfolio Table")],
            View::Composition => vec![photo(
                chart::composition_chart(&report)?,
                "🥧 Portfolio Composition",
            )],
            View::Trend => vec![photo(
                chart::trend_chart(&prices, &ledger.names(), today)?,
                "📈 Price Trend",
            )],
            View::Geography => vec![photo(
                chart::distribution_chart("Geographic Distribution", &geographic(&ledger, &prices))?,
                "🌍 Geographic Distribution",
            )],
            View::MarketTypes => vec![photo(
                chart::distribution_chart("Distribution by Type", &market_types(&ledger, &prices))?,
                "📊 Distribution by Type",
            )],
            View::Yearly => {
                let rows = yearly_breakdown(&ledger, &prices, today, self.default_ter);
                vec![Reply::Text(text::yearly_text(&rows))]
            }
            View::FullReport => {
                if report.is_empty() {
                    return Ok(vec![Reply::Text(NO_DATA.to_string())]);
                }
                vec![
                    metrics_reply(&report, now),
                    photo(chart::holdings_table(&report)?, "📊 Portfolio Table"),
                    photo(chart::composition_chart(&report)?, "🥧 Portfolio Composition"),
                    Reply::Text("✅ Full report sent!".to_string()),
                ]
            }
        };
        Ok(replies)
    }
}

const NO_DATA: &str = "❌ No data available.";

fn metrics_reply(report: &PortfolioReport, now: chrono::NaiveDateTime) -> Reply {
    if report.is_empty() {
        return Reply::Text(NO_DATA.to_string());
    }
    Reply::Text(text::summary_text(report, now))
}

fn photo(png: Vec<u8>, caption: &str) -> Reply {
    Reply::Photo {
        png,
        caption: caption.to_string(),
    }
}

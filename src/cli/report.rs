//! Handler for the `report` command.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::adapter::market::{MarketData, YahooProvider};
use crate::adapter::portfolio::LedgerPortfolio;
use crate::adapter::render::{chart, text};
use crate::cli::{output, Cli, ReportArgs};
use crate::domain::{geographic, market_types, yearly_breakdown, PortfolioReport};
use crate::error::{RenderError, Result};
use crate::port::{PortfolioSnapshot, PortfolioSource};

/// Print the report and, unless disabled, write the charts.
pub async fn execute(cli: &Cli, args: &ReportArgs) -> Result<()> {
    let config = cli.load_config()?;
    let market = MarketData::new(Arc::new(YahooProvider::new()?), &config.portfolio);
    let source = LedgerPortfolio::new(&config.portfolio, market);

    output::progress("Loading portfolio");
    let snapshot = match source.snapshot().await {
        Ok(snapshot) => {
            output::progress_done(true);
            snapshot
        }
        Err(e) => {
            output::progress_done(false);
            return Err(e);
        }
    };

    let now = Local::now().naive_local();
    output::block(&render_report(&snapshot, config.portfolio.default_ter, now));

    if !args.no_charts {
        let written = write_charts(&snapshot, config.portfolio.default_ter, now, &args.output)?;
        output::section("Charts");
        for path in &written {
            output::ok(&path.display().to_string());
        }
    }
    Ok(())
}

/// Metrics, holdings, distributions and yearly tables as terminal text.
#[must_use]
pub fn render_report(snapshot: &PortfolioSnapshot, default_ter: f64, now: NaiveDateTime) -> String {
    let PortfolioSnapshot { ledger, prices } = snapshot;
    let today = now.date();
    let report = PortfolioReport::compute(ledger, prices, today, default_ter);

    let mut sections = vec![text::summary_text(&report, now)];
    if report.is_empty() {
        sections.push("No holdings with price data.".to_string());
        return sections.join("\n\n");
    }

    sections.push(format!("Holdings\n{}", text::holdings_table(&report)));

    let geo = geographic(ledger, prices);
    if !geo.is_empty() {
        sections.push(format!("Geographic distribution\n{}", text::distribution_table(&geo)));
    }
    let kinds = market_types(ledger, prices);
    if !kinds.is_empty() {
        sections.push(format!("Market types\n{}", text::distribution_table(&kinds)));
    }

    let rows = yearly_breakdown(ledger, prices, today, default_ter);
    if rows.iter().any(|r| r.base() > 0.0) {
        sections.push(format!("Yearly performance\n{}", text::yearly_table(&rows)));
    }

    sections.join("\n\n")
}

/// Render every chart into `dir`, skipping the ones without data.
pub fn write_charts(
    snapshot: &PortfolioSnapshot,
    default_ter: f64,
    now: NaiveDateTime,
    dir: &Path,
) -> Result<Vec<PathBuf>> {
    let PortfolioSnapshot { ledger, prices } = snapshot;
    let today = now.date();
    let report = PortfolioReport::compute(ledger, prices, today, default_ter);

    fs::create_dir_all(dir)?;
    let charts: [(&str, std::result::Result<Vec<u8>, RenderError>); 5] = [
        ("holdings.png", chart::holdings_table(&report)),
        ("composition.png", chart::composition_chart(&report)),
        ("trend.png", chart::trend_chart(prices, &ledger.names(), today)),
        (
            "geographic.png",
            chart::distribution_chart("Geographic Distribution", &geographic(ledger, prices)),
        ),
        (
            "market_types.png",
            chart::distribution_chart("Distribution by Type", &market_types(ledger, prices)),
        ),
    ];

    let mut written = Vec::new();
    for (file, png) in charts {
        match png {
            Ok(png) => {
                let path = dir.join(file);
                fs::write(&path, png)?;
                info!(path = %path.display(), "Chart written");
                written.push(path);
            }
            Err(RenderError::NoData(reason)) => {
                warn!(chart = file, reason, "Chart skipped");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(written)
}

//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod qr;
pub mod report;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;

/// qrfolio - QR codes and portfolio reports over Telegram.
#[derive(Parser, Debug)]
#[command(name = "qrfolio")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the Telegram bot (foreground)
    Run(RunArgs),

    /// Write the QR code of a link to a PNG file
    Qr(QrArgs),

    /// Print the portfolio report and save its charts
    Report(ReportArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `qrfolio check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config,
    /// Locate and parse the ledger
    Ledger,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Disable the portfolio commands
    #[arg(long)]
    pub no_portfolio: bool,
}

/// Arguments for the `qr` subcommand.
#[derive(Parser, Debug)]
pub struct QrArgs {
    /// Link to encode (http or https)
    pub url: String,

    /// Output PNG file
    #[arg(short, long, default_value = "qrcode.png")]
    pub output: PathBuf,

    /// Pixels per module (overrides [qr] box_size)
    #[arg(short = 's', long)]
    pub box_size: Option<u32>,

    /// Quiet zone width in modules (overrides [qr] border)
    #[arg(short, long)]
    pub border: Option<u32>,
}

/// Arguments for the `report` subcommand.
#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Directory the chart images are written to
    #[arg(short, long, default_value = "report")]
    pub output: PathBuf,

    /// Print the tables only
    #[arg(long)]
    pub no_charts: bool,
}

impl Cli {
    /// Load the configuration (defaults when the file is missing), apply
    /// command-line overrides and start logging.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
        if let Commands::Run(args) = &self.command {
            if args.json_logs {
                config.logging.format = "json".to_string();
            }
            if args.no_portfolio {
                config.portfolio.enabled = false;
            }
        }
        config.init_logging();
        Ok(config)
    }
}

use clap::Parser;
use tracing::error;

use qrfolio::cli::{check, output, qr, report, run, CheckCommand, Cli, Commands};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Run(_) => run::execute(&cli).await,
        Commands::Qr(args) => qr::execute(&cli, args),
        Commands::Report(args) => report::execute(&cli, args).await,
        Commands::Check(CheckCommand::Config) => check::execute_config(&cli),
        Commands::Check(CheckCommand::Ledger) => check::execute_ledger(&cli),
    };

    if let Err(e) = result {
        error!(error = %e, "Fatal error");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

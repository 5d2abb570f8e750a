//! Handler for the `qr` command.

use tracing::info;

use crate::adapter::render::QrRenderer;
use crate::cli::{output, Cli, QrArgs};
use crate::error::Result;

/// Encode the link and write the PNG.
pub fn execute(cli: &Cli, args: &QrArgs) -> Result<()> {
    let config = cli.load_config()?;
    let renderer = QrRenderer::new(
        args.box_size.unwrap_or(config.qr.box_size),
        args.border.unwrap_or(config.qr.border),
    );

    renderer.write_png(args.url.trim(), &args.output)?;
    info!(url = %args.url, path = %args.output.display(), "QR code written");
    output::ok(&format!("QR code written to {}", args.output.display()));
    Ok(())
}

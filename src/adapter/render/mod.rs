//! Text, table, chart and QR renderings.

pub mod chart;
pub mod qr;
pub mod text;

pub use qr::QrRenderer;

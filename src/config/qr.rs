//! QR code rendering configuration.

use serde::Deserialize;

/// Size settings for generated QR images.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QrConfig {
    /// Pixels per QR module.
    #[serde(default = "default_box_size")]
    pub box_size: u32,
    /// Quiet zone width, in modules.
    #[serde(default = "default_border")]
    pub border: u32,
}

const fn default_box_size() -> u32 {
    10
}

const fn default_border() -> u32 {
    4
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            box_size: default_box_size(),
            border: default_border(),
        }
    }
}

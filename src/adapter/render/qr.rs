//! QR code rendering to PNG.

use std::io::Cursor;
use std::path::Path;

use image::{imageops, GrayImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};
use tracing::debug;

use crate::config::QrConfig;
use crate::error::{Error, RenderError, Result};

const WHITE: Luma<u8> = Luma([255]);

/// Renders links as black-on-white QR codes with high error correction.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    /// Pixels per module.
    box_size: u32,
    /// Quiet zone width, in modules.
    border: u32,
}

impl QrRenderer {
    #[must_use]
    pub fn new(box_size: u32, border: u32) -> Self {
        Self {
            box_size: box_size.max(1),
            border,
        }
    }

    /// Encode `data` and return the image.
    pub fn image(&self, data: &str) -> std::result::Result<GrayImage, RenderError> {
        let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::H)
            .map_err(|e| RenderError::Qr(e.to_string()))?;

        let modules = code
            .render::<Luma<u8>>()
            .quiet_zone(false)
            .module_dimensions(self.box_size, self.box_size)
            .build();

        let margin = self.border * self.box_size;
        let mut canvas = GrayImage::from_pixel(
            modules.width() + 2 * margin,
            modules.height() + 2 * margin,
            WHITE,
        );
        imageops::overlay(&mut canvas, &modules, i64::from(margin), i64::from(margin));
        debug!(
            version = ?code.version(),
            pixels = canvas.width(),
            "QR code rendered"
        );
        Ok(canvas)
    }

    /// Encode `data` as PNG bytes.
    pub fn png(&self, data: &str) -> std::result::Result<Vec<u8>, RenderError> {
        let image = self.image(data)?;
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(out.into_inner())
    }

    /// Validate `url`, then write its QR code to `path`.
    pub fn write_png(&self, url: &str, path: &Path) -> Result<()> {
        if !crate::domain::is_valid_url(url) {
            return Err(Error::InvalidLink(url.to_string()));
        }
        let png = self.png(url)?;
        std::fs::write(path, png)?;
        Ok(())
    }
}

impl From<&QrConfig> for QrRenderer {
    fn from(config: &QrConfig) -> Self {
        Self::new(config.box_size, config.border)
    }
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::from(&QrConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_has_quiet_zone_and_scaled_modules() {
        let renderer = QrRenderer::new(3, 2);
        let image = renderer.image("https://example.com").unwrap();

        // Width is (modules + 2 * border) * box_size, and a multiple of box_size.
        assert_eq!(image.width(), image.height());
        assert_eq!(image.width() % 3, 0);
        let modules = image.width() / 3 - 4;
        assert!(modules >= 21);
        assert_eq!((modules - 17) % 4, 0);

        // Quiet zone is white; the finder pattern corner is black.
        assert_eq!(*image.get_pixel(0, 0), WHITE);
        assert_eq!(*image.get_pixel(5, 5), WHITE);
        assert_eq!(image.get_pixel(6, 6).0[0], 0);
    }

    #[test]
    fn png_has_signature() {
        let png = QrRenderer::default().png("https://example.com/path").unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn longer_data_needs_a_larger_code() {
        let renderer = QrRenderer::new(1, 0);
        let short = renderer.image("https://a.io").unwrap();
        let long = renderer
            .image(&format!("https://example.com/{}", "x".repeat(200)))
            .unwrap();
        assert!(long.width() > short.width());
    }

    #[test]
    fn write_png_rejects_invalid_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr.png");
        let err = QrRenderer::default().write_png("not a url", &path).unwrap_err();
        assert!(matches!(err, Error::InvalidLink(_)));
        assert!(!path.exists());
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};
use termviz_core::{Dimensions, ScalarImage};

/// A grayscale raster decoded with the `image` crate.
///
/// Colour inputs are converted to 8-bit luma, so values range over 0–255.
/// Pair with [`termviz_core::Rescale`] (or
/// [`imshow_scaled`](crate::sixel::imshow_scaled)) to map them onto a palette.
#[derive(Debug, Clone)]
pub struct LumaSource {
    pixels: GrayImage,
}

impl LumaSource {
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            pixels: image.to_luma8(),
        }
    }

    /// Decode an encoded image (any format enabled in the `image` crate).
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("failed to decode image data")?;
        Ok(Self::from_dynamic(image))
    }

    /// Load and decode an image file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let source = Self::from_memory(&bytes)
            .with_context(|| format!("invalid image at {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            width = source.width(),
            height = source.height(),
            "loaded image"
        );
        Ok(source)
    }
}

impl Dimensions for LumaSource {
    fn width(&self) -> usize {
        self.pixels.width() as usize
    }

    fn height(&self) -> usize {
        self.pixels.height() as usize
    }
}

impl ScalarImage for LumaSource {
    fn value_at(&self, x: usize, y: usize) -> f64 {
        f64::from(self.pixels.get_pixel(x as u32, y as u32).0[0])
    }
}

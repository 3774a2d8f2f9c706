use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, Rgb, RgbImage};

/// A single camera frame as 8-bit RGB samples.
#[derive(Debug, Clone)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    /// Frame where every pixel has the same value on all three channels.
    pub fn uniform(width: u32, height: u32, value: u8) -> Self {
        Self::filled(width, height, [value, value, value])
    }

    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::new(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("failed to load frame from {}", path.display()))?;
        Ok(Self::from(image))
    }

    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).context("failed to decode frame")?;
        Ok(Self::from(image))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Mean of `0.299R + 0.587G + 0.114B` over all pixels, 0-255 scale.
    /// An empty frame has luminance 0.
    pub fn average_luminance(&self) -> f64 {
        let count = u64::from(self.width()) * u64::from(self.height());
        if count == 0 {
            return 0.0;
        }

        let sum: f64 = self
            .pixels
            .pixels()
            .map(|Rgb([r, g, b])| {
                0.299 * f64::from(*r) + 0.587 * f64::from(*g) + 0.114 * f64::from(*b)
            })
            .sum();

        sum / count as f64
    }
}

impl From<DynamicImage> for Frame {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.into_rgb8())
    }
}

impl From<RgbImage> for Frame {
    fn from(pixels: RgbImage) -> Self {
        Self::new(pixels)
    }
}

/// Average-luminance check run before inference.
#[derive(Debug, Clone, Copy)]
pub struct LightingGate {
    threshold: f64,
}

impl LightingGate {
    pub const DEFAULT_THRESHOLD: f64 = 40.0;

    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True when the frame is strictly brighter than the threshold.
    pub fn passes(&self, frame: &Frame) -> bool {
        frame.average_luminance() > self.threshold
    }
}

impl Default for LightingGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

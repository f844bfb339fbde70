//! Raster sampling interface and sample buffers.
//!
//! The page raster itself is owned by the collaborator that decoded the
//! source document (PDF page, scan, photo). The engine never mutates it; it
//! only reads rectangular RGBA samples through [`RasterSource`], crops them
//! for content generation, and downscales them before tracing.

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbaImage;
use pagevec_core::{EditorError, PxRect};
use std::io::Cursor;

/// A rectangular RGBA8 bitmap sample, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterSample {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSample {
    /// Creates a sample, validating that the buffer length matches the
    /// declared dimensions.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> pagevec_core::Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EditorError::SampleBufferMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA channels of the pixel at (x, y).
    ///
    /// Callers must stay in bounds; the tracer iterates `0..width` and
    /// `0..height` only.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Downscales the sample so its long edge is at most `max_edge`,
    /// preserving aspect ratio. Samples already within the cap are returned
    /// unchanged.
    pub fn downscale_to_fit(&self, max_edge: u32) -> RasterSample {
        if self.width <= max_edge && self.height <= max_edge {
            return self.clone();
        }
        let factor = max_edge as f64 / self.width.max(self.height) as f64;
        let new_w = ((self.width as f64 * factor).round() as u32).max(1);
        let new_h = ((self.height as f64 * factor).round() as u32).max(1);

        // Buffer length was validated at construction, from_raw cannot fail.
        let img = RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height));
        let resized = image::imageops::resize(&img, new_w, new_h, FilterType::Triangle);
        RasterSample {
            width: new_w,
            height: new_h,
            pixels: resized.into_raw(),
        }
    }

    /// Encodes the sample as PNG bytes for the cached debug crop artifact.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let img = RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .context("sample buffer does not match its dimensions")?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .context("failed to encode crop as PNG")?;
        Ok(out)
    }
}

/// Read access to the decoded page raster.
///
/// Implemented by the page-loading collaborator. `sample` returns the RGBA
/// pixels under a pixel-space rectangle; coordinates outside the canvas are
/// clamped by the implementor.
pub trait RasterSource {
    /// Canvas width in pixels, > 0.
    fn canvas_width(&self) -> u32;

    /// Canvas height in pixels, > 0.
    fn canvas_height(&self) -> u32;

    /// Samples the rectangle (pixel space) from the page raster.
    fn sample(&self, rect: PxRect) -> RasterSample;
}

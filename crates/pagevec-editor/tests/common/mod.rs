//! Shared fixtures for the editor integration tests.
#![allow(dead_code)]

use pagevec_core::PxRect;
use pagevec_editor::model::LayoutOracle;
use pagevec_editor::raster::{RasterSample, RasterSource};
use pagevec_editor::region::Region;

/// Initializes test logging once; repeated calls are harmless.
pub fn init_logs() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A page raster filled with one color.
pub struct SolidRaster {
    pub width: u32,
    pub height: u32,
    pub rgba: [u8; 4],
}

impl SolidRaster {
    pub fn white(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: [255, 255, 255, 255],
        }
    }

    pub fn black(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: [0, 0, 0, 255],
        }
    }
}

impl RasterSource for SolidRaster {
    fn canvas_width(&self) -> u32 {
        self.width
    }

    fn canvas_height(&self) -> u32 {
        self.height
    }

    fn sample(&self, rect: PxRect) -> RasterSample {
        let w = rect.w.round().max(0.0) as u32;
        let h = rect.h.round().max(0.0) as u32;
        let mut pixels = Vec::with_capacity(w as usize * h as usize * 4);
        for _ in 0..w * h {
            pixels.extend_from_slice(&self.rgba);
        }
        RasterSample::new(w, h, pixels).expect("solid sample buffer")
    }
}

/// Layout oracle answering from fixed per-element boxes.
#[derive(Default)]
pub struct StubOracle {
    pub rendered: Vec<PxRect>,
    pub local: Vec<PxRect>,
    pub content_local: Option<PxRect>,
}

impl LayoutOracle for StubOracle {
    fn element_rendered_bounds(&self, _region: &Region, element_index: usize) -> Option<PxRect> {
        self.rendered.get(element_index).copied()
    }

    fn element_local_bounds(&self, _region: &Region, element_index: usize) -> Option<PxRect> {
        self.local.get(element_index).copied()
    }

    fn content_local_bounds(&self, _region: &Region) -> Option<PxRect> {
        self.content_local
    }
}

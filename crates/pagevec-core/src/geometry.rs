//! Unit-space and pixel-space rectangle math.
//!
//! Region placement is stored in unit space: every coordinate is a fraction
//! of the page canvas dimensions, so placements survive re-rasterizing the
//! page at a different DPI. Pixel space is only materialized at the edges
//! (raster sampling, composition) via [`Rect::to_px`].

use serde::{Deserialize, Serialize};

/// Rectangle in unit space (fractions of the canvas dimensions).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// Rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PxRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// A width/height pair, used for a region's local content coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

/// A 2D vector, used for the per-region scale and offset transform parts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Normalizes a pixel rectangle against the canvas dimensions.
    ///
    /// No rounding is applied; callers decide precision. Canvas dimensions
    /// must be nonzero: a zero dimension yields NaN/Infinity components,
    /// which is treated as a caller bug (sessions validate dimensions once
    /// at construction).
    pub fn from_px(px: PxRect, canvas_w: f64, canvas_h: f64) -> Self {
        Self {
            x: px.x / canvas_w,
            y: px.y / canvas_h,
            w: px.w / canvas_w,
            h: px.h / canvas_h,
        }
    }

    /// Denormalizes back to pixel space. Exact inverse of [`Rect::from_px`]
    /// for nonzero canvas dimensions.
    pub fn to_px(&self, canvas_w: f64, canvas_h: f64) -> PxRect {
        PxRect {
            x: self.x * canvas_w,
            y: self.y * canvas_h,
            w: self.w * canvas_w,
            h: self.h * canvas_h,
        }
    }

    /// Returns true when both dimensions are strictly positive.
    pub fn has_area(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &Rect) -> Rect {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = (self.x + self.w).max(other.x + other.w);
        let y2 = (self.y + self.h).max(other.y + other.h);
        Rect::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Point containment test (inclusive edges), in unit space.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

impl PxRect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn has_area(&self) -> bool {
        self.w > 0.0 && self.h > 0.0
    }
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Identity scale.
    pub fn one() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// Zero offset.
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

//! Error handling for PageVec
//!
//! Provides error types for the editing engine:
//! - Geometry errors (degenerate rectangles, zero-sized canvases)
//! - Editor errors (structural operation preconditions)
//! - Document errors (save/load)
//!
//! All error types use `thiserror` for ergonomic error handling. Nothing in
//! the engine is fatal to the process: failures are scoped to one region or
//! one operation. Operations addressing a stale or deleted region id are
//! no-ops rather than errors.

use thiserror::Error;

/// Geometry validation error
///
/// Raised at the call site before any mutation happens, so a rejected
/// operation never leaves partial state behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Canvas dimensions must be strictly positive
    #[error("Canvas dimensions must be positive, got {width}x{height}")]
    ZeroCanvas {
        /// The offending canvas width.
        width: u32,
        /// The offending canvas height.
        height: u32,
    },

    /// Rectangle with a zero or negative dimension
    #[error("Rectangle has degenerate dimensions {w}x{h}")]
    EmptyRect {
        /// The offending width.
        w: f64,
        /// The offending height.
        h: f64,
    },

    /// Raster sample with a zero dimension
    #[error("Raster sample has degenerate dimensions {width}x{height}")]
    EmptySample {
        /// The offending sample width.
        width: u32,
        /// The offending sample height.
        height: u32,
    },
}

/// Editor operation error
#[derive(Error, Debug)]
pub enum EditorError {
    /// Invalid geometry supplied to an operation
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryError),

    /// Grouping requires at least two regions
    #[error("Grouping requires at least 2 regions, got {count}")]
    GroupTooSmall {
        /// Number of regions actually selected.
        count: usize,
    },

    /// Raster sample buffer does not match its declared dimensions
    #[error("Pixel buffer length {len} does not match {width}x{height} RGBA")]
    SampleBufferMismatch {
        /// Declared sample width.
        width: u32,
        /// Declared sample height.
        height: u32,
        /// Actual buffer length in bytes.
        len: usize,
    },

    /// Document file I/O failure
    #[error("Document I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Document (de)serialization failure
    #[error("Document format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Convenience result alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

//! # PageVec Core
//!
//! Core types and utilities for PageVec.
//! Provides the fundamental abstractions shared by the editing engine:
//! unit-space geometry, region identifiers, and the error taxonomy.

pub mod error;
pub mod geometry;
pub mod id;

pub use error::{EditorError, GeometryError, Result};
pub use geometry::{PxRect, Rect, Size, Vec2};
pub use id::RegionId;

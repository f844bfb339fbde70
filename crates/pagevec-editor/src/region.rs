//! The region entity.

use pagevec_core::{Rect, RegionId, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a region.
///
/// A region starts as a `Draft` placement with no content, becomes
/// `Generated` once content is attached, `Optimized` after a split or text
/// merge pass, and `Grouped` when it was produced by grouping other
/// regions. Content edits never move a region back to `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionStatus {
    Draft,
    Generated,
    Optimized,
    Grouped,
}

/// Kind of placeholder content installed when a crop is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Traced ink as a filled path placeholder.
    Text,
    /// A placeholder box marking an illustration area.
    Image,
    /// No placeholder; content arrives later.
    Empty,
}

/// A placed rectangle on the page carrying independently owned vector
/// content.
///
/// `rect` is the unit-space placement on the canvas. `content_size` is the
/// intrinsic coordinate frame of `svg_content` (its local viewBox),
/// independent of the placement size; content coordinates live in
/// `[0, content_size.w] x [0, content_size.h]`. `scale` then `offset` are
/// applied to the content when composed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub rect: Rect,
    pub status: RegionStatus,
    pub content_size: Size,
    pub svg_content: String,
    pub scale: Vec2,
    pub offset: Vec2,
    /// Cached PNG of the source crop, for inspection only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_crop: Option<Vec<u8>>,
    /// Traced preview path of the source crop, for inspection only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,
    /// Most recent content-generation failure, cleared on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_error: Option<String>,
}

impl Region {
    /// Creates a draft region: a placement with no content yet.
    pub fn draft(rect: Rect) -> Self {
        Self {
            id: RegionId::new(),
            rect,
            status: RegionStatus::Draft,
            content_size: Size::new(0.0, 0.0),
            svg_content: String::new(),
            scale: Vec2::one(),
            offset: Vec2::zero(),
            src_crop: None,
            blueprint: None,
            generation_error: None,
        }
    }

    /// True when the region carries vector content. Draft placeholders and
    /// emptied regions return false and are skipped by composition.
    pub fn has_content(&self) -> bool {
        !self.svg_content.is_empty()
    }

    /// Resets the content transform to identity scale and zero offset.
    pub fn reset_transform(&mut self) {
        self.scale = Vec2::one();
        self.offset = Vec2::zero();
    }
}

//! The region collection and its structural operations.
//!
//! `RegionModel` owns the ordered region collection (insertion order is
//! z-order, later regions draw on top) and implements every structural
//! edit: draft creation, content attachment, move/resize, the two fit
//! operations, split, group, text-run merging, and deletion.
//!
//! Operations addressing a missing region id are warn-level no-ops, never
//! errors: a stale id simply means the region was deleted under an
//! outstanding interaction. Geometry preconditions are rejected up front so
//! a failed operation leaves no partial state.

use crate::compositor::write_region_block;
use crate::fragment;
use crate::raster::RasterSample;
use crate::region::{ContentMode, Region, RegionStatus};
use crate::tracer;
use pagevec_core::{EditorError, GeometryError, PxRect, Rect, RegionId, Result, Size, Vec2};
use tracing::{debug, warn};

/// Long-edge cap for a region's local content frame. Crops larger than this
/// are downscaled before tracing so content coordinates stay small.
pub const MAX_CONTENT_EDGE: u32 = 300;

/// Measurement capability injected by the rendering collaborator.
///
/// The fit and split operations need post-layout bounding boxes that only
/// the renderer can produce. Bounds are only well-defined once the region's
/// content has been composited at least once; callers own that precondition.
pub trait LayoutOracle {
    /// Rendered bounding box of one top-level content element, in canvas
    /// pixels (after the region's placement and transform are applied).
    fn element_rendered_bounds(&self, region: &Region, element_index: usize) -> Option<PxRect>;

    /// Intrinsic bounding box of one top-level content element, in the
    /// region's local content space (before scale/offset).
    fn element_local_bounds(&self, region: &Region, element_index: usize) -> Option<PxRect>;

    /// Tight bounding box of the region's whole content in local content
    /// space (before scale/offset).
    fn content_local_bounds(&self, region: &Region) -> Option<PxRect>;
}

/// Ordered collection of regions plus the structural operations on it.
#[derive(Debug, Clone, Default)]
pub struct RegionModel {
    regions: Vec<Region>,
}

impl RegionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    fn position(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    /// Replaces the whole collection (undo/redo restore path).
    pub fn restore(&mut self, regions: Vec<Region>) {
        self.regions = regions;
    }

    /// Creates a draft region: placement only, no content.
    ///
    /// The rectangle must have positive dimensions; near-zero drags are the
    /// caller's to discard before calling.
    pub fn create_draft(&mut self, rect: Rect) -> Result<RegionId> {
        if !rect.has_area() {
            return Err(GeometryError::EmptyRect {
                w: rect.w,
                h: rect.h,
            }
            .into());
        }
        let region = Region::draft(rect);
        let id = region.id;
        debug!(%id, "created draft region");
        self.regions.push(region);
        Ok(id)
    }

    /// Attaches a source crop to a region: fixes the local content frame to
    /// the (possibly downscaled) crop size, traces the blueprint preview,
    /// caches the debug artifacts, and installs placeholder content for
    /// `mode`. Scale and offset are reset.
    ///
    /// Returns false when the region no longer exists.
    pub fn attach_content(
        &mut self,
        id: RegionId,
        sample: &RasterSample,
        mode: ContentMode,
    ) -> Result<bool> {
        if sample.width() == 0 || sample.height() == 0 {
            return Err(GeometryError::EmptySample {
                width: sample.width(),
                height: sample.height(),
            }
            .into());
        }
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "attach_content: region no longer exists");
            return Ok(false);
        };

        let scaled = sample.downscale_to_fit(MAX_CONTENT_EDGE);
        let blueprint = tracer::trace_runs(&scaled);
        let content_size = Size::new(scaled.width() as f64, scaled.height() as f64);

        region.svg_content = match mode {
            ContentMode::Text if blueprint.is_empty() => String::new(),
            ContentMode::Text => {
                format!(r##"<path d="{}" fill="#000000"/>"##, blueprint)
            }
            ContentMode::Image => format!(
                r##"<rect x="0" y="0" width="{}" height="{}" fill="none" stroke="#888888" stroke-width="1"/>"##,
                scaled.width(),
                scaled.height(),
            ),
            ContentMode::Empty => String::new(),
        };
        region.content_size = content_size;
        region.blueprint = Some(blueprint);
        region.src_crop = match sample.encode_png() {
            Ok(png) => Some(png),
            Err(err) => {
                warn!(%id, "failed to encode crop artifact: {err:#}");
                None
            }
        };
        region.reset_transform();
        region.status = RegionStatus::Generated;
        region.generation_error = None;
        Ok(true)
    }

    /// Wholesale content replacement (the generation-callback path).
    ///
    /// Resets the transform; the local content frame fixed by the preceding
    /// [`RegionModel::attach_content`] is kept. The region's non-draft
    /// status is preserved.
    pub fn replace_content(&mut self, id: RegionId, markup: String) -> bool {
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "replace_content: region no longer exists");
            return false;
        };
        region.svg_content = markup;
        region.reset_transform();
        if region.status == RegionStatus::Draft {
            region.status = RegionStatus::Generated;
        }
        region.generation_error = None;
        true
    }

    /// Records a region-local generation failure; prior content is kept.
    pub fn set_generation_error(&mut self, id: RegionId, reason: String) -> bool {
        let Some(region) = self.get_mut(id) else {
            debug!(%id, "generation error for vanished region dropped");
            return false;
        };
        warn!(%id, "content generation failed: {reason}");
        region.generation_error = Some(reason);
        true
    }

    /// Replaces the region's placement wholesale. Content, transform, and
    /// local frame are untouched.
    pub fn move_or_resize(&mut self, id: RegionId, rect: Rect) -> Result<bool> {
        if !rect.has_area() {
            return Err(GeometryError::EmptyRect {
                w: rect.w,
                h: rect.h,
            }
            .into());
        }
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "move_or_resize: region no longer exists");
            return Ok(false);
        };
        region.rect = rect;
        Ok(true)
    }

    /// Re-anchors the local coordinate frame to a measured content box.
    ///
    /// `local_bounds` is the tight box of the rendered content before the
    /// current scale/offset was applied. The local frame becomes exactly
    /// that box: `content_size` takes its size, scale resets, and the
    /// offset shifts content so the box origin lands on (0,0).
    pub fn fit_content_to_area(&mut self, id: RegionId, local_bounds: PxRect) -> bool {
        if !local_bounds.has_area() {
            warn!(%id, "fit_content_to_area: degenerate content bounds, skipping");
            return false;
        }
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "fit_content_to_area: region no longer exists");
            return false;
        };
        region.content_size = Size::new(local_bounds.w, local_bounds.h);
        region.scale = Vec2::one();
        region.offset = Vec2::new(-local_bounds.x, -local_bounds.y);
        true
    }

    /// Shrinks (or grows) the region's placement to exactly cover its
    /// rendered content, then re-anchors the local frame to the new
    /// container.
    ///
    /// `rendered_bounds` is the content's post-transform box in canvas
    /// pixels, as measured by the rendering collaborator.
    pub fn fit_area_to_content(
        &mut self,
        id: RegionId,
        rendered_bounds: PxRect,
        canvas_w: u32,
        canvas_h: u32,
    ) -> bool {
        if !rendered_bounds.has_area() {
            warn!(%id, "fit_area_to_content: degenerate rendered bounds, skipping");
            return false;
        }
        let (w, h) = (canvas_w as f64, canvas_h as f64);
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "fit_area_to_content: region no longer exists");
            return false;
        };
        let rect_px = region.rect.to_px(w, h);
        if !rect_px.has_area()
            || region.content_size.w <= 0.0
            || region.content_size.h <= 0.0
            || region.scale.x == 0.0
            || region.scale.y == 0.0
        {
            warn!(%id, "fit_area_to_content: region has no measurable content frame");
            return false;
        }

        // Map the rendered box back through the viewport stretch and the
        // content transform to recover the pre-transform local box.
        let units_per_px_x = region.content_size.w / rect_px.w;
        let units_per_px_y = region.content_size.h / rect_px.h;
        let view_x = (rendered_bounds.x - rect_px.x) * units_per_px_x;
        let view_y = (rendered_bounds.y - rect_px.y) * units_per_px_y;
        let view_w = rendered_bounds.w * units_per_px_x;
        let view_h = rendered_bounds.h * units_per_px_y;
        let local = PxRect::new(
            (view_x - region.offset.x) / region.scale.x,
            (view_y - region.offset.y) / region.scale.y,
            view_w / region.scale.x,
            view_h / region.scale.y,
        );

        region.rect = Rect::from_px(rendered_bounds, w, h);
        self.fit_content_to_area(id, local)
    }

    /// Extracts top-level content elements into regions of their own.
    ///
    /// Each extracted element becomes a new region placed at the element's
    /// rendered box, with the element's intrinsic box as its local frame
    /// and the element anchored at the local origin. Extracted elements are
    /// removed from the source; a source left with no content is deleted,
    /// otherwise it is re-anchored to its remaining content.
    ///
    /// New regions are appended in ascending element-index order. Returns
    /// their ids.
    pub fn split_out(
        &mut self,
        id: RegionId,
        element_indices: &[usize],
        oracle: &dyn LayoutOracle,
        canvas_w: u32,
        canvas_h: u32,
    ) -> Result<Vec<RegionId>> {
        let (w, h) = (canvas_w as f64, canvas_h as f64);
        let Some(pos) = self.position(id) else {
            warn!(%id, "split_out: region no longer exists");
            return Ok(Vec::new());
        };
        let source = self.regions[pos].clone();
        let elements = fragment::parse_fragment(&source.svg_content);
        if elements.is_empty() {
            warn!(%id, "split_out: no recognizable content elements");
            return Ok(Vec::new());
        }

        let mut indices: Vec<usize> = element_indices
            .iter()
            .copied()
            .filter(|&i| i < elements.len())
            .collect();
        indices.sort_unstable();
        indices.dedup();

        let mut extracted = Vec::new();
        let mut new_regions = Vec::new();
        for &idx in &indices {
            let Some(rendered) = oracle.element_rendered_bounds(&source, idx) else {
                warn!(%id, idx, "split_out: element has no rendered bounds, skipping");
                continue;
            };
            let Some(local) = oracle.element_local_bounds(&source, idx) else {
                warn!(%id, idx, "split_out: element has no local bounds, skipping");
                continue;
            };
            if !rendered.has_area() || !local.has_area() {
                warn!(%id, idx, "split_out: degenerate element bounds, skipping");
                continue;
            }
            let mut region = Region::draft(Rect::from_px(rendered, w, h));
            region.status = RegionStatus::Optimized;
            region.content_size = Size::new(local.w, local.h);
            region.svg_content = elements[idx].clone();
            region.offset = Vec2::new(-local.x, -local.y);
            extracted.push(idx);
            new_regions.push(region);
        }
        if extracted.is_empty() {
            return Ok(Vec::new());
        }

        // Remove from highest index down so earlier indices stay valid.
        let mut remaining = source.svg_content.clone();
        for &idx in extracted.iter().rev() {
            remaining = fragment::remove_element_at(&remaining, idx);
        }

        if extracted.len() == elements.len() {
            debug!(%id, "split_out: source emptied, deleting it");
            self.regions.remove(pos);
        } else {
            {
                let region = &mut self.regions[pos];
                region.svg_content = remaining;
                region.status = RegionStatus::Optimized;
            }
            if let Some(bounds) = oracle.content_local_bounds(&self.regions[pos]) {
                self.fit_content_to_area(id, bounds);
            }
        }

        let ids = new_regions.iter().map(|r| r.id).collect();
        self.regions.extend(new_regions);
        Ok(ids)
    }

    /// Collapses two or more regions into one grouped region covering their
    /// union rectangle.
    ///
    /// Each member is embedded as a nested coordinate-system block at its
    /// offset inside the union, carrying its own local frame, transform,
    /// and content unchanged, so the group composes exactly as the members
    /// did individually. Members are removed and the group is appended on
    /// top of the z-order.
    pub fn group(&mut self, ids: &[RegionId], canvas_w: u32, canvas_h: u32) -> Result<RegionId> {
        let (w, h) = (canvas_w as f64, canvas_h as f64);
        let members: Vec<usize> = self
            .regions
            .iter()
            .enumerate()
            .filter(|(_, r)| ids.contains(&r.id))
            .map(|(i, _)| i)
            .collect();
        if members.len() < 2 {
            return Err(EditorError::GroupTooSmall {
                count: members.len(),
            });
        }

        let union = members
            .iter()
            .skip(1)
            .fold(self.regions[members[0]].rect, |acc, &i| {
                acc.union(&self.regions[i].rect)
            });

        let mut content = String::new();
        for &i in &members {
            let member = &self.regions[i];
            let placement = PxRect::new(
                (member.rect.x - union.x) * w,
                (member.rect.y - union.y) * h,
                member.rect.w * w,
                member.rect.h * h,
            );
            write_region_block(&mut content, member, placement);
        }

        let mut group = Region::draft(union);
        group.status = RegionStatus::Grouped;
        group.content_size = Size::new(union.w * w, union.h * h);
        group.svg_content = content;
        let group_id = group.id;

        self.regions.retain(|r| !ids.contains(&r.id));
        self.regions.push(group);
        debug!(%group_id, members = members.len(), "grouped regions");
        Ok(group_id)
    }

    /// Collapses adjacent same-style text runs in the region's content.
    /// Everything but the content string is left unchanged.
    pub fn optimize(&mut self, id: RegionId) -> bool {
        let Some(region) = self.get_mut(id) else {
            warn!(%id, "optimize: region no longer exists");
            return false;
        };
        region.svg_content = fragment::merge_adjacent_text_runs(&region.svg_content);
        true
    }

    /// Removes the listed regions. Returns how many were removed.
    pub fn remove(&mut self, ids: &[RegionId]) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| !ids.contains(&r.id));
        before - self.regions.len()
    }
}

//! The owned editor session: region collection, selection, history, and
//! content-generation bookkeeping.
//!
//! `EditorSession` is the single entry point UI collaborators drive. It is
//! single-threaded and synchronous: every operation runs to completion
//! before the next external event is processed, and each logically complete
//! mutation commits exactly one history snapshot. The only asynchronous
//! collaborator, content generation, interacts through tickets: the session
//! hands out a ticket per request and applies a completion only while its
//! ticket is still the latest for that region ("last write wins"), so
//! stale or out-of-order responses are dropped instead of clobbering newer
//! content.

use crate::compositor;
use crate::history::HistoryStack;
use crate::model::{LayoutOracle, RegionModel};
use crate::raster::{RasterSample, RasterSource};
use crate::region::{ContentMode, Region};
use crate::selection::SelectionManager;
use pagevec_core::{GeometryError, PxRect, Rect, RegionId, Result};
use std::collections::HashMap;
use tracing::debug;

/// Claim on the outcome of one content-generation request.
///
/// A newer request for the same region supersedes older tickets; completing
/// a superseded ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    region: RegionId,
    seq: u64,
}

impl GenerationTicket {
    pub fn region(&self) -> RegionId {
        self.region
    }
}

/// Editor state for one loaded page.
#[derive(Debug, Clone)]
pub struct EditorSession {
    canvas_width: u32,
    canvas_height: u32,
    model: RegionModel,
    selection: SelectionManager,
    history: HistoryStack,
    generation_seq: HashMap<RegionId, u64>,
}

impl EditorSession {
    /// Creates a session for a canvas of the given pixel dimensions.
    /// Dimensions are validated once here so geometry math never divides by
    /// zero downstream.
    pub fn new(canvas_width: u32, canvas_height: u32) -> Result<Self> {
        if canvas_width == 0 || canvas_height == 0 {
            return Err(GeometryError::ZeroCanvas {
                width: canvas_width,
                height: canvas_height,
            }
            .into());
        }
        let mut history = HistoryStack::new();
        history.commit(&[]);
        Ok(Self {
            canvas_width,
            canvas_height,
            model: RegionModel::new(),
            selection: SelectionManager::new(),
            history,
            generation_seq: HashMap::new(),
        })
    }

    /// Restores a session from persisted regions (document load path).
    pub fn from_regions(
        canvas_width: u32,
        canvas_height: u32,
        regions: Vec<Region>,
    ) -> Result<Self> {
        let mut session = Self::new(canvas_width, canvas_height)?;
        session.model.restore(regions);
        session.history.commit(session.model.regions());
        Ok(session)
    }

    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    pub fn regions(&self) -> &[Region] {
        self.model.regions()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.model.get(id)
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    fn commit(&mut self) {
        self.history.commit(self.model.regions());
    }

    /// Creates a draft region from a completed drag rectangle and selects
    /// it.
    pub fn create_draft_region(&mut self, rect: Rect) -> Result<RegionId> {
        let id = self.model.create_draft(rect)?;
        self.selection.select_only(id);
        self.commit();
        Ok(id)
    }

    /// Crops the page raster under a region's placement.
    pub fn crop_for(&self, id: RegionId, source: &dyn RasterSource) -> Option<RasterSample> {
        let region = self.model.get(id)?;
        let px = region
            .rect
            .to_px(self.canvas_width as f64, self.canvas_height as f64);
        Some(source.sample(px))
    }

    /// Attaches placeholder content traced from the page raster under the
    /// region.
    pub fn attach_content(
        &mut self,
        id: RegionId,
        source: &dyn RasterSource,
        mode: ContentMode,
    ) -> Result<bool> {
        let Some(sample) = self.crop_for(id, source) else {
            return Ok(false);
        };
        self.attach_sample(id, &sample, mode)
    }

    /// Variant of [`EditorSession::attach_content`] for a pre-cropped
    /// sample.
    pub fn attach_sample(
        &mut self,
        id: RegionId,
        sample: &RasterSample,
        mode: ContentMode,
    ) -> Result<bool> {
        let applied = self.model.attach_content(id, sample, mode)?;
        if applied {
            self.commit();
        }
        Ok(applied)
    }

    /// Registers a content-generation request for a region, superseding any
    /// outstanding request for it. Returns None for a vanished region.
    pub fn begin_generation(&mut self, id: RegionId) -> Option<GenerationTicket> {
        self.model.get(id)?;
        let seq = self
            .generation_seq
            .entry(id)
            .and_modify(|s| *s += 1)
            .or_insert(1);
        Some(GenerationTicket { region: id, seq: *seq })
    }

    /// Applies the outcome of a generation request.
    ///
    /// Success replaces the region's content wholesale (transform reset,
    /// local frame kept) and commits. Failure records the region-local
    /// error marker and keeps the prior content; retry by starting a new
    /// generation. Superseded tickets and vanished regions are dropped
    /// silently.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: std::result::Result<String, String>,
    ) -> bool {
        let current = self.generation_seq.get(&ticket.region).copied();
        if current != Some(ticket.seq) {
            debug!(region = %ticket.region, "stale generation response dropped");
            return false;
        }
        if self.model.get(ticket.region).is_none() {
            debug!(region = %ticket.region, "generation response for deleted region dropped");
            self.generation_seq.remove(&ticket.region);
            return false;
        }
        match outcome {
            Ok(markup) => {
                self.model.replace_content(ticket.region, markup);
                self.commit();
                true
            }
            Err(reason) => {
                self.model.set_generation_error(ticket.region, reason);
                false
            }
        }
    }

    /// Replaces a region's placement rectangle.
    pub fn move_or_resize(&mut self, id: RegionId, rect: Rect) -> Result<bool> {
        let applied = self.model.move_or_resize(id, rect)?;
        if applied {
            self.commit();
        }
        Ok(applied)
    }

    /// Re-anchors a region's local frame to a measured content box.
    pub fn fit_content_to_area(&mut self, id: RegionId, local_bounds: PxRect) -> bool {
        let applied = self.model.fit_content_to_area(id, local_bounds);
        if applied {
            self.commit();
        }
        applied
    }

    /// Fits a region's placement to its rendered content box.
    pub fn fit_area_to_content(&mut self, id: RegionId, rendered_bounds: PxRect) -> bool {
        let applied = self.model.fit_area_to_content(
            id,
            rendered_bounds,
            self.canvas_width,
            self.canvas_height,
        );
        if applied {
            self.commit();
        }
        applied
    }

    /// Splits the listed content elements out of a region into regions of
    /// their own. The new regions become the selection.
    pub fn split_region(
        &mut self,
        id: RegionId,
        element_indices: &[usize],
        oracle: &dyn LayoutOracle,
    ) -> Result<Vec<RegionId>> {
        let ids = self.model.split_out(
            id,
            element_indices,
            oracle,
            self.canvas_width,
            self.canvas_height,
        )?;
        if !ids.is_empty() {
            self.selection.deselect_all();
            for &new_id in &ids {
                self.selection.select(new_id, true);
            }
            self.selection.retain_existing(self.model.regions());
            self.commit();
        }
        Ok(ids)
    }

    /// Groups the current multi-selection into one region.
    pub fn group_selection(&mut self) -> Result<RegionId> {
        let ids: Vec<RegionId> = self.selection.selected_ids().to_vec();
        let group_id = self
            .model
            .group(&ids, self.canvas_width, self.canvas_height)?;
        self.selection.select_only(group_id);
        self.commit();
        Ok(group_id)
    }

    /// Groups an explicit id list into one region.
    pub fn group_regions(&mut self, ids: &[RegionId]) -> Result<RegionId> {
        let group_id = self
            .model
            .group(ids, self.canvas_width, self.canvas_height)?;
        self.selection.select_only(group_id);
        self.commit();
        Ok(group_id)
    }

    /// Merges adjacent same-style text runs in a region's content.
    pub fn optimize_region(&mut self, id: RegionId) -> bool {
        let applied = self.model.optimize(id);
        if applied {
            self.commit();
        }
        applied
    }

    /// Deletes regions and clears any selection entries pointing at them.
    pub fn delete_regions(&mut self, ids: &[RegionId]) -> usize {
        let removed = self.model.remove(ids);
        if removed > 0 {
            self.selection.retain_existing(self.model.regions());
            for id in ids {
                self.generation_seq.remove(id);
            }
            self.commit();
        }
        removed
    }

    /// Steps the region collection back one history entry.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.model.restore(snapshot);
                self.selection.retain_existing(self.model.regions());
                true
            }
            None => false,
        }
    }

    /// Steps the region collection forward one history entry.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.model.restore(snapshot);
                self.selection.retain_existing(self.model.regions());
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Selection helpers, forwarded so collaborators only hold the session.
    pub fn select(&mut self, id: RegionId, multi: bool) {
        self.selection.select(id, multi);
        self.selection.retain_existing(self.model.regions());
    }

    pub fn select_at_point(&mut self, x: f64, y: f64, multi: bool) -> Option<RegionId> {
        self.selection
            .select_at_point(self.model.regions(), x, y, multi)
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    /// Serializes the current region collection into the exportable SVG
    /// document.
    pub fn compose_svg(&self) -> String {
        compositor::compose(self.model.regions(), self.canvas_width, self.canvas_height)
    }
}

/// Convenience: group requires at least two selected regions; expose the
/// check without running the operation.
impl EditorSession {
    pub fn can_group_selection(&self) -> bool {
        self.selection.selected_ids().len() >= 2
    }
}

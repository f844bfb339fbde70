//! Region selection state and selection operations.
//!
//! Selection model:
//! - **Active selection**: at most one region whose properties are editable
//!   (stored in `active_id`).
//! - **Multiple selection**: a set of selected ids that always contains the
//!   active id while one exists.
//!
//! Selection is transient UI state: it is cleared when the regions it
//! points at are deleted and it is not persisted with documents or history
//! snapshots.

use crate::region::Region;
use pagevec_core::RegionId;

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    active_id: Option<RegionId>,
    selected: Vec<RegionId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The region whose properties are currently editable, if any.
    pub fn active_id(&self) -> Option<RegionId> {
        self.active_id
    }

    /// All selected ids, in selection order.
    pub fn selected_ids(&self) -> &[RegionId] {
        &self.selected
    }

    pub fn is_selected(&self, id: RegionId) -> bool {
        self.selected.contains(&id)
    }

    /// Replaces the selection with a single region.
    pub fn select_only(&mut self, id: RegionId) {
        self.selected.clear();
        self.selected.push(id);
        self.active_id = Some(id);
    }

    /// Adds to or toggles the selection.
    ///
    /// With `multi` false this behaves like [`SelectionManager::select_only`].
    /// With `multi` true the id is toggled: deselecting the active region
    /// promotes another selected region to active.
    pub fn select(&mut self, id: RegionId, multi: bool) {
        if !multi {
            self.select_only(id);
            return;
        }
        if let Some(pos) = self.selected.iter().position(|&s| s == id) {
            self.selected.remove(pos);
            if self.active_id == Some(id) {
                self.active_id = self.selected.last().copied();
            }
        } else {
            self.selected.push(id);
            self.active_id = Some(id);
        }
    }

    /// Clears the whole selection.
    pub fn deselect_all(&mut self) {
        self.selected.clear();
        self.active_id = None;
    }

    /// Drops selection entries whose regions no longer exist.
    pub fn retain_existing(&mut self, regions: &[Region]) {
        self.selected
            .retain(|id| regions.iter().any(|r| r.id == *id));
        if let Some(active) = self.active_id {
            if !self.selected.contains(&active) {
                self.active_id = self.selected.last().copied();
            }
        }
    }

    /// Selects the topmost region containing the unit-space point, walking
    /// the collection in reverse z-order. Clicking empty space without
    /// `multi` clears the selection.
    pub fn select_at_point(
        &mut self,
        regions: &[Region],
        x: f64,
        y: f64,
        multi: bool,
    ) -> Option<RegionId> {
        let hit = regions.iter().rev().find(|r| r.rect.contains(x, y));
        match hit {
            Some(region) => {
                let id = region.id;
                self.select(id, multi);
                self.active_id
            }
            None => {
                if !multi {
                    self.deselect_all();
                }
                None
            }
        }
    }
}

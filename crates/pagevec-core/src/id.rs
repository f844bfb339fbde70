//! Region identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a region.
///
/// Assigned once at creation and stable for the region's lifetime. Random
/// v4 ids mean identifiers are never reused, even across undo/redo snapshot
/// restores that resurrect or discard regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(Uuid);

impl RegionId {
    /// Allocates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = RegionId::new();
        let b = RegionId::new();
        assert_ne!(a, b);
    }
}

//! # PageVec Editor
//!
//! This crate provides the region editing engine for PageVec: carve a
//! scanned page into rectangular regions, replace each region with vector
//! content, and recompose everything into one exportable SVG overlay.
//!
//! ## Core Components
//!
//! ### Region Editing
//! - **Regions**: placed rectangles carrying independently owned vector
//!   content, with their own local coordinate frames
//! - **Session**: the owned editor state (regions, selection, history)
//! - **Structural operations**: split, group, fit-content, fit-area,
//!   text-run merging
//!
//! ### Raster Handling
//! - **Sampling**: RGBA crops read from the decoded page raster
//! - **Tracing**: run-length tracing of dark pixels into blueprint paths
//!
//! ### Output
//! - **Compositor**: nested coordinate-system SVG export
//! - **Documents**: JSON save/load of the durable session state
//!
//! ## Architecture
//!
//! ```text
//! EditorSession
//!   ├── RegionModel (ordered collection + structural ops)
//!   ├── SelectionManager (active + multi selection)
//!   ├── HistoryStack (bounded snapshot undo/redo)
//!   └── generation tickets (last-write-wins content replacement)
//!
//! Collaborators (injected)
//!   ├── RasterSource (page pixels)
//!   ├── LayoutOracle (rendered bounding boxes)
//!   └── content generation (opaque, asynchronous)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pagevec_editor::{ContentMode, EditorSession};
//! use pagevec_core::Rect;
//!
//! let mut session = EditorSession::new(1000, 800)?;
//! let id = session.create_draft_region(Rect::new(0.1, 0.1, 0.2, 0.1))?;
//! session.attach_content(id, &page, ContentMode::Text)?;
//! let svg = session.compose_svg();
//! ```

pub mod compositor;
pub mod document;
pub mod fragment;
pub mod history;
pub mod model;
pub mod raster;
pub mod region;
pub mod selection;
pub mod session;
pub mod tracer;

pub use compositor::compose;
pub use document::{DocumentFile, DocumentMetadata};
pub use history::{HistoryStack, DEFAULT_HISTORY_CAPACITY};
pub use model::{LayoutOracle, RegionModel, MAX_CONTENT_EDGE};
pub use raster::{RasterSample, RasterSource};
pub use region::{ContentMode, Region, RegionStatus};
pub use selection::SelectionManager;
pub use session::{EditorSession, GenerationTicket};
pub use tracer::trace_runs;

pub use pagevec_core::{EditorError, GeometryError, PxRect, Rect, RegionId, Result, Size, Vec2};

//! Serialization and deserialization for page documents.
//!
//! Implements save/load of a session's durable state as JSON: canvas
//! dimensions plus the region collection. History and selection are
//! transient editor state and are not persisted.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::region::Region;
use crate::session::EditorSession;

/// Document file format version
const FILE_FORMAT_VERSION: &str = "1.0";

/// Complete document file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    pub version: String,
    pub metadata: DocumentMetadata,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub regions: Vec<Region>,
}

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub name: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

impl DocumentFile {
    /// Captures a session's durable state under the given document name.
    pub fn from_session(session: &EditorSession, name: &str) -> Self {
        let now = Utc::now();
        Self {
            version: FILE_FORMAT_VERSION.to_string(),
            metadata: DocumentMetadata {
                name: name.to_string(),
                created: now,
                modified: now,
                description: String::new(),
            },
            canvas_width: session.canvas_width(),
            canvas_height: session.canvas_height(),
            regions: session.regions().to_vec(),
        }
    }

    /// Rebuilds an editor session from the persisted state.
    pub fn into_session(self) -> pagevec_core::Result<EditorSession> {
        EditorSession::from_regions(self.canvas_width, self.canvas_height, self.regions)
    }

    /// Writes the document as pretty-printed JSON.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("failed to serialize document")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write document to {}", path.display()))?;
        Ok(())
    }

    /// Reads a document from a JSON file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document from {}", path.display()))?;
        let doc: DocumentFile =
            serde_json::from_str(&json).context("failed to parse document")?;
        Ok(doc)
    }
}

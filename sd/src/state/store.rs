//! JSON snapshot persistence
//!
//! The whole application state lives in a single document on disk:
//!
//! ```json
//! { "state": { ... }, "updatedAt": "2026-03-01T07:00:00Z" }
//! ```
//!
//! Writes go through a temp file in the same directory followed by a
//! rename, so a crash mid-write leaves the previous document intact.

use super::messages::StateError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    state: studycore::AppState,
    #[serde(rename = "updatedAt")]
    updated_at: DateTime<Utc>,
}

/// File-backed store for the application snapshot
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Whether a document is present on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored snapshot
    ///
    /// `Ok(None)` when the file does not exist yet. A file that cannot be
    /// parsed is a `Malformed` error; the callers decide whether that is
    /// fatal for their surface.
    pub fn load(&self) -> Result<Option<studycore::AppState>, StateError> {
        if !self.path.exists() {
            debug!("load: no snapshot at {}", self.path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| StateError::Store(e.to_string()))?;

        let document: StoredDocument =
            serde_json::from_str(&content).map_err(|e| StateError::Malformed(e.to_string()))?;

        debug!(
            "load: snapshot from {} (updated {})",
            self.path.display(),
            document.updated_at
        );
        Ok(Some(document.state))
    }

    /// Persist the snapshot, stamping the write time
    pub fn save(&self, state: &studycore::AppState) -> Result<DateTime<Utc>, StateError> {
        let updated_at = Utc::now();
        let document = StoredDocument {
            state: state.clone(),
            updated_at,
        };

        let content =
            serde_json::to_string_pretty(&document).map_err(|e| StateError::Store(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StateError::Store(e.to_string()))?;
        }

        // Temp file next to the target so the rename stays on one filesystem
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| StateError::Store(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StateError::Store(e.to_string()))?;

        debug!("save: snapshot to {}", self.path.display());
        Ok(updated_at)
    }
}

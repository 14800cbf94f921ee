//! Render ledger: which image content each clip was rendered from.
//!
//! Persisted as a flat JSON object (`video.json`) mapping `scene_N` keys to
//! hex content hashes. An entry is evidence that the clip for that scene was
//! last rendered from an image with exactly that hash.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::project::ProjectError;

/// Persisted mapping from scene key to image content hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderLedger {
    entries: BTreeMap<String, String>,
}

/// Ledger key for a 1-based scene index.
pub fn scene_key(index: usize) -> String {
    format!("scene_{index}")
}

impl RenderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger, treating a missing file as an empty ledger.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No render ledger yet, starting empty");
            return Ok(Self::new());
        }
        let json = std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Persist the ledger.
    ///
    /// Writes to a sibling temp file and renames it over the target so an
    /// interrupted write never leaves a truncated ledger behind.
    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ProjectError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| ProjectError::IoError {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, path).map_err(|e| ProjectError::IoError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Recorded hash for a scene.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(&scene_key(index)).map(String::as_str)
    }

    /// Record the hash a scene's clip was just rendered from.
    pub fn record(&mut self, index: usize, hash: impl Into<String>) {
        self.entries.insert(scene_key(index), hash.into());
    }

    /// Whether the recorded hash for `index` equals `hash`.
    pub fn matches(&self, index: usize, hash: &str) -> bool {
        self.get(index) == Some(hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RenderLedger::load(&dir.path().join("video.json")).unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("video.json");

        let mut ledger = RenderLedger::new();
        ledger.record(1, "aaa");
        ledger.record(12, "bbb");
        ledger.save(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"scene_12\": \"bbb\""));
        assert!(!dir.path().join("video.json.tmp").exists());

        let loaded = RenderLedger::load(&path).unwrap();
        assert_eq!(loaded, ledger);
        assert!(loaded.matches(1, "aaa"));
        assert!(!loaded.matches(1, "bbb"));
        assert_eq!(loaded.get(2), None);
    }

    #[test]
    fn test_reads_flat_object() {
        let ledger: RenderLedger =
            serde_json::from_str(r#"{"scene_1": "abc", "scene_2": "def"}"#).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(2), Some("def"));
    }
}

//! Content-addressed render cache.
//!
//! A clip is reused only when its file exists and the ledger says it was
//! rendered from an image with the same whole-file SHA-256 digest as the
//! image on disk now. Modification times play no part.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::ledger::RenderLedger;

/// Lowercase hex SHA-256 of a file's full contents.
pub fn hash_file(path: &Path) -> TalereelResult<String> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TalereelError::missing_input(path)
        } else {
            TalereelError::Io(e)
        }
    })?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut BufReader::new(file), &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Why a clip must be (re)rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    ClipMissing,
    NotInLedger,
    ImageChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderDecision {
    Skip,
    Render(StaleReason),
}

/// Decide whether the clip for `index` is stale.
pub fn decide(
    index: usize,
    clip_exists: bool,
    ledger: &RenderLedger,
    image_hash: &str,
) -> RenderDecision {
    if !clip_exists {
        return RenderDecision::Render(StaleReason::ClipMissing);
    }
    if ledger.get(index).is_none() {
        return RenderDecision::Render(StaleReason::NotInLedger);
    }
    if ledger.matches(index, image_hash) {
        RenderDecision::Skip
    } else {
        RenderDecision::Render(StaleReason::ImageChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_content_based() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        std::fs::write(&a, b"abc").unwrap();
        std::fs::write(&b, b"abc").unwrap();

        let hash = hash_file(&a).unwrap();
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(hash, hash_file(&b).unwrap());

        std::fs::write(&b, b"abd").unwrap();
        assert_ne!(hash, hash_file(&b).unwrap());
    }

    #[test]
    fn test_hash_missing_file_is_missing_input() {
        let err = hash_file(Path::new("/nonexistent/scene_1.png")).unwrap_err();
        assert!(matches!(err, TalereelError::MissingInput { .. }));
    }

    #[test]
    fn test_decision_table() {
        let mut ledger = RenderLedger::new();
        ledger.record(1, "h1");

        assert_eq!(
            decide(1, false, &ledger, "h1"),
            RenderDecision::Render(StaleReason::ClipMissing)
        );
        assert_eq!(
            decide(2, true, &ledger, "h2"),
            RenderDecision::Render(StaleReason::NotInLedger)
        );
        assert_eq!(
            decide(1, true, &ledger, "other"),
            RenderDecision::Render(StaleReason::ImageChanged)
        );
        assert_eq!(decide(1, true, &ledger, "h1"), RenderDecision::Skip);
    }
}

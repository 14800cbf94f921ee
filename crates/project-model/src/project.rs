//! Project layout and metadata.
//!
//! A project is a directory holding every artifact of one narration, from
//! the source audio to the final muxed video. Per-scene artifacts embed the
//! 1-based scene index in their file name; that index is the join key
//! across all stages.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use talereel_common::error::TalereelError;

use crate::ledger::RenderLedger;
use crate::metadata::NarrativeMetadata;
use crate::scene::Scene;
use crate::transcript::Transcript;

/// Project descriptor (`project.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Schema version.
    pub version: String,

    /// Human-readable project name.
    pub name: String,

    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

impl ProjectInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            version: "1.0".to_string(),
            name: name.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Resolves every artifact path of a project from its root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn project_file(&self) -> PathBuf {
        self.root.join("project.json")
    }

    /// Source narration track.
    pub fn audio(&self) -> PathBuf {
        self.root.join("audio.mp3")
    }

    /// Raw speech-to-text response.
    pub fn transcript(&self) -> PathBuf {
        self.root.join("transcr.json")
    }

    pub fn scenes(&self) -> PathBuf {
        self.root.join("scenes.json")
    }

    pub fn summary(&self) -> PathBuf {
        self.root.join("_summary.txt")
    }

    pub fn locations(&self) -> PathBuf {
        self.root.join("_locations.txt")
    }

    pub fn cast(&self) -> PathBuf {
        self.root.join("_cast.txt")
    }

    pub fn style(&self) -> PathBuf {
        self.root.join("_style.txt")
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join("prompts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join("image")
    }

    pub fn clips_dir(&self) -> PathBuf {
        self.root.join("video")
    }

    pub fn prompt(&self, index: usize) -> PathBuf {
        self.prompts_dir().join(format!("scene_{index}.txt"))
    }

    pub fn image(&self, index: usize) -> PathBuf {
        self.images_dir().join(format!("scene_{index}.png"))
    }

    pub fn clip(&self, index: usize) -> PathBuf {
        self.clips_dir().join(clip_file_name(index))
    }

    /// Ordered concatenation manifest.
    pub fn concat_manifest(&self) -> PathBuf {
        self.clips_dir().join("input.txt")
    }

    /// Render ledger.
    pub fn ledger(&self) -> PathBuf {
        self.root.join("video.json")
    }

    /// Concatenated video without audio.
    pub fn intermediate_video(&self) -> PathBuf {
        self.root.join("temp_slideshow.mp4")
    }

    pub fn output(&self) -> PathBuf {
        self.root.join("output.mp4")
    }

    /// Create the per-scene artifact directories.
    pub fn ensure_dirs(&self) -> Result<(), ProjectError> {
        for dir in [self.prompts_dir(), self.images_dir(), self.clips_dir()] {
            std::fs::create_dir_all(&dir).map_err(|e| ProjectError::IoError {
                path: dir.clone(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Create a new project on disk with the standard directory structure.
    pub fn create(root: impl AsRef<Path>, name: impl Into<String>) -> Result<Self, ProjectError> {
        let layout = Self::new(root);
        layout.ensure_dirs()?;
        let info = ProjectInfo::new(name);
        write_json(&layout.project_file(), &info)?;
        Ok(layout)
    }

    /// Project descriptor, if the project was created with `create`.
    pub fn info(&self) -> Result<Option<ProjectInfo>, ProjectError> {
        let path = self.project_file();
        if !path.exists() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    pub fn load_transcript(&self) -> Result<Transcript, ProjectError> {
        read_json(&self.transcript())
    }

    pub fn load_scenes(&self) -> Result<Vec<Scene>, ProjectError> {
        read_json(&self.scenes())
    }

    pub fn save_scenes(&self, scenes: &[Scene]) -> Result<(), ProjectError> {
        write_json(&self.scenes(), &scenes)
    }

    pub fn load_ledger(&self) -> Result<RenderLedger, ProjectError> {
        RenderLedger::load(&self.ledger())
    }

    /// Read the four metadata artifacts.
    pub fn load_metadata(&self) -> Result<NarrativeMetadata, ProjectError> {
        Ok(NarrativeMetadata {
            summary: read_text(&self.summary())?,
            locations: read_text(&self.locations())?,
            cast: read_text(&self.cast())?,
            style: read_text(&self.style())?,
        })
    }

    /// Write each metadata field to its own artifact.
    pub fn save_metadata(&self, metadata: &NarrativeMetadata) -> Result<(), ProjectError> {
        write_text(&self.summary(), &metadata.summary)?;
        write_text(&self.locations(), &metadata.locations)?;
        write_text(&self.cast(), &metadata.cast)?;
        write_text(&self.style(), &metadata.style)
    }

    pub fn has_metadata(&self) -> bool {
        [self.summary(), self.locations(), self.cast(), self.style()]
            .iter()
            .all(|p| p.exists())
    }
}

/// File name of a scene clip, as referenced from the concat manifest.
pub fn clip_file_name(index: usize) -> String {
    format!("scene_{index}.mp4")
}

/// Read a required text artifact.
pub fn read_text(path: &Path) -> Result<String, ProjectError> {
    if !path.exists() {
        return Err(ProjectError::Missing {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn write_text(path: &Path, content: &str) -> Result<(), ProjectError> {
    std::fs::write(path, content).map_err(|e| ProjectError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ProjectError> {
    let json = read_text(path)?;
    serde_json::from_str(&json).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ProjectError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_text(path, &json)
}

/// Errors that can occur when working with project artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Required artifact missing: {path}")]
    Missing { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid project: {message}")]
    ValidationError { message: String },
}

impl From<ProjectError> for TalereelError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Missing { path } => TalereelError::MissingInput { path },
            other => TalereelError::project(other.to_string()),
        }
    }
}

//! talereel Render Engine
//!
//! Turns per-scene images into the final narrated video, re-rendering
//! only what changed since the last run.
//!
//! # Pipeline Architecture
//!
//! ```text
//! image/scene_N.png ──┐
//!                     ├── Render Cache (sha256 vs video.json)
//! video.json ─────────┘         │
//!                               ├── skip, or render clip (looped still, -t duration)
//!                               ▼
//!                       video/scene_N.mp4   (contiguous image prefix only)
//!                               │
//!                               ├── concat (stream copy, video/input.txt)
//!                               ▼
//!                       temp_slideshow.mp4
//!                               │
//! audio.mp3 ────────────────────┤
//!                               ├── mux (copy video, encode audio, -t total)
//!                               ▼
//!                           output.mp4
//! ```

pub mod assemble;
pub mod cache;
pub mod clips;
pub mod transcoder;

pub use assemble::{assemble, concat_manifest};
pub use cache::{decide, hash_file, RenderDecision, StaleReason};
pub use clips::{render_clips, ClipReport};
pub use transcoder::{ClipJob, FfmpegTranscoder, MuxJob, Transcoder};

use std::path::PathBuf;

use serde::Serialize;
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::manifest::SceneManifest;
use talereel_project_model::project::ProjectLayout;
use talereel_project_model::scene::{total_duration, Scene};

/// Outcome of a full render run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderReport {
    pub rendered: Vec<usize>,
    pub skipped: Vec<usize>,
    /// Scenes without an image. The first one truncates assembly.
    pub missing_images: Vec<usize>,
    /// Number of scenes in the assembled output.
    pub assembled_scenes: usize,
    /// Summed duration of the assembled scenes.
    pub total_duration: f64,
    /// Final video, when at least one scene was assembled.
    pub output: Option<PathBuf>,
}

/// Render stale clips and assemble the contiguous image prefix.
///
/// Scenes after the first missing image are neither rendered nor
/// assembled, even when their own images exist.
pub fn render_project(
    scenes: &[Scene],
    manifest: &SceneManifest,
    layout: &ProjectLayout,
    transcoder: &mut dyn Transcoder,
) -> TalereelResult<RenderReport> {
    if !transcoder.is_available() {
        return Err(TalereelError::transcode(format!(
            "{} is not available",
            transcoder.name()
        )));
    }
    tracing::info!(backend = transcoder.name(), "Using transcoder");

    let prefix_len = manifest.image_prefix_len().min(scenes.len());
    let prefix = &scenes[..prefix_len];
    let missing_images = manifest.missing_images();

    if let Some(&index) = missing_images.first() {
        let err = TalereelError::MissingImage {
            index,
            path: layout.image(index),
        };
        tracing::warn!(
            error = %err,
            assembled = prefix_len,
            total = scenes.len(),
            "Assembly truncated at first missing image"
        );
    }

    let clips = render_clips(prefix, layout, transcoder)?;

    let output = if prefix.is_empty() {
        tracing::warn!("No scene has an image; nothing to assemble");
        None
    } else {
        Some(assemble(prefix, layout, transcoder)?)
    };

    Ok(RenderReport {
        rendered: clips.rendered,
        skipped: clips.skipped,
        missing_images,
        assembled_scenes: prefix_len,
        total_duration: total_duration(prefix),
        output,
    })
}

//! Final assembly: concat the clip prefix, then mux against the narration.

use std::path::{Path, PathBuf};

use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::project::{clip_file_name, ProjectLayout};
use talereel_project_model::scene::{total_duration, Scene};

use crate::transcoder::{MuxJob, Transcoder};

/// Concat-demuxer manifest listing each scene's clip in order.
///
/// Entries are relative to the manifest, which lives next to the clips.
pub fn concat_manifest(scenes: &[Scene]) -> String {
    scenes
        .iter()
        .map(|s| format!("file '{}'\n", clip_file_name(s.index)))
        .collect()
}

/// Assemble `scenes` (already rendered, in order, no gaps) into the output.
///
/// The output is capped at the summed duration of `scenes`. The manifest
/// and the intermediate video are removed once the mux succeeds; on
/// failure they are left in place for inspection.
pub fn assemble(
    scenes: &[Scene],
    layout: &ProjectLayout,
    transcoder: &mut dyn Transcoder,
) -> TalereelResult<PathBuf> {
    let Some(first) = scenes.first() else {
        return Err(TalereelError::MissingImage {
            index: 1,
            path: layout.image(1),
        });
    };
    if first.index != 1 {
        return Err(TalereelError::project(format!(
            "assembly must start at scene 1, got scene {}",
            first.index
        )));
    }

    let audio = layout.audio();
    if !audio.is_file() {
        return Err(TalereelError::missing_input(audio));
    }

    let manifest = layout.concat_manifest();
    std::fs::write(&manifest, concat_manifest(scenes))?;

    let intermediate = layout.intermediate_video();
    transcoder.concat(&manifest, &intermediate)?;
    tracing::info!(
        clips = scenes.len(),
        path = %intermediate.display(),
        "Concatenated clips"
    );

    let total = total_duration(scenes);
    let output = layout.output();
    transcoder.mux(&MuxJob {
        video: intermediate.clone(),
        audio,
        output: output.clone(),
        total_duration: total,
    })?;
    tracing::info!(
        path = %output.display(),
        duration = format!("{total:.2}"),
        "Muxed final video"
    );

    remove_intermediate(&manifest);
    remove_intermediate(&intermediate);
    Ok(output)
}

fn remove_intermediate(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(error = %err, path = %path.display(), "Failed to remove intermediate file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(index: usize) -> Scene {
        Scene {
            index,
            text: String::new(),
            start: 0.0,
            end: 0.0,
            offset_start: 0.0,
            duration: 1.0,
            start_str: String::new(),
            end_str: String::new(),
            offset_start_str: String::new(),
        }
    }

    #[test]
    fn test_manifest_lists_clips_in_order() {
        let manifest = concat_manifest(&[scene(1), scene(2), scene(3)]);
        assert_eq!(
            manifest,
            "file 'scene_1.mp4'\nfile 'scene_2.mp4'\nfile 'scene_3.mp4'\n"
        );
    }

    #[test]
    fn test_manifest_empty() {
        assert_eq!(concat_manifest(&[]), "");
    }
}

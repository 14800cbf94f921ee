//! Audio duration via `ffprobe`.

use std::path::Path;
use std::process::Command;

use talereel_common::error::{TalereelError, TalereelResult};

/// Container duration of a media file, in seconds.
pub fn probe_duration_seconds(path: &Path) -> TalereelResult<f64> {
    if !path.is_file() {
        return Err(TalereelError::missing_input(path));
    }

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            TalereelError::transcode(format!("Failed to run ffprobe for {}: {e}", path.display()))
        })?;

    if !output.status.success() {
        return Err(TalereelError::transcode(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
    tracing::debug!(path = %path.display(), duration, "Probed audio duration");
    Ok(duration)
}

/// Parse ffprobe's bare `format=duration` output.
pub fn parse_duration(raw: &str) -> TalereelResult<f64> {
    let trimmed = raw.trim();
    let duration: f64 = trimmed.parse().map_err(|_| {
        TalereelError::transcode(format!("Failed to parse ffprobe duration {trimmed:?}"))
    })?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(TalereelError::transcode(format!(
            "ffprobe reported unusable duration {duration}"
        )));
    }
    Ok(duration)
}

//! talereel Audio Intelligence
//!
//! Everything that touches the narration track:
//! - **Transcription:** Word-level speech-to-text through a remote collaborator
//! - **Probe:** Total audio duration via `ffprobe`

pub mod probe;
pub mod transcription;

pub use probe::probe_duration_seconds;
pub use transcription::*;

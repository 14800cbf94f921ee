//! Timing allocation: turn scene drafts into a gap-free on-screen schedule.
//!
//! Each scene's on-screen start ("offset start") leads its spoken start by a
//! fraction of its own length, so the picture appears a little before the
//! narration reaches it:
//!
//! ```text
//! offset_start[i] = start[i] + f * (end[i] - start[i])      (i > 0)
//! offset_start[0] = 0
//! duration[i]     = offset_start[i + 1] - offset_start[i]
//! duration[last]  = total_audio - offset_start[last]
//! ```
//!
//! Consecutive scenes therefore tile `[0, total_audio]` exactly: the sum of
//! durations equals the audio length.

use talereel_common::clock::format_clock;
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_project_model::scene::{Scene, SceneDraft};

/// Transition lead-in settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingConfig {
    /// Fraction of a scene's spoken length, measured from its spoken start,
    /// at which it takes over the screen.
    pub transition_fraction: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            transition_fraction: 0.1,
        }
    }
}

impl TimingConfig {
    pub fn new(transition_fraction: f64) -> TalereelResult<Self> {
        if !(0.0..1.0).contains(&transition_fraction) {
            return Err(TalereelError::config(format!(
                "transition_fraction must be in [0, 1), got {transition_fraction}"
            )));
        }
        Ok(Self {
            transition_fraction,
        })
    }
}

/// Number drafts `1..=n` and allocate their on-screen time.
///
/// Fails with [`TalereelError::InvalidDuration`] if any allocated duration
/// is not strictly positive and finite, if the audio total is not finite,
/// or if the audio ends before the last spoken word. Nothing is returned on
/// failure.
pub fn allocate_timing(
    drafts: &[SceneDraft],
    config: &TimingConfig,
    total_audio_duration: f64,
) -> TalereelResult<Vec<Scene>> {
    let Some(last) = drafts.last() else {
        return Ok(vec![]);
    };

    if !total_audio_duration.is_finite() || total_audio_duration < last.end {
        return Err(TalereelError::InvalidDuration {
            index: drafts.len(),
            duration: total_audio_duration - last.end,
        });
    }

    let offsets: Vec<f64> = drafts
        .iter()
        .enumerate()
        .map(|(i, draft)| offset_start(i, draft, config.transition_fraction))
        .collect();

    let durations: Vec<f64> = offsets
        .iter()
        .enumerate()
        .map(|(i, &offset)| match offsets.get(i + 1) {
            Some(next) => next - offset,
            None => total_audio_duration - offset,
        })
        .collect();

    if let Some((i, &duration)) = durations
        .iter()
        .enumerate()
        .find(|(_, d)| !d.is_finite() || **d <= 0.0)
    {
        return Err(TalereelError::InvalidDuration {
            index: i + 1,
            duration,
        });
    }

    let scenes: Vec<Scene> = drafts
        .iter()
        .zip(offsets.iter().zip(durations.iter()))
        .enumerate()
        .map(|(i, (draft, (&offset_start, &duration)))| Scene {
            index: i + 1,
            text: draft.text.clone(),
            start: draft.start,
            end: draft.end,
            offset_start,
            duration,
            start_str: format_clock(draft.start),
            end_str: format_clock(draft.end),
            offset_start_str: format_clock(offset_start),
        })
        .collect();

    tracing::debug!(
        scenes = scenes.len(),
        total = total_audio_duration,
        fraction = config.transition_fraction,
        "Allocated scene timing"
    );
    Ok(scenes)
}

fn offset_start(position: usize, draft: &SceneDraft, fraction: f64) -> f64 {
    if position == 0 {
        0.0
    } else {
        draft.start + fraction * draft.duration()
    }
}

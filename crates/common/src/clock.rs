//! Clock and timing utilities.
//!
//! Scene timings are plain `f64` seconds measured from the start of the
//! narration audio. This module provides:
//! - `m:ss` display strings for scene reports
//! - A stage clock for logging how long a pipeline stage took

use std::time::Instant;

/// Format seconds as `minutes:seconds`, seconds zero-padded to two digits.
///
/// The value is rounded to the nearest whole second before it is split,
/// so `59.6` renders as `1:00` rather than `0:60`. Negative input clamps
/// to zero.
pub fn format_clock(secs: f64) -> String {
    let total = secs.max(0.0).round() as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    format!("{minutes}:{seconds:02}")
}

/// Wall-clock timer for a single pipeline stage.
#[derive(Debug, Clone)]
pub struct StageClock {
    stage: &'static str,
    started: Instant,
}

impl StageClock {
    /// Start timing the named stage.
    pub fn start(stage: &'static str) -> Self {
        tracing::debug!(stage, "Stage started");
        Self {
            stage,
            started: Instant::now(),
        }
    }

    /// Stage name.
    pub fn stage(&self) -> &'static str {
        self.stage
    }

    /// Seconds elapsed since the stage started.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Log completion with the elapsed time.
    pub fn finish(self) -> f64 {
        let elapsed = self.elapsed_secs();
        tracing::info!(stage = self.stage, elapsed_secs = elapsed, "Stage finished");
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_pads_seconds() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(5.2), "0:05");
        assert_eq!(format_clock(65.0), "1:05");
        assert_eq!(format_clock(3600.0), "60:00");
    }

    #[test]
    fn test_format_clock_rounds_to_nearest_second() {
        assert_eq!(format_clock(2.5), "0:03");
        assert_eq!(format_clock(2.49), "0:02");
        assert_eq!(format_clock(59.6), "1:00");
    }

    #[test]
    fn test_format_clock_clamps_negative() {
        assert_eq!(format_clock(-3.0), "0:00");
    }

    #[test]
    fn test_stage_clock_elapsed() {
        let clock = StageClock::start("scenes");
        assert_eq!(clock.stage(), "scenes");
        assert!(clock.elapsed_secs() < 1.0);
    }
}

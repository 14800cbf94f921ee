//! Sentence and scene types.
//!
//! Data flows one way through these types:
//! `Word` -> [`Sentence`] -> [`SceneDraft`] -> [`Scene`]. Each stage builds
//! a new collection; earlier collections are never mutated in place.

use serde::{Deserialize, Serialize};

/// A run of spoken words closed by terminal punctuation (or end of input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    /// Start of the first word.
    pub start: f64,
    /// End of the last word.
    pub end: f64,
}

impl Sentence {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A group of sentences before numbering and timing allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDraft {
    /// Member sentence texts joined by single spaces.
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl SceneDraft {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// A fully timed scene, as persisted in `scenes.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based scene number; the join key for every per-scene artifact.
    pub index: usize,
    pub text: String,
    /// Spoken start.
    pub start: f64,
    /// Spoken end.
    pub end: f64,
    /// Scheduled on-screen start ("virtual start"), at or before `start`
    /// plus the transition lead-in. Pinned to zero for the first scene.
    pub offset_start: f64,
    /// Allocated screen time.
    pub duration: f64,

    /// Display strings (`m:ss`). Reporting only; never parsed back.
    #[serde(default)]
    pub start_str: String,
    #[serde(default)]
    pub end_str: String,
    #[serde(default)]
    pub offset_start_str: String,
}

impl Scene {
    /// Scheduled on-screen end.
    pub fn offset_end(&self) -> f64 {
        self.offset_start + self.duration
    }
}

/// Sum of allocated durations.
pub fn total_duration(scenes: &[Scene]) -> f64 {
    scenes.iter().map(|s| s.duration).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(index: usize, offset_start: f64, duration: f64) -> Scene {
        Scene {
            index,
            text: format!("scene {index}"),
            start: offset_start,
            end: offset_start + duration,
            offset_start,
            duration,
            start_str: String::new(),
            end_str: String::new(),
            offset_start_str: String::new(),
        }
    }

    #[test]
    fn test_total_duration_sums_allocations() {
        let scenes = vec![scene(1, 0.0, 4.0), scene(2, 4.0, 6.5)];
        assert!((total_duration(&scenes) - 10.5).abs() < 1e-9);
        assert!((scenes[1].offset_end() - 10.5).abs() < 1e-9);
    }

    #[test]
    fn test_scene_json_without_display_strings() {
        let json = r#"[{"index":1,"text":"a","start":0,"end":5,"offset_start":0,"duration":5}]"#;
        let scenes: Vec<Scene> = serde_json::from_str(json).unwrap();
        assert_eq!(scenes[0].index, 1);
        assert!(scenes[0].start_str.is_empty());
    }

    #[test]
    fn test_sentence_duration() {
        let s = Sentence::new("Another one.", 3.0, 5.0);
        assert!((s.duration() - 2.0).abs() < 1e-9);
    }
}

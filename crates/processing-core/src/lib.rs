//! talereel Processing Core: scene segmentation
//!
//! Turns a word-level transcript into a timed list of scenes:
//! - **Sentences:** Join spoken words at terminal punctuation
//! - **Grouping:** Merge sentences into duration-bounded scenes
//! - **Timing:** Schedule each scene on screen so scenes tile the audio
//!
//! This crate is pure computation: no I/O, no network, no clocks.
//! All inputs are data; all outputs are data.

pub mod grouping;
pub mod sentences;
pub mod stats;
pub mod timing;

pub use grouping::{group_sentences, GroupingConfig};
pub use sentences::build_sentences;
pub use stats::SceneStats;
pub use timing::{allocate_timing, TimingConfig};

use talereel_common::config::PipelineConfig;
use talereel_common::error::TalereelResult;
use talereel_project_model::scene::Scene;
use talereel_project_model::transcript::Word;

/// Segmentation parameters, validated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SegmentationConfig {
    pub grouping: GroupingConfig,
    pub timing: TimingConfig,
}

impl SegmentationConfig {
    pub fn from_pipeline(config: &PipelineConfig) -> TalereelResult<Self> {
        Ok(Self {
            grouping: GroupingConfig::new(config.min_duration, config.max_duration)?,
            timing: TimingConfig::new(config.transition_fraction)?,
        })
    }
}

/// Run the full segmentation: words to sentences to scenes to timed scenes.
pub fn build_scenes(
    words: &[Word],
    config: &SegmentationConfig,
    total_audio_duration: f64,
) -> TalereelResult<Vec<Scene>> {
    let sentences = build_sentences(words);
    let drafts = group_sentences(&sentences, &config.grouping);
    allocate_timing(&drafts, &config.timing, total_audio_duration)
}

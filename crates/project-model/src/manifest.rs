//! Per-scene artifact availability.
//!
//! The manifest is computed once per run by probing the project directory,
//! then handed to the stages that need it. Stages never re-probe the
//! filesystem to discover which scenes have images.

use serde::Serialize;

use crate::project::ProjectLayout;

/// Which artifacts exist for one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SceneArtifacts {
    /// 1-based scene index.
    pub index: usize,
    pub prompt: bool,
    pub image: bool,
    pub clip: bool,
}

/// Ordered availability flags for every scene of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SceneManifest {
    scenes: Vec<SceneArtifacts>,
}

impl SceneManifest {
    /// Probe the project directory for scenes `1..=scene_count`.
    pub fn scan(layout: &ProjectLayout, scene_count: usize) -> Self {
        let scenes = (1..=scene_count)
            .map(|index| SceneArtifacts {
                index,
                prompt: layout.prompt(index).is_file(),
                image: layout.image(index).is_file(),
                clip: layout.clip(index).is_file(),
            })
            .collect();
        Self { scenes }
    }

    pub fn scenes(&self) -> &[SceneArtifacts] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SceneArtifacts> {
        index.checked_sub(1).and_then(|i| self.scenes.get(i))
    }

    /// Length of the longest run of scenes, from the first, that all have
    /// an image. Assembly stops at the first gap.
    pub fn image_prefix_len(&self) -> usize {
        self.scenes.iter().take_while(|s| s.image).count()
    }

    /// First scene without an image, if any.
    pub fn first_missing_image(&self) -> Option<usize> {
        self.scenes.iter().find(|s| !s.image).map(|s| s.index)
    }

    /// Every scene without an image.
    pub fn missing_images(&self) -> Vec<usize> {
        self.scenes
            .iter()
            .filter(|s| !s.image)
            .map(|s| s.index)
            .collect()
    }

    /// Length of the run of scenes, from the first, that all have a prompt.
    pub fn prompt_prefix_len(&self) -> usize {
        self.scenes.iter().take_while(|s| s.prompt).count()
    }

    pub fn count_prompts(&self) -> usize {
        self.scenes.iter().filter(|s| s.prompt).count()
    }

    pub fn count_images(&self) -> usize {
        self.scenes.iter().filter(|s| s.image).count()
    }

    pub fn count_clips(&self) -> usize {
        self.scenes.iter().filter(|s| s.clip).count()
    }
}

//! Shared setup for stage commands.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use talereel_common::config::{AppConfig, PipelineConfig};
use talereel_project_model::project::ProjectLayout;

/// Command-line overrides for pipeline settings.
#[derive(Debug, Clone, Default, Args)]
pub struct PipelineOverrides {
    /// Scene duration floor in seconds
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Scene duration ceiling in seconds
    #[arg(long)]
    pub max_duration: Option<f64>,

    /// Visual lead-in as a fraction of scene length, in [0, 1)
    #[arg(long)]
    pub transition: Option<f64>,

    /// Concurrent image requests per batch
    #[arg(long)]
    pub batch_size: Option<usize>,
}

impl PipelineOverrides {
    pub fn apply(&self, pipeline: &mut PipelineConfig) {
        if let Some(v) = self.min_duration {
            pipeline.min_duration = v;
        }
        if let Some(v) = self.max_duration {
            pipeline.max_duration = v;
        }
        if let Some(v) = self.transition {
            pipeline.transition_fraction = v;
        }
        if let Some(v) = self.batch_size {
            pipeline.batch_size = v;
        }
    }
}

/// Load configuration from an explicit file, or the standard location.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(AppConfig::load()),
    }
}

/// Validated configuration plus the project a stage works on.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub config: AppConfig,
    pub layout: ProjectLayout,
}

impl StageContext {
    pub fn new(config: AppConfig, project_dir: PathBuf) -> anyhow::Result<Self> {
        config.validate().context("Invalid configuration")?;
        if !project_dir.is_dir() {
            anyhow::bail!(
                "Project directory {} does not exist (create it with `talereel init`)",
                project_dir.display()
            );
        }
        let layout = ProjectLayout::new(project_dir);
        layout
            .ensure_dirs()
            .context("Failed to create project directories")?;
        Ok(Self { config, layout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let mut pipeline = PipelineConfig::default();
        PipelineOverrides {
            max_duration: Some(12.0),
            batch_size: Some(4),
            ..Default::default()
        }
        .apply(&mut pipeline);

        assert_eq!(pipeline.max_duration, 12.0);
        assert_eq!(pipeline.batch_size, 4);
        assert_eq!(pipeline.min_duration, 5.0);
        assert_eq!(pipeline.transition_fraction, 0.1);
    }

    #[test]
    fn test_context_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.pipeline.min_duration = 20.0;
        assert!(StageContext::new(config, dir.path().to_path_buf()).is_err());
    }

    #[test]
    fn test_context_requires_existing_project() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(StageContext::new(AppConfig::default(), missing).is_err());
    }

    #[test]
    fn test_context_creates_stage_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = StageContext::new(AppConfig::default(), dir.path().to_path_buf()).unwrap();
        assert!(ctx.layout.prompts_dir().is_dir());
        assert!(ctx.layout.clips_dir().is_dir());
    }
}

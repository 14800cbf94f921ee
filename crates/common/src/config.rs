//! Application configuration.
//!
//! Every stage receives its settings explicitly from an [`AppConfig`]
//! value; nothing is read from module-level state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{TalereelError, TalereelResult};
use crate::retry::RetryPolicy;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Scene segmentation and generation pacing.
    pub pipeline: PipelineConfig,

    /// Clip encoding parameters.
    pub render: RenderConfig,

    /// External collaborator endpoints and models.
    pub services: ServicesConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Scene segmentation and generation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Scene duration floor in seconds.
    pub min_duration: f64,

    /// Scene duration ceiling in seconds.
    pub max_duration: f64,

    /// Share of a scene's spoken length used as visual lead-in, in `[0, 1)`.
    pub transition_fraction: f64,

    /// Concurrent image requests per batch.
    pub batch_size: usize,

    /// Prior prompt exchanges kept as conversation context.
    pub prompt_history: usize,

    /// Upcoming scene texts shown to the prompt model.
    pub future_scenes: usize,

    /// Language the illustration prompts are written in.
    pub prompt_language: String,
}

/// Clip encoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Clip frame rate.
    pub fps: u32,

    /// Video encoder for per-scene clips.
    pub video_codec: String,

    /// Output pixel format.
    pub pixel_format: String,

    /// Audio encoder for the final mux.
    pub audio_codec: String,
}

/// External service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the OpenAI-compatible API.
    pub openai_base_url: String,

    /// Environment variable holding the OpenAI API key.
    pub openai_api_key_env: String,

    /// Chat model for metadata and prompts.
    pub chat_model: String,

    /// Image model for illustrations.
    pub image_model: String,

    /// Image quality hint (`low`, `medium`, `high`).
    pub image_quality: String,

    /// Image size, e.g. `1536x1024`.
    pub image_size: String,

    /// Base URL of the speech-to-text API.
    pub speech_base_url: String,

    /// Environment variable holding the speech-to-text API key.
    pub speech_api_key_env: String,

    /// Speech-to-text model id.
    pub speech_model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// Per-call-site retry policies.
    pub retry: RetryConfig,
}

/// Retry policy per collaborator call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub transcription: RetryPolicy,
    pub chat: RetryPolicy,
    pub images: RetryPolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "talereel=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_duration: 5.0,
            max_duration: 18.0,
            transition_fraction: 0.1,
            batch_size: 10,
            prompt_history: 6,
            future_scenes: 3,
            prompt_language: "English".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            video_codec: "libx264".to_string(),
            pixel_format: "yuv420p".to_string(),
            audio_codec: "aac".to_string(),
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com/v1".to_string(),
            openai_api_key_env: "OPENAI_API_KEY".to_string(),
            chat_model: "gpt-4.1".to_string(),
            image_model: "gpt-image-1".to_string(),
            image_quality: "medium".to_string(),
            image_size: "1536x1024".to_string(),
            speech_base_url: "https://api.elevenlabs.io/v1".to_string(),
            speech_api_key_env: "ELEVENLABS_API_KEY".to_string(),
            speech_model: "scribe_v1".to_string(),
            timeout_secs: 300,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            transcription: RetryPolicy::default(),
            chat: RetryPolicy::default(),
            images: RetryPolicy {
                max_attempts: 2,
                initial_backoff_ms: 2000,
                multiplier: 2.0,
            },
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl ServicesConfig {
    /// Read the OpenAI API key from the configured environment variable.
    pub fn openai_api_key(&self) -> TalereelResult<String> {
        read_key(&self.openai_api_key_env)
    }

    /// Read the speech-to-text API key from the configured environment variable.
    pub fn speech_api_key(&self) -> TalereelResult<String> {
        read_key(&self.speech_api_key_env)
    }
}

fn read_key(var: &str) -> TalereelResult<String> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(TalereelError::config(format!(
            "environment variable {var} is not set"
        ))),
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> TalereelResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }

    /// Reject parameter combinations the pipeline cannot honor.
    pub fn validate(&self) -> TalereelResult<()> {
        let p = &self.pipeline;
        if p.min_duration.is_nan() || p.min_duration <= 0.0 {
            return Err(TalereelError::config(format!(
                "min_duration must be positive, got {}",
                p.min_duration
            )));
        }
        if p.min_duration >= p.max_duration {
            return Err(TalereelError::config(format!(
                "min_duration ({}) must be below max_duration ({})",
                p.min_duration, p.max_duration
            )));
        }
        if !(0.0..1.0).contains(&p.transition_fraction) {
            return Err(TalereelError::config(format!(
                "transition_fraction must be in [0, 1), got {}",
                p.transition_fraction
            )));
        }
        if p.batch_size == 0 {
            return Err(TalereelError::config("batch_size must be at least 1"));
        }
        if self.render.fps == 0 {
            return Err(TalereelError::config("render fps must be at least 1"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("talereel").join("config.json")
}

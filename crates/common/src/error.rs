//! Error types shared across talereel crates.

use std::path::PathBuf;

/// Top-level error type for talereel operations.
#[derive(Debug, thiserror::Error)]
pub enum TalereelError {
    /// A prior-stage artifact is absent. Fatal for the current stage.
    #[error("Missing input: {path}")]
    MissingInput { path: PathBuf },

    /// A computed scene duration is not positive. Must be fixed upstream.
    #[error("Invalid duration for scene {index}: {duration:.3}s")]
    InvalidDuration { index: usize, duration: f64 },

    /// A scene has no source image. Truncates the assemblable prefix.
    #[error("Missing image for scene {index}: {path}")]
    MissingImage { index: usize, path: PathBuf },

    #[error("{service} failed: {message}")]
    ExternalService { service: String, message: String },

    #[error("Transcode error: {message}")]
    Transcode { message: String },

    #[error("Project error: {message}")]
    Project { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TalereelError.
pub type TalereelResult<T> = Result<T, TalereelError>;

impl TalereelError {
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    pub fn external(service: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: msg.into(),
        }
    }

    pub fn transcode(msg: impl Into<String>) -> Self {
        Self::Transcode {
            message: msg.into(),
        }
    }

    pub fn project(msg: impl Into<String>) -> Self {
        Self::Project {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the error should stop the whole run rather than a single scene.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::MissingImage { .. } | Self::ExternalService { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_context() {
        let err = TalereelError::InvalidDuration {
            index: 4,
            duration: -0.25,
        };
        assert_eq!(err.to_string(), "Invalid duration for scene 4: -0.250s");

        let err = TalereelError::MissingImage {
            index: 6,
            path: PathBuf::from("image/scene_6.png"),
        };
        assert!(err.to_string().contains("scene 6"));
        assert!(err.to_string().contains("image/scene_6.png"));
    }

    #[test]
    fn test_fatality_follows_taxonomy() {
        assert!(TalereelError::missing_input("transcr.json").is_fatal());
        assert!(TalereelError::transcode("concat failed").is_fatal());
        assert!(!TalereelError::external("images", "timeout").is_fatal());
        assert!(!TalereelError::MissingImage {
            index: 1,
            path: PathBuf::from("x.png")
        }
        .is_fatal());
    }
}

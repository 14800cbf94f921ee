//! Collaborator seams for language and image models.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use talereel_common::error::TalereelResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// JSON schema a structured completion must satisfy.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

/// Chat-completion collaborator.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Free-text completion.
    async fn complete(&self, messages: &[ChatMessage]) -> TalereelResult<String>;

    /// Completion constrained to `schema`, returned as parsed JSON.
    async fn complete_structured(
        &self,
        messages: &[ChatMessage],
        schema: &ResponseSchema,
    ) -> TalereelResult<serde_json::Value>;
}

/// Image-generation collaborator.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generate one image and return its encoded bytes (PNG).
    async fn generate(&self, prompt: &str) -> TalereelResult<Vec<u8>>;
}

//! talereel Narrative Intelligence
//!
//! Language- and image-model collaborators behind trait seams:
//! - **Metadata:** Summary, locations, cast and style from the transcript
//! - **Prompts:** One illustration prompt per scene with a sliding context window
//! - **Images:** Batched image generation with per-scene failure isolation
//!
//! Every stage skips per-scene work whose artifact is already on disk, so a
//! rerun after a partial failure only redoes what is missing.

pub mod images;
pub mod metadata;
pub mod model;
pub mod openai;
pub mod prompts;

pub use images::{generate_images, ImageReport};
pub use metadata::extract_metadata;
pub use model::{ChatMessage, ChatModel, ImageModel, ResponseSchema, Role};
pub use openai::{ImageSettings, OpenAiClient};
pub use prompts::{generate_prompts, PromptReport, PromptSettings};

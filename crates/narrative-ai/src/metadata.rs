//! Narrative metadata extraction from the full transcript text.

use talereel_common::error::{TalereelError, TalereelResult};
use talereel_common::retry::RetryPolicy;
use talereel_project_model::metadata::NarrativeMetadata;
use talereel_project_model::project::ProjectLayout;

use crate::model::{ChatMessage, ChatModel, ResponseSchema};

const METADATA_SYSTEM_PROMPT: &str = "\
You are an assistant that structures information for an illustrated presentation.
From the text, produce:

1. summary - A detailed summary of the story.
2. locations - A list of locations with descriptions.
   Format:
   [location name] - [description of the location, naming the colours of objects]
3. cast - A list of the main characters, each with the best-matching real actor as a look-alike and their clothing in each location.
   Format:
   Name - looks like [actor], age [... years]
    [location name] - wears [description naming the colours].
    [location name 2] - ...
4. style - A short description of the most fitting art style for the illustrations (10 words, be sure to name the technique).
";

/// Structured-output schema for the four metadata fields.
pub fn metadata_schema() -> ResponseSchema {
    ResponseSchema {
        name: "text_data".to_string(),
        schema: serde_json::json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string" },
                "locations": { "type": "string" },
                "cast": { "type": "string" },
                "style": { "type": "string" }
            },
            "required": ["summary", "locations", "cast", "style"],
            "additionalProperties": false
        }),
    }
}

/// Ask the chat model for metadata about `transcript_text`.
pub async fn request_metadata(
    chat: &dyn ChatModel,
    transcript_text: &str,
    retry: &RetryPolicy,
) -> TalereelResult<NarrativeMetadata> {
    let messages = [
        ChatMessage::system(METADATA_SYSTEM_PROMPT),
        ChatMessage::user(transcript_text),
    ];
    let schema = metadata_schema();
    let messages = &messages[..];
    let schema = &schema;
    let value = retry
        .run("metadata", move || chat.complete_structured(messages, schema))
        .await?;
    serde_json::from_value(value)
        .map_err(|e| TalereelError::external("chat", format!("metadata has wrong shape: {e}")))
}

/// Extract metadata and persist each field as its own text artifact.
///
/// Returns `None` without calling the model when all four artifacts
/// already exist and `force` is false.
pub async fn extract_metadata(
    layout: &ProjectLayout,
    chat: &dyn ChatModel,
    retry: &RetryPolicy,
    force: bool,
) -> TalereelResult<Option<NarrativeMetadata>> {
    if layout.has_metadata() && !force {
        tracing::info!("Metadata exists, skipping extraction");
        return Ok(None);
    }

    let transcript = layout.load_transcript()?;
    if transcript.text.trim().is_empty() {
        return Err(TalereelError::project("transcript has no text"));
    }

    tracing::info!(chars = transcript.text.len(), "Extracting narrative metadata");
    let metadata = request_metadata(chat, &transcript.text, retry).await?;
    layout.save_metadata(&metadata)?;

    tracing::info!(
        summary_chars = metadata.summary.len(),
        style = %metadata.style,
        "Metadata saved"
    );
    Ok(Some(metadata))
}

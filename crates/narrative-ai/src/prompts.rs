//! Illustration prompt generation.
//!
//! Scenes are processed in order. Each request carries the system context
//! (summary, locations, cast), the last few prompt exchanges, and a user
//! message with the current scene and a window of upcoming scenes. A prompt
//! already on disk is reused instead of asking the model, but it still
//! enters the history so later scenes see the same context either way.

use std::collections::VecDeque;

use serde::Serialize;
use talereel_common::config::PipelineConfig;
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_common::retry::RetryPolicy;
use talereel_project_model::metadata::NarrativeMetadata;
use talereel_project_model::project::{read_text, write_text, ProjectLayout};
use talereel_project_model::scene::Scene;

use crate::model::{ChatMessage, ChatModel};

/// Prompt window and history sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSettings {
    /// Prior user/assistant exchanges kept as context.
    pub history: usize,
    /// Upcoming scene texts shown with the current one.
    pub future_scenes: usize,
    /// Language the prompts are written in.
    pub language: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            history: 6,
            future_scenes: 3,
            language: "English".to_string(),
        }
    }
}

impl From<&PipelineConfig> for PromptSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            history: config.prompt_history,
            future_scenes: config.future_scenes,
            language: config.prompt_language.clone(),
        }
    }
}

pub fn system_prompt(metadata: &NarrativeMetadata, language: &str) -> String {
    format!(
        "\
Your task is to write prompts for generating illustrations for the following story.

Summary:
{summary}

Locations:
{locations}

Cast:
{cast}

Write one prompt in {language} for illustrating the scene <current_scene/>. Use the content of <future_scenes/> to anticipate upcoming scenes.

Every scene prompt must state:
- first, the shot and camera angle. Use wide, long, medium, close-up, extreme close-up, detail and other shots to make the series of illustrations more expressive and dynamic. Change shots and angles more often during monotonous passages. Keep in mind that medium and close-up shots often look the same.
- the location where the scene takes place (see Locations)
- every participant of the scene: for each, give the look-alike actor, age, and clothing (see Cast)

Do not explain and do not add extra text.
",
        summary = metadata.summary,
        locations = metadata.locations,
        cast = metadata.cast,
    )
}

pub fn user_prompt(current: &str, future: &[&str]) -> String {
    format!(
        "
Write a prompt for illustrating the scene <current_scene/>:

<current_scene>
{current}
</current_scene>

<future_scenes>
{}
</future_scenes>
",
        future.join("\n")
    )
}

/// Texts of the scenes following `position` (0-based), at most `count`.
pub fn future_window(scenes: &[Scene], position: usize, count: usize) -> Vec<&str> {
    scenes
        .iter()
        .skip(position + 1)
        .take(count)
        .map(|s| s.text.as_str())
        .collect()
}

/// Rolling user/assistant history, oldest exchange dropped first.
#[derive(Debug, Clone, Default)]
pub struct PromptHistory {
    max_exchanges: usize,
    messages: VecDeque<ChatMessage>,
}

impl PromptHistory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            max_exchanges,
            messages: VecDeque::new(),
        }
    }

    /// Request messages: system context, kept history, then `user`.
    pub fn request(&self, system: &ChatMessage, user: &ChatMessage) -> Vec<ChatMessage> {
        std::iter::once(system.clone())
            .chain(self.messages.iter().cloned())
            .chain(std::iter::once(user.clone()))
            .collect()
    }

    /// Record a completed exchange and trim to the configured size.
    pub fn push_exchange(&mut self, user: ChatMessage, assistant: ChatMessage) {
        self.messages.push_back(user);
        self.messages.push_back(assistant);
        while self.messages.len() > self.max_exchanges * 2 {
            self.messages.pop_front();
            self.messages.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Outcome of the prompt stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptReport {
    pub generated: Vec<usize>,
    pub reused: Vec<usize>,
}

/// Generate a prompt file for every scene that lacks one.
///
/// Runs strictly in scene order. A model failure stops the stage; prompts
/// already written stay on disk and are reused by the next run.
pub async fn generate_prompts(
    layout: &ProjectLayout,
    scenes: &[Scene],
    metadata: &NarrativeMetadata,
    chat: &dyn ChatModel,
    settings: &PromptSettings,
    retry: &RetryPolicy,
) -> TalereelResult<PromptReport> {
    layout.ensure_dirs()?;
    let system = ChatMessage::system(system_prompt(metadata, &settings.language));
    let mut history = PromptHistory::new(settings.history);
    let mut report = PromptReport::default();

    for (position, scene) in scenes.iter().enumerate() {
        let future = future_window(scenes, position, settings.future_scenes);
        let user = ChatMessage::user(user_prompt(&scene.text, &future));
        let path = layout.prompt(scene.index);

        let prompt = if path.is_file() {
            report.reused.push(scene.index);
            read_text(&path)?
        } else {
            let messages = history.request(&system, &user);
            let messages = &messages[..];
            let reply = retry
                .run("prompts", move || chat.complete(messages))
                .await
                .map_err(|e| annotate(e, scene.index))?;
            let prompt = reply.trim().to_string();
            if prompt.is_empty() {
                return Err(TalereelError::external(
                    "chat",
                    format!("empty prompt for scene {}", scene.index),
                ));
            }
            write_text(&path, &prompt)?;
            tracing::info!(scene = scene.index, path = %path.display(), "Prompt generated");
            report.generated.push(scene.index);
            prompt
        };

        history.push_exchange(user, ChatMessage::assistant(prompt));
    }

    tracing::info!(
        generated = report.generated.len(),
        reused = report.reused.len(),
        "Prompt stage complete"
    );
    Ok(report)
}

fn annotate(err: TalereelError, index: usize) -> TalereelError {
    match err {
        TalereelError::ExternalService { service, message } => TalereelError::ExternalService {
            service,
            message: format!("scene {index}: {message}"),
        },
        other => other,
    }
}

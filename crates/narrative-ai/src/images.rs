//! Batched illustration generation.
//!
//! Requests go out in fixed-size batches; each batch is awaited in full
//! before the next one starts, which bounds outstanding requests to the
//! batch size. A failed request is logged with its scene and never cancels
//! the other requests of its batch. A fatal error (the image could not be
//! written, say) stops the stage once its batch has settled.

use std::path::PathBuf;

use futures::future::join_all;
use serde::Serialize;
use talereel_common::error::{TalereelError, TalereelResult};
use talereel_common::retry::RetryPolicy;
use talereel_project_model::project::{read_text, ProjectLayout};

use crate::model::ImageModel;

/// Suffix appended to every prompt so all illustrations share one style.
pub fn style_suffix(style: &str) -> String {
    format!("\nStyle: {}\n", style.trim())
}

/// Prompts from `scene_1` upward, stopping at the first missing file.
pub fn load_prompts(layout: &ProjectLayout) -> TalereelResult<Vec<(usize, String)>> {
    let mut prompts = vec![];
    for index in 1.. {
        let path = layout.prompt(index);
        if !path.is_file() {
            break;
        }
        prompts.push((index, read_text(&path)?.trim().to_string()));
    }
    Ok(prompts)
}

/// One pending image request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTask {
    pub index: usize,
    pub prompt: String,
    pub output: PathBuf,
}

/// Outcome of the image stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageReport {
    pub generated: Vec<usize>,
    pub failed: Vec<usize>,
    /// Scenes whose image already existed.
    pub skipped: Vec<usize>,
}

/// Build requests for every loaded prompt whose image is missing.
pub fn plan_tasks(
    layout: &ProjectLayout,
    prompts: &[(usize, String)],
    style: &str,
) -> (Vec<ImageTask>, Vec<usize>) {
    let suffix = style_suffix(style);
    let mut tasks = vec![];
    let mut skipped = vec![];
    for (index, prompt) in prompts {
        let output = layout.image(*index);
        if output.is_file() {
            skipped.push(*index);
            continue;
        }
        tasks.push(ImageTask {
            index: *index,
            prompt: format!("{prompt}{suffix}"),
            output,
        });
    }
    (tasks, skipped)
}

/// Generate missing images for every scene with a prompt.
pub async fn generate_images(
    layout: &ProjectLayout,
    model: &dyn ImageModel,
    batch_size: usize,
    retry: &RetryPolicy,
) -> TalereelResult<ImageReport> {
    if batch_size == 0 {
        return Err(TalereelError::config("batch_size must be at least 1"));
    }
    layout.ensure_dirs()?;

    let style = read_text(&layout.style())?;
    let prompts = load_prompts(layout)?;
    tracing::info!(prompts = prompts.len(), "Loaded prompts");

    let (tasks, skipped) = plan_tasks(layout, &prompts, &style);
    let mut report = ImageReport {
        skipped,
        ..Default::default()
    };

    let batches = tasks.len().div_ceil(batch_size);
    for (batch_no, batch) in tasks.chunks(batch_size).enumerate() {
        let results = join_all(batch.iter().map(|task| run_task(task, model, retry))).await;
        let mut fatal = None;
        for (task, result) in batch.iter().zip(results) {
            match result {
                Ok(()) => report.generated.push(task.index),
                Err(err) => {
                    tracing::error!(
                        scene = task.index,
                        path = %task.output.display(),
                        error = %err,
                        "Image generation failed"
                    );
                    report.failed.push(task.index);
                    if err.is_fatal() && fatal.is_none() {
                        fatal = Some(err);
                    }
                }
            }
        }
        if let Some(err) = fatal {
            return Err(err);
        }
        tracing::info!(batch = batch_no + 1, of = batches, "Image batch complete");
    }

    tracing::info!(
        generated = report.generated.len(),
        failed = report.failed.len(),
        skipped = report.skipped.len(),
        "Image stage complete"
    );
    Ok(report)
}

async fn run_task(
    task: &ImageTask,
    model: &dyn ImageModel,
    retry: &RetryPolicy,
) -> TalereelResult<()> {
    tracing::debug!(scene = task.index, path = %task.output.display(), "Generating image");
    let prompt = task.prompt.as_str();
    let bytes = retry.run("images", move || model.generate(prompt)).await?;
    tokio::fs::write(&task.output, bytes).await?;
    tracing::info!(scene = task.index, path = %task.output.display(), "Image saved");
    Ok(())
}

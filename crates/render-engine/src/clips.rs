//! Per-scene clip rendering with write-through ledger updates.

use serde::Serialize;
use talereel_common::error::TalereelResult;
use talereel_project_model::ledger::RenderLedger;
use talereel_project_model::project::ProjectLayout;
use talereel_project_model::scene::Scene;

use crate::cache::{decide, hash_file, RenderDecision};
use crate::transcoder::{ClipJob, Transcoder};

/// Outcome of the clip stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClipReport {
    /// Scenes whose clip was (re)rendered this run.
    pub rendered: Vec<usize>,
    /// Scenes whose cached clip was reused.
    pub skipped: Vec<usize>,
}

/// Render stale clips for `scenes`, one at a time in index order.
///
/// Every scene passed in must have an image; callers restrict the slice to
/// the contiguous image prefix. The ledger is persisted after each
/// successful render, so an interrupted run keeps the entries of the clips
/// that did finish. A transcoding failure stops the stage.
pub fn render_clips(
    scenes: &[Scene],
    layout: &ProjectLayout,
    transcoder: &mut dyn Transcoder,
) -> TalereelResult<ClipReport> {
    let ledger_path = layout.ledger();
    let mut ledger = RenderLedger::load(&ledger_path)?;
    let mut report = ClipReport::default();

    for scene in scenes {
        let image = layout.image(scene.index);
        let clip = layout.clip(scene.index);
        let hash = hash_file(&image)?;

        match decide(scene.index, clip.is_file(), &ledger, &hash) {
            RenderDecision::Skip => {
                tracing::debug!(scene = scene.index, "Clip up to date");
                report.skipped.push(scene.index);
            }
            RenderDecision::Render(reason) => {
                tracing::info!(
                    scene = scene.index,
                    ?reason,
                    duration = scene.duration,
                    "Rendering clip"
                );
                transcoder.render_clip(&ClipJob {
                    index: scene.index,
                    image,
                    output: clip,
                    duration: scene.duration,
                })?;
                ledger.record(scene.index, hash);
                ledger.save(&ledger_path)?;
                report.rendered.push(scene.index);
            }
        }
    }

    tracing::info!(
        rendered = report.rendered.len(),
        skipped = report.skipped.len(),
        "Clip stage complete"
    );
    Ok(report)
}

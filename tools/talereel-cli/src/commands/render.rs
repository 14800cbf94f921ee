//! Render clips and assemble the final video.

use anyhow::Context;
use talereel_common::{format_clock, StageClock};
use talereel_project_model::manifest::SceneManifest;
use talereel_render_engine::{render_project, FfmpegTranscoder};

use crate::commands::images::join_indices;
use crate::context::StageContext;

pub fn run(ctx: &StageContext) -> anyhow::Result<()> {
    let layout = &ctx.layout;
    println!("Rendering project at: {}", layout.root().display());

    let scenes = layout
        .load_scenes()
        .context("Failed to load scenes (run `talereel scenes` first)")?;
    let manifest = SceneManifest::scan(layout, scenes.len());

    let clock = StageClock::start("render");
    let mut transcoder = FfmpegTranscoder::new(ctx.config.render.clone());
    let report = render_project(&scenes, &manifest, layout, &mut transcoder)?;
    clock.finish();

    println!(
        "  [OK] Clips: {} rendered, {} up to date",
        report.rendered.len(),
        report.skipped.len()
    );
    if let Some(first) = report.missing_images.first() {
        println!(
            "  [WARN] Missing images: scenes {} (assembly stops before scene {first})",
            join_indices(&report.missing_images)
        );
    }
    match report.output {
        Some(output) => {
            println!(
                "  [OK] Assembled {}/{} scenes ({})",
                report.assembled_scenes,
                scenes.len(),
                format_clock(report.total_duration)
            );
            println!("\nVideo: {}", output.display());
        }
        None => println!("  [WARN] No scene has an image yet; nothing assembled"),
    }
    Ok(())
}

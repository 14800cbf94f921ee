//! Illustration prompt stage.

use anyhow::Context;
use talereel_common::StageClock;
use talereel_narrative_ai::{generate_prompts, OpenAiClient, PromptSettings};

use crate::context::StageContext;

pub async fn run(ctx: &StageContext) -> anyhow::Result<()> {
    let layout = &ctx.layout;
    println!("Writing prompts: {}", layout.prompts_dir().display());

    let scenes = layout
        .load_scenes()
        .context("Failed to load scenes (run `talereel scenes` first)")?;
    let metadata = layout
        .load_metadata()
        .context("Failed to load metadata (run `talereel extract` first)")?;

    let clock = StageClock::start("prompts");
    let services = &ctx.config.services;
    let client = OpenAiClient::from_config(services)?;
    let settings = PromptSettings::from(&ctx.config.pipeline);
    let report = generate_prompts(
        layout,
        &scenes,
        &metadata,
        &client,
        &settings,
        &services.retry.chat,
    )
    .await?;
    clock.finish();

    println!(
        "  [OK] {} generated, {} reused ({} scenes)",
        report.generated.len(),
        report.reused.len(),
        scenes.len()
    );
    Ok(())
}

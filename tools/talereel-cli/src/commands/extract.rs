//! Narrative metadata extraction.

use talereel_common::StageClock;
use talereel_narrative_ai::{extract_metadata, OpenAiClient};

use crate::context::StageContext;

pub async fn run(ctx: &StageContext, force: bool) -> anyhow::Result<()> {
    println!("Extracting metadata: {}", ctx.layout.transcript().display());
    if ctx.layout.has_metadata() && !force {
        println!("  [SKIP] summary, locations, cast and style already exist");
        return Ok(());
    }

    let clock = StageClock::start("extract");
    let services = &ctx.config.services;
    let client = OpenAiClient::from_config(services)?;
    let metadata = extract_metadata(&ctx.layout, &client, &services.retry.chat, force).await?;
    clock.finish();

    match metadata {
        Some(metadata) => {
            println!("  [OK] Summary: {} chars", metadata.summary.chars().count());
            println!("  [OK] Locations: {} lines", metadata.locations.lines().count());
            println!("  [OK] Cast: {} lines", metadata.cast.lines().count());
            println!("  [OK] Style: {}", metadata.style.trim());
        }
        None => println!("  [SKIP] summary, locations, cast and style already exist"),
    }
    Ok(())
}

//! Run every stage in order.
//!
//! Each stage skips work whose artifacts already exist, so an interrupted
//! run resumes where it stopped.

use talereel_common::StageClock;

use crate::commands;
use crate::context::StageContext;

pub async fn run(ctx: &StageContext) -> anyhow::Result<()> {
    let clock = StageClock::start("pipeline");

    commands::transcribe::run(ctx).await?;
    println!();
    commands::scenes::run(ctx, None, false)?;
    println!();
    commands::extract::run(ctx, false).await?;
    println!();
    commands::prompts::run(ctx).await?;
    println!();
    commands::images::run(ctx).await?;
    println!();
    commands::render::run(ctx)?;

    let elapsed = clock.finish();
    println!("\nPipeline finished in {elapsed:.1}s");
    Ok(())
}

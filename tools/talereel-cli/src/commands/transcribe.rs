//! Speech-to-text stage.

use talereel_audio_ai::{transcribe_project, ElevenLabsClient, TranscribeOutcome};
use talereel_common::StageClock;

use crate::context::StageContext;

pub async fn run(ctx: &StageContext) -> anyhow::Result<()> {
    println!("Transcribing: {}", ctx.layout.audio().display());
    if ctx.layout.transcript().exists() {
        println!("  [SKIP] transcr.json already exists");
        return Ok(());
    }

    let clock = StageClock::start("transcribe");
    let services = &ctx.config.services;
    let client = ElevenLabsClient::from_config(services)?;
    let outcome = transcribe_project(&ctx.layout, &client, &services.retry.transcription).await?;
    clock.finish();

    match outcome {
        TranscribeOutcome::Cached => println!("  [SKIP] transcr.json already exists"),
        TranscribeOutcome::Transcribed { words, spoken } => {
            println!("  [OK] {words} entries ({spoken} spoken words)");
            println!("  Saved: {}", ctx.layout.transcript().display());
        }
    }
    Ok(())
}

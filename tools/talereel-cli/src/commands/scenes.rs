//! Segment the transcript into timed scenes.

use anyhow::Context;
use talereel_audio_ai::probe_duration_seconds;
use talereel_common::{format_clock, StageClock};
use talereel_processing_core::{build_scenes, SceneStats, SegmentationConfig};

use crate::context::StageContext;

pub fn run(ctx: &StageContext, total_duration: Option<f64>, force: bool) -> anyhow::Result<()> {
    let layout = &ctx.layout;
    println!("Segmenting: {}", layout.transcript().display());

    if layout.scenes().exists() && !force {
        println!("  [SKIP] scenes.json already exists (use --force to rebuild)");
        return Ok(());
    }

    let clock = StageClock::start("scenes");
    let transcript = layout.load_transcript().context("Failed to load transcript")?;
    let total = match total_duration {
        Some(total) => total,
        None => probe_duration_seconds(&layout.audio())
            .context("Failed to read narration duration")?,
    };
    println!(
        "  Narration: {total:.2}s (speech ends at {:.2}s)",
        transcript.span_end()
    );

    let config = SegmentationConfig::from_pipeline(&ctx.config.pipeline)?;
    let scenes = build_scenes(&transcript.words, &config, total)?;
    layout.save_scenes(&scenes)?;
    clock.finish();

    match SceneStats::compute(&scenes) {
        Some(stats) => {
            stats.log();
            println!(
                "  [OK] {} scenes, average {:.1}s (shortest {:.1}s, longest {:.1}s)",
                stats.count, stats.average, stats.shortest, stats.longest
            );
        }
        None => println!("  [WARN] Transcript has no spoken words; no scenes written"),
    }
    for scene in &scenes {
        println!(
            "    {:>3}  {:>5}-{:<5}  {}",
            scene.index,
            scene.offset_start_str,
            format_clock(scene.offset_end()),
            preview(&scene.text, 60)
        );
    }
    println!("  Saved: {}", layout.scenes().display());
    Ok(())
}

fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{cut}...")
}

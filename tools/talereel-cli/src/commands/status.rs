//! Show per-stage progress of a project.

use std::path::PathBuf;

use talereel_common::format_clock;
use talereel_project_model::manifest::SceneManifest;
use talereel_project_model::project::ProjectLayout;
use talereel_project_model::scene::total_duration;

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    let layout = ProjectLayout::new(&path);
    if !layout.root().is_dir() {
        anyhow::bail!("Project directory not found: {}", path.display());
    }

    match layout.info()? {
        Some(info) => {
            println!("Project: {}", info.name);
            println!("  Created: {}", info.created_at);
        }
        None => println!("Project: {}", path.display()),
    }
    println!();

    println!("Stages:");
    println!("  Audio:      {}", mark(layout.audio().is_file()));
    if layout.transcript().is_file() {
        let transcript = layout.load_transcript()?;
        println!(
            "  Transcript: {} ({} spoken words, ends at {})",
            mark(true),
            transcript.spoken_word_count(),
            format_clock(transcript.span_end())
        );
    } else {
        println!("  Transcript: {}", mark(false));
    }
    println!("  Metadata:   {}", mark(layout.has_metadata()));

    if !layout.scenes().is_file() {
        println!("  Scenes:     {}", mark(false));
        return Ok(());
    }
    let scenes = layout.load_scenes()?;
    println!(
        "  Scenes:     {} ({} total)",
        scenes.len(),
        format_clock(total_duration(&scenes))
    );

    let manifest = SceneManifest::scan(&layout, scenes.len());
    println!("  Prompts:    {}/{}", manifest.count_prompts(), scenes.len());
    if manifest.prompt_prefix_len() < manifest.count_prompts() {
        println!(
            "              images use scenes 1-{} (prompt gap after)",
            manifest.prompt_prefix_len()
        );
    }
    println!("  Images:     {}/{}", manifest.count_images(), scenes.len());
    println!("  Clips:      {}/{}", manifest.count_clips(), scenes.len());

    let ledger = layout.load_ledger()?;
    println!("  Ledger:     {} entries", ledger.len());
    println!("  Output:     {}", mark(layout.output().is_file()));

    if let Some(index) = manifest.first_missing_image() {
        println!();
        println!(
            "Assembly currently stops before scene {index} ({} of {} scenes)",
            manifest.image_prefix_len(),
            scenes.len()
        );
    }
    Ok(())
}

fn mark(done: bool) -> &'static str {
    if done {
        "[OK]"
    } else {
        "[--]"
    }
}

//! Create a new project directory.

use std::path::PathBuf;

use talereel_project_model::project::ProjectLayout;

pub fn run(path: PathBuf, name: Option<String>, audio: Option<PathBuf>) -> anyhow::Result<()> {
    let name = name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string())
    });

    let layout = ProjectLayout::create(&path, name.clone())
        .map_err(|e| anyhow::anyhow!("Failed to create project: {e}"))?;
    println!("Created project '{name}' at: {}", layout.root().display());

    if let Some(source) = audio {
        if !source.is_file() {
            anyhow::bail!("Audio file not found: {}", source.display());
        }
        std::fs::copy(&source, layout.audio())?;
        println!("  Narration: {}", layout.audio().display());
    } else {
        println!("  Copy the narration to {}", layout.audio().display());
    }

    println!("\nNext: talereel run {}", path.display());
    Ok(())
}

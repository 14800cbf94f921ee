//! Print or save the effective configuration.

use talereel_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, save: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    if save {
        config.save()?;
        println!("\nSaved: {}", config_file_path().display());
    }
    Ok(())
}

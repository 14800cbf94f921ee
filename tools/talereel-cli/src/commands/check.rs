//! Check tools, API keys and configuration.

use talereel_common::config::AppConfig;
use talereel_render_engine::transcoder::command_exists;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("talereel System Check");
    println!("{}", "=".repeat(50));

    let mut ready = true;

    for tool in ["ffmpeg", "ffprobe"] {
        if command_exists(tool) {
            println!("[OK] {tool} found");
        } else {
            println!("[MISSING] {tool} not found in PATH");
            ready = false;
        }
    }

    let services = &config.services;
    for (var, key) in [
        (&services.speech_api_key_env, services.speech_api_key()),
        (&services.openai_api_key_env, services.openai_api_key()),
    ] {
        match key {
            Ok(_) => println!("[OK] {var} is set"),
            Err(_) => {
                println!("[MISSING] {var} is not set");
                ready = false;
            }
        }
    }

    match config.validate() {
        Ok(()) => println!(
            "[OK] Config: scenes {}-{}s, lead-in {}, batches of {}",
            config.pipeline.min_duration,
            config.pipeline.max_duration,
            config.pipeline.transition_fraction,
            config.pipeline.batch_size
        ),
        Err(e) => {
            println!("[ERROR] {e}");
            ready = false;
        }
    }

    println!();
    if ready {
        println!("All requirements are met. talereel is ready.");
    } else {
        println!("Some requirements are missing. See above for fixes.");
    }
    Ok(())
}

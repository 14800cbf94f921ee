//! talereel CLI: turn a narrated recording into an illustrated video.
//!
//! Usage:
//!   talereel init <PATH>         Create a project directory
//!   talereel transcribe <PATH>   Speech-to-text into transcr.json
//!   talereel scenes <PATH>       Segment the transcript into timed scenes
//!   talereel extract <PATH>      Derive summary, locations, cast and style
//!   talereel prompts <PATH>      Write one illustration prompt per scene
//!   talereel images <PATH>       Generate missing scene images
//!   talereel render <PATH>       Render stale clips and assemble output.mp4
//!   talereel run <PATH>          All of the above, in order
//!   talereel status <PATH>       Show per-stage progress
//!   talereel check               Check tools and API keys

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod context;

use context::PipelineOverrides;

#[derive(Parser)]
#[command(
    name = "talereel",
    about = "Illustrated video from narrated audio",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/talereel/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new project directory
    Init {
        /// Project directory
        path: PathBuf,

        /// Project name (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,

        /// Narration to copy in as audio.mp3
        #[arg(short, long)]
        audio: Option<PathBuf>,
    },

    /// Transcribe audio.mp3 into transcr.json
    Transcribe {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Segment the transcript into timed scenes
    Scenes {
        /// Path to the project directory
        path: PathBuf,

        /// Total audio duration in seconds (skips ffprobe)
        #[arg(long)]
        total_duration: Option<f64>,

        /// Overwrite an existing scenes.json
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        overrides: PipelineOverrides,
    },

    /// Extract narrative metadata from the transcript
    Extract {
        /// Path to the project directory
        path: PathBuf,

        /// Overwrite existing metadata files
        #[arg(long)]
        force: bool,
    },

    /// Generate illustration prompts
    Prompts {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Generate scene images
    Images {
        /// Path to the project directory
        path: PathBuf,

        #[command(flatten)]
        overrides: PipelineOverrides,
    },

    /// Render clips and assemble the final video
    Render {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Run every stage in order, skipping completed work
    Run {
        /// Path to the project directory
        path: PathBuf,

        #[command(flatten)]
        overrides: PipelineOverrides,
    },

    /// Show per-stage progress of a project
    Status {
        /// Path to the project directory
        path: PathBuf,
    },

    /// Check tools, API keys and configuration
    Check,

    /// Print the effective configuration
    Config {
        /// Write it to the standard config location
        #[arg(long)]
        save: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = context::load_config(cli.config.as_deref())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    talereel_common::logging::init_logging(&config.logging);
    tracing::debug!(config = ?cli.config, "Configuration loaded");

    match cli.command {
        Commands::Init { path, name, audio } => commands::init::run(path, name, audio),
        Commands::Transcribe { path } => {
            let ctx = context::StageContext::new(config, path)?;
            commands::transcribe::run(&ctx).await
        }
        Commands::Scenes {
            path,
            total_duration,
            force,
            overrides,
        } => {
            overrides.apply(&mut config.pipeline);
            let ctx = context::StageContext::new(config, path)?;
            commands::scenes::run(&ctx, total_duration, force)
        }
        Commands::Extract { path, force } => {
            let ctx = context::StageContext::new(config, path)?;
            commands::extract::run(&ctx, force).await
        }
        Commands::Prompts { path } => {
            let ctx = context::StageContext::new(config, path)?;
            commands::prompts::run(&ctx).await
        }
        Commands::Images { path, overrides } => {
            overrides.apply(&mut config.pipeline);
            let ctx = context::StageContext::new(config, path)?;
            commands::images::run(&ctx).await
        }
        Commands::Render { path } => {
            let ctx = context::StageContext::new(config, path)?;
            commands::render::run(&ctx)
        }
        Commands::Run { path, overrides } => {
            overrides.apply(&mut config.pipeline);
            let ctx = context::StageContext::new(config, path)?;
            commands::run::run(&ctx).await
        }
        Commands::Status { path } => commands::status::run(path),
        Commands::Check => commands::check::run(&config),
        Commands::Config { save } => commands::config::run(&config, save),
    }
}

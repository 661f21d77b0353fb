//! Vibeshow - AI Slideshows for a Song
//!
//! # Usage
//!
//! ```bash
//! # List the art styles
//! vibeshow styles
//!
//! # Generate slides for a track
//! VIBESHOW_API_KEY=... vibeshow generate "Moonlight Drive.mp3" --style kidcore --out slides/
//!
//! # Play them back (stdin: p, n, b, s <pct>, q)
//! vibeshow play "Moonlight Drive.mp3" --slides slides/ --duration 214
//!
//! # Verbose logging
//! RUST_LOG=debug vibeshow generate ...
//! ```
//!
//! # Files
//!
//! - Config: `$XDG_CONFIG_HOME/vibeshow/config.toml` (override with `--config`)

mod generate;
mod manifest;
mod play;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use vibeshow_core::{default_config_path, load_config_from_path, ArtStyle, ConfigOverrides};

/// Vibeshow - generate and play AI slideshows for a song
#[derive(Parser, Debug)]
#[command(name = "vibeshow")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "VIBESHOW_CONFIG", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "VIBESHOW_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available art styles
    Styles,

    /// Generate slides for an audio file
    Generate {
        /// Audio file; its name becomes the song title
        audio: PathBuf,

        /// Art style (slug, label or description)
        #[arg(short, long)]
        style: ArtStyle,

        /// Output directory for images and slides.json
        #[arg(short, long, default_value = "slides", value_name = "DIR")]
        out: PathBuf,

        /// API key for the content service
        #[arg(long, value_name = "KEY")]
        api_key: Option<String>,

        /// Number of slides to request
        #[arg(short = 'n', long)]
        slide_count: Option<usize>,

        /// Renders in flight at once
        #[arg(short, long)]
        batch_size: Option<usize>,
    },

    /// Play a generated slide directory
    Play {
        /// Audio file the slides were generated for
        audio: PathBuf,

        /// Directory written by `generate`
        #[arg(short, long, default_value = "slides", value_name = "DIR")]
        slides: PathBuf,

        /// Track length in seconds
        #[arg(short, long, default_value_t = 180.0)]
        duration: f64,

        /// Slide rotation period in milliseconds
        #[arg(short, long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
}

/// Initialize logging with the specified level
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("vibeshow={level}").parse()?)
        .add_directive(format!("vibeshow_core={level}").parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level)?;

    let config_path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(config_path).context("Failed to load configuration")?;

    let overrides = match &args.command {
        Command::Generate {
            api_key,
            slide_count,
            batch_size,
            ..
        } => ConfigOverrides {
            api_key: api_key.clone(),
            slide_count: *slide_count,
            batch_size: *batch_size,
            slide_interval_ms: None,
        },
        Command::Play { interval_ms, .. } => ConfigOverrides {
            slide_interval_ms: *interval_ms,
            ..ConfigOverrides::default()
        },
        Command::Styles => ConfigOverrides::default(),
    };
    overrides.apply(&mut config);
    config.validate()?;
    info!(source = %config.source(), "Configuration resolved");

    match args.command {
        Command::Styles => {
            for style in ArtStyle::ALL {
                println!("{:<16} {}", style.slug(), style.description());
            }
            Ok(())
        }
        Command::Generate {
            audio, style, out, ..
        } => generate::run(&config, &audio, style, &out).await,
        Command::Play {
            audio,
            slides,
            duration,
            ..
        } => play::run(&config, &audio, &slides, duration).await,
    }
}

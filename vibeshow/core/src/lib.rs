//! Vibeshow Core - Headless Slideshow Generation and Playback
//!
//! Turns a song into a slideshow: a content service writes scene
//! descriptions for the song title in a chosen art style, renders one image
//! per description, and a playback controller rotates the slides in sync
//! with the audio's play/pause state.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Surfaces (CLI, ...)                     │
//! │         Workflow: Upload -> Style -> Generating -> Playing       │
//! └───────────────┬──────────────────────────────────┬───────────────┘
//!                 │ title, style                     │ commands
//!                 v                                  v
//! ┌───────────────────────────────┐  ┌───────────────────────────────┐
//! │      SlideshowGenerator       │  │        PlaybackHandle         │
//! │  prompts -> batched renders   │  │  PlaybackController + timer   │
//! │  -> Vec<Slide> + progress     │  │  AudioHandle + AudioEvent rx  │
//! └───────────────┬───────────────┘  └───────────────────────────────┘
//!                 │
//!                 v
//! ┌───────────────────────────────┐
//! │   ContentService (Gemini,     │
//! │   Mock)                       │
//! └───────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use vibeshow_core::{ArtStyle, GeminiClient, SlideshowGenerator, load_config};
//!
//! let config = load_config()?;
//! let client = GeminiClient::new(config.service.clone())?;
//! let generator = SlideshowGenerator::with_config(client, config.generation.clone());
//!
//! let slides = generator
//!     .generate_slideshow("Moonlight Drive", ArtStyle::Kidcore, |done, total| {
//!         println!("{done}/{total}");
//!     })
//!     .await;
//! ```
//!
//! # Module Overview
//!
//! - [`style`]: Art style catalogue
//! - [`slides`]: Slides, inline images, generation progress
//! - [`service`]: Content-generation service abstraction (Gemini, mock)
//! - [`generation`]: Prompt generation, rendering, batch scheduling
//! - [`playback`]: Playback controller, audio collaborator, actor handle
//! - [`workflow`]: Upload / style / generating / playing state machine
//! - [`config`]: TOML + environment configuration

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod generation;
pub mod playback;
pub mod service;
pub mod slides;
pub mod style;
pub mod workflow;

// Re-exports for convenience
pub use generation::{
    generate_prompts, render_image, FallbackReason, GenerationConfig, PromptOutcome, PromptSource,
    RenderOutcome, SlideFailure, SlideshowGenerator, SlideshowReport,
};
pub use playback::{
    AudioEvent, AudioHandle, ClockAudio, PlaybackController, PlaybackError, PlaybackHandle,
    PlaybackPhase, PlaybackState,
};
pub use service::{
    ContentService, GeminiClient, ImageRequest, InlineImage, MockService, ServiceConfig,
    ServiceError, TextRequest,
};
pub use slides::{GenerationStatus, GenerationStep, ImageRef, Slide};
pub use style::{ArtStyle, UnknownStyle};
pub use workflow::{AudioTrack, Workflow, WorkflowError, WorkflowStage};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, VibeshowConfig, VibeshowToml,
};

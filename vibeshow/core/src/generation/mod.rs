//! Slideshow Generation
//!
//! The pipeline from (title, style) to an ordered slide list:
//!
//! - [`prompts`]: scene descriptions, with a deterministic fallback
//! - [`render`]: one image per description, failures folded into the result
//! - [`scheduler`]: batched, bounded-concurrency orchestration with progress

pub mod prompts;
pub mod render;
pub mod scheduler;

pub use prompts::{generate_prompts, FallbackReason, PromptOutcome, PromptSource};
pub use render::{render_image, RenderOutcome, DEFAULT_ASPECT_RATIO};
pub use scheduler::{
    GenerationConfig, SlideFailure, SlideshowGenerator, SlideshowReport, DEFAULT_BATCH_SIZE,
    DEFAULT_SLIDE_COUNT,
};

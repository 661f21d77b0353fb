//! Batch Scheduler
//!
//! Turns a (title, style) pair into an ordered slide list:
//!
//! ```text
//! generate_prompts(count)
//!         │
//!         v
//! [p0 p1] [p2 p3] [p4 p5]      fixed-size batches, prompt order kept
//!    │       │       │
//!    │  barrier│ barrier│      batch k+1 starts after batch k settled
//!    v       v       v
//! join_all join_all join_all   one spawned task per render, awaited together
//!    │       │       │
//!    └─ on_progress(done, total) after every batch
//! ```
//!
//! Nothing here is fatal. A failed or empty render simply produces no slide
//! for that prompt; a run where every render failed returns an empty list.
//!
//! Each render runs on its own task. Dropping the generation future detaches
//! the renders already issued: they run to completion and their results are
//! discarded. No further batch is started.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::prompts::{generate_prompts, PromptSource};
use super::render::{render_image, RenderOutcome, DEFAULT_ASPECT_RATIO};
use crate::service::ContentService;
use crate::slides::Slide;
use crate::style::ArtStyle;

/// Slides requested per run
pub const DEFAULT_SLIDE_COUNT: usize = 6;

/// Renders in flight at once
pub const DEFAULT_BATCH_SIZE: usize = 2;

/// Orchestrator settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Prompts requested from the service
    pub slide_count: usize,
    /// Renders dispatched together; also the cap on concurrent requests
    pub batch_size: usize,
    /// Aspect ratio hint for every render
    pub aspect_ratio: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            slide_count: DEFAULT_SLIDE_COUNT,
            batch_size: DEFAULT_BATCH_SIZE,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
        }
    }
}

/// A prompt that produced no slide
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideFailure {
    /// Position of the prompt in the run
    pub index: usize,
    /// Prompt text
    pub prompt: String,
    /// Why no image came back
    pub reason: String,
}

/// Everything a run produced, including what went wrong
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlideshowReport {
    /// Rendered slides in prompt order
    pub slides: Vec<Slide>,
    /// Where the prompts came from
    pub prompt_source: PromptSource,
    /// Prompts that produced no slide, in prompt order
    pub failures: Vec<SlideFailure>,
    /// Number of slides the run asked for
    pub requested: usize,
}

impl SlideshowReport {
    /// Nothing was generated; the caller should suggest another try
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Generation orchestrator
pub struct SlideshowGenerator<S> {
    service: Arc<S>,
    config: GenerationConfig,
}

impl<S: ContentService + 'static> SlideshowGenerator<S> {
    /// Create an orchestrator with default settings
    pub fn new(service: S) -> Self {
        Self::with_config(service, GenerationConfig::default())
    }

    /// Create an orchestrator with explicit settings
    pub fn with_config(service: S, config: GenerationConfig) -> Self {
        Self {
            service: Arc::new(service),
            config,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Generate the slides for `title` in `style`
    ///
    /// `on_progress(completed, total)` runs once per batch, after all of its
    /// renders settled. `total` is always the configured slide count, even
    /// when the service returned fewer prompts. The result may be shorter than
    /// requested, or empty.
    pub async fn generate_slideshow<F>(
        &self,
        title: &str,
        style: ArtStyle,
        on_progress: F,
    ) -> Vec<Slide>
    where
        F: FnMut(usize, usize),
    {
        self.generate_report(title, style, on_progress).await.slides
    }

    /// Like [`generate_slideshow`](Self::generate_slideshow), with per-slide
    /// failure reasons and the prompt path that was taken
    pub async fn generate_report<F>(
        &self,
        title: &str,
        style: ArtStyle,
        mut on_progress: F,
    ) -> SlideshowReport
    where
        F: FnMut(usize, usize),
    {
        tracing::info!(
            service = self.service.name(),
            title = %title,
            style = %style,
            slide_count = self.config.slide_count,
            "Starting slideshow generation"
        );

        let outcome =
            generate_prompts(&*self.service, title, style, self.config.slide_count).await;
        let prompt_source = outcome.source();
        let prompts = outcome.into_prompts();
        let total = self.config.slide_count;
        let batch_size = self.config.batch_size.max(1);

        let mut slides = Vec::with_capacity(prompts.len());
        let mut failures = Vec::new();

        for (batch_index, batch) in prompts.chunks(batch_size).enumerate() {
            let offset = batch_index * batch_size;

            let renders = batch.iter().map(|prompt| self.spawn_render(prompt));
            let outcomes = join_all(renders).await;

            for (position, (prompt, joined)) in batch.iter().zip(outcomes).enumerate() {
                let index = offset + position;
                let outcome = joined.unwrap_or_else(|e| {
                    tracing::error!(index, error = %e, "Render task failed");
                    RenderOutcome::Failed(format!("render task failed: {e}"))
                });
                match outcome {
                    RenderOutcome::Rendered(image) => {
                        slides.push(Slide::new(index, &image, prompt.clone()));
                    }
                    other => failures.push(SlideFailure {
                        index,
                        prompt: prompt.clone(),
                        reason: other.failure_reason().unwrap_or_default(),
                    }),
                }
            }

            tracing::debug!(
                batch = batch_index,
                completed = slides.len(),
                total,
                "Batch settled"
            );
            on_progress(slides.len(), total);
        }

        if slides.is_empty() {
            tracing::warn!(title = %title, style = %style, "No slides were generated");
        } else {
            tracing::info!(
                slides = slides.len(),
                failed = failures.len(),
                "Slideshow generation finished"
            );
        }

        SlideshowReport {
            slides,
            prompt_source,
            failures,
            requested: total,
        }
    }

    /// Run one render on its own task
    ///
    /// Dropping the returned handle detaches the task rather than aborting it.
    fn spawn_render(&self, prompt: &str) -> tokio::task::JoinHandle<RenderOutcome> {
        let service = Arc::clone(&self.service);
        let prompt = prompt.to_string();
        let aspect_ratio = self.config.aspect_ratio.clone();
        tokio::spawn(async move { render_image(&*service, &prompt, &aspect_ratio).await })
    }
}

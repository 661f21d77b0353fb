//! `vibeshow generate`

use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use vibeshow_core::workflow::EMPTY_RESULT_NOTICE;
use vibeshow_core::{
    ArtStyle, AudioTrack, GeminiClient, GenerationStatus, PromptSource, SlideshowGenerator,
    VibeshowConfig, Workflow, WorkflowStage,
};

use crate::manifest::write_slides;

/// Generate slides for `audio` in `style` and write them to `out`
pub async fn run(
    config: &VibeshowConfig,
    audio: &Path,
    style: ArtStyle,
    out: &Path,
) -> Result<()> {
    let client = GeminiClient::new(config.service.clone())
        .context("Set VIBESHOW_API_KEY (or GEMINI_API_KEY) or pass --api-key")?;
    let generator = SlideshowGenerator::with_config(client, config.generation.clone());

    let (mut flow, title, style) = begin(audio, style, config.generation.slide_count)?;

    let report = generator
        .generate_report(&title, style, |completed, total| {
            let status = GenerationStatus::painting(completed, total);
            info!(percent = status.percent(), "{}", status.message);
            if let Err(e) = flow.update_status(status) {
                warn!(error = %e, "Progress arrived outside generation");
            }
        })
        .await;

    if let PromptSource::Fallback(reason) = &report.prompt_source {
        warn!(reason = %reason, "Used a fallback prompt");
    }
    for failure in &report.failures {
        warn!(index = failure.index, reason = %failure.reason, "Slide skipped");
    }

    let slides = report.slides;
    if flow.finish_generation(slides.clone())? == WorkflowStage::StyleSelection {
        bail!(EMPTY_RESULT_NOTICE);
    }

    let manifest = write_slides(out, &title, style, &slides).await?;
    info!(
        slides = manifest.slides.len(),
        out = ?out,
        "{}",
        GenerationStatus::ready(manifest.slides.len()).message
    );
    Ok(())
}

/// Walk the workflow up to the first batch
///
/// Logs the analyzing step, then records "generating" with the requested
/// slide count so the status shows a total before any progress tick.
fn begin(
    audio: &Path,
    style: ArtStyle,
    slide_count: usize,
) -> Result<(Workflow, String, ArtStyle)> {
    let mut flow = Workflow::new();
    flow.choose_track(AudioTrack::from_path(audio)?)?;
    flow.select_style(style)?;
    let (title, style) = flow.start_generation()?;
    info!(title = %title, style = %style, "{}", GenerationStatus::analyzing().message);

    let status = GenerationStatus::generating(slide_count);
    info!(total = status.total, "{}", status.message);
    flow.update_status(status)?;

    Ok((flow, title, style))
}

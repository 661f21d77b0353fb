//! Slide and Progress Types
//!
//! A [`Slide`] is one rendered image paired with the prompt that produced it.
//! [`GenerationStatus`] is the transient progress record a caller keeps while
//! the orchestrator runs; the orchestrator itself only reports counts through a
//! callback and never holds a status of its own.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Self-contained inline image (MIME type plus base64 payload)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// MIME type reported by the service (e.g. `image/png`)
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl ImageRef {
    /// Create from a MIME type and an already base64-encoded payload
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Create from raw image bytes
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    /// Render as a `data:` URI usable anywhere an image URL is accepted
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload back into raw bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(self.data.as_bytes())
    }

    /// File extension matching the MIME type
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// One generated slide
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Stable identifier, `slide-<prompt index>`
    pub id: String,
    /// Data URI or remote URL of the rendered image
    pub image_url: String,
    /// Prompt the image was rendered from
    pub prompt: String,
}

impl Slide {
    /// Build the slide for the prompt at `index`
    #[must_use]
    pub fn new(index: usize, image: &ImageRef, prompt: impl Into<String>) -> Self {
        Self {
            id: Self::id_for(index),
            image_url: image.to_data_uri(),
            prompt: prompt.into(),
        }
    }

    /// Identifier assigned to the slide rendered from prompt `index`
    #[must_use]
    pub fn id_for(index: usize) -> String {
        format!("slide-{index}")
    }

    /// Inline image behind `image_url`, if it is a base64 data URI
    #[must_use]
    pub fn inline_image(&self) -> Option<ImageRef> {
        let rest = self.image_url.strip_prefix("data:")?;
        let (mime_type, data) = rest.split_once(";base64,")?;
        Some(ImageRef::new(mime_type, data))
    }
}

/// Pipeline step shown to the user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStep {
    /// Nothing started
    #[default]
    Idle,
    /// Preparing the run (title extraction, prompt request)
    Analyzing,
    /// Image renders in flight
    GeneratingImages,
    /// Slides available
    Ready,
}

/// Progress snapshot kept by whoever drives the orchestrator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatus {
    /// Current step
    pub step: GenerationStep,
    /// Slides ready so far (never above `total`)
    pub progress: usize,
    /// Slides expected
    pub total: usize,
    /// Human-readable message
    pub message: String,
}

impl GenerationStatus {
    fn new(step: GenerationStep, progress: usize, total: usize, message: String) -> Self {
        Self {
            step,
            progress: progress.min(total),
            total,
            message,
        }
    }

    /// Nothing running
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Run accepted, prompts not yet requested
    #[must_use]
    pub fn analyzing() -> Self {
        Self::new(
            GenerationStep::Analyzing,
            0,
            0,
            "Listening to vibes...".to_string(),
        )
    }

    /// Prompt request issued, no slide finished yet
    #[must_use]
    pub fn generating(total: usize) -> Self {
        Self::new(
            GenerationStep::GeneratingImages,
            0,
            total,
            "Dreaming up visuals...".to_string(),
        )
    }

    /// Progress tick from the orchestrator
    #[must_use]
    pub fn painting(completed: usize, total: usize) -> Self {
        Self::new(
            GenerationStep::GeneratingImages,
            completed,
            total,
            format!("Painting slide {completed} of {total}..."),
        )
    }

    /// Run finished with `total` slides
    #[must_use]
    pub fn ready(total: usize) -> Self {
        Self::new(
            GenerationStep::Ready,
            total,
            total,
            format!("{total} slides ready"),
        )
    }

    /// Progress bar width in percent; a sliver is shown before the total is known
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            5.0
        } else {
            self.progress as f64 / self.total as f64 * 100.0
        }
    }
}

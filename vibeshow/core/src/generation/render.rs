//! Image Renderer
//!
//! Renders one scene description into an inline image. Failures are part of
//! the return value, never propagated: a prompt that cannot be rendered just
//! ends up without a slide.

use crate::service::{ContentService, ImageRequest};
use crate::slides::ImageRef;

/// Aspect ratio used for slideshow frames
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";

/// Result of one render
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The first inline image of the response
    Rendered(ImageRef),
    /// The response carried no image part
    NoImage,
    /// The service call failed
    Failed(String),
}

impl RenderOutcome {
    /// The image, if one was produced
    #[must_use]
    pub fn into_image(self) -> Option<ImageRef> {
        match self {
            Self::Rendered(image) => Some(image),
            Self::NoImage | Self::Failed(_) => None,
        }
    }

    /// Why no image was produced, if none was
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Rendered(_) => None,
            Self::NoImage => Some("response contained no image".to_string()),
            Self::Failed(e) => Some(e.clone()),
        }
    }
}

/// Render `prompt` at the given aspect ratio
pub async fn render_image<S>(service: &S, prompt: &str, aspect_ratio: &str) -> RenderOutcome
where
    S: ContentService + ?Sized,
{
    let request = ImageRequest::new(prompt, aspect_ratio);

    match service.render(&request).await {
        Ok(parts) => match parts.into_iter().find(|p| !p.data.is_empty()) {
            Some(part) => RenderOutcome::Rendered(ImageRef::new(part.mime_type, part.data)),
            None => {
                tracing::warn!(service = service.name(), "Render returned no image");
                RenderOutcome::NoImage
            }
        },
        Err(e) => {
            tracing::warn!(service = service.name(), error = %e, "Render failed");
            RenderOutcome::Failed(e.to_string())
        }
    }
}

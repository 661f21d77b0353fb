//! Prompt Generator
//!
//! Asks the content service for scene descriptions that fit a song title and
//! an art style. This step cannot fail: when the service errors or answers
//! with something unusable, a templated description is repeated instead, and
//! the outcome says which path was taken.

use serde::{Deserialize, Serialize};

use crate::service::{ContentService, TextRequest};
use crate::style::ArtStyle;

/// Why the fallback prompts were used
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum FallbackReason {
    /// Service answered with no prompts
    Empty,
    /// Service answered with something other than a list of strings
    Malformed(String),
    /// Service call failed
    Service(String),
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "service returned no prompts"),
            Self::Malformed(e) => write!(f, "malformed prompt list: {e}"),
            Self::Service(e) => write!(f, "prompt request failed: {e}"),
        }
    }
}

/// Where a run's prompts came from
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSource {
    /// Written by the service
    Generated,
    /// Local template
    Fallback(FallbackReason),
}

/// Result of the prompt step
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Prompts written by the service (at most `count`, possibly fewer)
    Generated(Vec<String>),
    /// Exactly `count` copies of a templated description
    Fallback {
        /// Fallback prompts
        prompts: Vec<String>,
        /// Why the service answer was not used
        reason: FallbackReason,
    },
}

impl PromptOutcome {
    /// Prompts, whichever path produced them
    #[must_use]
    pub fn prompts(&self) -> &[String] {
        match self {
            Self::Generated(prompts) | Self::Fallback { prompts, .. } => prompts,
        }
    }

    /// Consume into the prompt list
    #[must_use]
    pub fn into_prompts(self) -> Vec<String> {
        match self {
            Self::Generated(prompts) | Self::Fallback { prompts, .. } => prompts,
        }
    }

    /// Whether the fallback template was used
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    /// Where the prompts came from
    #[must_use]
    pub fn source(&self) -> PromptSource {
        match self {
            Self::Generated(_) => PromptSource::Generated,
            Self::Fallback { reason, .. } => PromptSource::Fallback(reason.clone()),
        }
    }
}

/// Task description sent to the text model
#[must_use]
pub fn prompt_request_text(title: &str, style: ArtStyle, count: usize) -> String {
    format!(
        "I have a song titled \"{title}\".\n\
         Please generate {count} distinct, creative, and visual image descriptions that would fit a music video for this song.\n\
         The art style must be specifically: {style}.\n\
         Make the descriptions vivid, colorful, and suitable for an AI image generator.\n\
         Ensure the descriptions capture the \"vibe\" of the song title and the specific art style requested."
    )
}

/// Template used when the service answered with an empty list
#[must_use]
pub fn empty_fallback_prompt(title: &str, style: ArtStyle) -> String {
    format!("{style} artwork of {title}")
}

/// Template used when the service call failed or its answer did not parse
#[must_use]
pub fn error_fallback_prompt(title: &str, style: ArtStyle) -> String {
    format!("A beautiful {style} illustration inspired by the song {title}")
}

/// Generate up to `count` scene descriptions for `title` in `style`
///
/// Never fails. The fallback path always yields exactly `count` prompts; the
/// generated path yields the first `count` non-blank prompts the service
/// returned, which may be fewer.
pub async fn generate_prompts<S>(
    service: &S,
    title: &str,
    style: ArtStyle,
    count: usize,
) -> PromptOutcome
where
    S: ContentService + ?Sized,
{
    if count == 0 {
        return PromptOutcome::Generated(Vec::new());
    }

    let request = TextRequest::string_list(prompt_request_text(title, style, count));

    let reason = match service.complete_structured(&request).await {
        Ok(body) => match parse_prompt_list(&body) {
            Ok(prompts) if !prompts.is_empty() => {
                let mut prompts = prompts;
                prompts.truncate(count);
                tracing::debug!(
                    service = service.name(),
                    count = prompts.len(),
                    "Received generated prompts"
                );
                return PromptOutcome::Generated(prompts);
            }
            Ok(_) => FallbackReason::Empty,
            Err(e) => FallbackReason::Malformed(e),
        },
        Err(e) => FallbackReason::Service(e.to_string()),
    };

    let template = match reason {
        FallbackReason::Empty => empty_fallback_prompt(title, style),
        FallbackReason::Malformed(_) | FallbackReason::Service(_) => {
            error_fallback_prompt(title, style)
        }
    };

    tracing::warn!(
        service = service.name(),
        reason = %reason,
        "Using fallback prompts"
    );

    PromptOutcome::Fallback {
        prompts: vec![template; count],
        reason,
    }
}

/// Parse a JSON list of strings, dropping blank entries
///
/// An empty body or a JSON `null` counts as an empty list.
fn parse_prompt_list(body: &str) -> Result<Vec<String>, String> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let parsed: Option<Vec<String>> = serde_json::from_str(body).map_err(|e| e.to_string())?;
    Ok(parsed
        .unwrap_or_default()
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect())
}

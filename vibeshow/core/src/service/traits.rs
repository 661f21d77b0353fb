//! Content Service Traits
//!
//! Trait definitions for the remote content-generation service. The
//! generators only ever talk to a [`ContentService`], so the real client and
//! test doubles are interchangeable.
//!
//! Both operations are treated as unreliable, latent, rate-limited network
//! calls: callers must always have a fallback or a "produced nothing" path.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a content service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Client constructed without credentials
    #[error("No API key configured for the content service")]
    MissingApiKey,

    /// Transport-level failure (connect, timeout, body read)
    #[error("Request to content service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("Content service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// Response arrived but could not be understood
    #[error("Could not decode content service response: {0}")]
    Decode(String),
}

/// Structured text completion request
#[derive(Clone, Debug)]
pub struct TextRequest {
    /// Task description sent to the model
    pub prompt: String,
    /// JSON schema the response must follow
    pub response_schema: serde_json::Value,
}

impl TextRequest {
    /// Request whose response must be a JSON array of strings
    pub fn string_list(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: serde_json::json!({
                "type": "ARRAY",
                "items": { "type": "STRING" },
            }),
        }
    }
}

/// Image render request
#[derive(Clone, Debug)]
pub struct ImageRequest {
    /// Scene description to render
    pub prompt: String,
    /// Aspect ratio hint, e.g. `16:9`
    pub aspect_ratio: String,
}

impl ImageRequest {
    /// Create a request with an explicit aspect ratio
    pub fn new(prompt: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: aspect_ratio.into(),
        }
    }
}

/// Inline image payload returned by the service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// MIME type of the payload
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Connection settings for a content service client
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// API key (required by the hosted service)
    pub api_key: Option<String>,
    /// REST base URL
    pub base_url: String,
    /// Model used for prompt generation
    pub text_model: String,
    /// Model used for image rendering
    pub image_model: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl ServiceConfig {
    /// Default settings with the given API key
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }
}

/// Content-generation service
///
/// Implement this trait to plug in a different provider or a test double.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Run a structured (JSON-mode) text completion and return the raw body text
    async fn complete_structured(&self, request: &TextRequest) -> Result<String, ServiceError>;

    /// Render an image; the response may carry zero or more inline images
    async fn render(&self, request: &ImageRequest) -> Result<Vec<InlineImage>, ServiceError>;
}

#[async_trait]
impl<S: ContentService + ?Sized> ContentService for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete_structured(&self, request: &TextRequest) -> Result<String, ServiceError> {
        (**self).complete_structured(request).await
    }

    async fn render(&self, request: &ImageRequest) -> Result<Vec<InlineImage>, ServiceError> {
        (**self).render(request).await
    }
}

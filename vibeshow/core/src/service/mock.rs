//! Scripted Content Service
//!
//! A [`ContentService`] that never touches the network. Tests script the
//! prompt reply and decide per prompt whether an image renders, fails, or
//! comes back empty. The service also records every call and the peak number
//! of renders in flight, so batching behavior can be asserted.
//!
//! # Usage
//!
//! ```ignore
//! use vibeshow_core::service::{MockImage, MockService};
//!
//! let service = MockService::with_prompts(["a", "b", "c"])
//!     .with_image_rule(|prompt| if prompt == "b" { MockImage::Fail } else { MockImage::Png });
//!
//! // ... run the orchestrator ...
//! assert_eq!(service.peak_in_flight(), 2);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::traits::{ContentService, ImageRequest, InlineImage, ServiceError, TextRequest};
use crate::slides::ImageRef;

/// How the mock answers one image request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockImage {
    /// One PNG part whose payload encodes the prompt text
    Png,
    /// A response with no image parts
    Empty,
    /// A service error
    Fail,
}

/// A call the mock received
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockCall {
    /// Structured text completion
    Text {
        /// Prompt sent
        prompt: String,
    },
    /// Image render
    Image {
        /// Prompt sent
        prompt: String,
        /// Aspect ratio hint sent
        aspect_ratio: String,
    },
}

type ImageRule = Box<dyn Fn(&str) -> MockImage + Send + Sync>;
type LatencyRule = Box<dyn Fn(&str) -> Duration + Send + Sync>;

/// Scripted content service for tests
pub struct MockService {
    prompt_reply: Result<String, u16>,
    image_rule: ImageRule,
    latency_rule: Option<LatencyRule>,
    calls: Mutex<Vec<MockCall>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    settled: AtomicUsize,
}

impl Default for MockService {
    fn default() -> Self {
        Self::with_raw_reply("[]")
    }
}

impl MockService {
    /// Prompt step answers with the given raw body text
    pub fn with_raw_reply(body: impl Into<String>) -> Self {
        Self {
            prompt_reply: Ok(body.into()),
            image_rule: Box::new(|_| MockImage::Png),
            latency_rule: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            settled: AtomicUsize::new(0),
        }
    }

    /// Prompt step answers with a JSON array of these prompts
    pub fn with_prompts<I, S>(prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompts: Vec<String> = prompts.into_iter().map(Into::into).collect();
        Self::with_raw_reply(serde_json::Value::from(prompts).to_string())
    }

    /// Prompt step fails with a 503
    #[must_use]
    pub fn failing_prompts() -> Self {
        Self {
            prompt_reply: Err(503),
            ..Self::default()
        }
    }

    /// Decide the image outcome per prompt
    #[must_use]
    pub fn with_image_rule(
        mut self,
        rule: impl Fn(&str) -> MockImage + Send + Sync + 'static,
    ) -> Self {
        self.image_rule = Box::new(rule);
        self
    }

    /// Delay each image render by a per-prompt duration
    #[must_use]
    pub fn with_latency(
        mut self,
        rule: impl Fn(&str) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.latency_rule = Some(Box::new(rule));
        self
    }

    /// Wrap in an `Arc` so the test can keep inspecting it
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Image the mock returns for `prompt` when rendering succeeds
    #[must_use]
    pub fn image_for(prompt: &str) -> ImageRef {
        ImageRef::from_bytes("image/png", prompt.as_bytes())
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    /// Prompts of the image calls received so far, in arrival order
    pub fn image_prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                MockCall::Image { prompt, .. } => Some(prompt.clone()),
                MockCall::Text { .. } => None,
            })
            .collect()
    }

    /// Highest number of renders that were in flight at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Renders that ran to completion, including scripted failures
    pub fn settled_renders(&self) -> usize {
        self.settled.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.settled.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ContentService for MockService {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn complete_structured(&self, request: &TextRequest) -> Result<String, ServiceError> {
        self.calls.lock().push(MockCall::Text {
            prompt: request.prompt.clone(),
        });

        match &self.prompt_reply {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(ServiceError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
        }
    }

    async fn render(&self, request: &ImageRequest) -> Result<Vec<InlineImage>, ServiceError> {
        self.calls.lock().push(MockCall::Image {
            prompt: request.prompt.clone(),
            aspect_ratio: request.aspect_ratio.clone(),
        });

        self.enter();
        if let Some(latency) = &self.latency_rule {
            tokio::time::sleep(latency(&request.prompt)).await;
        }
        self.leave();

        match (self.image_rule)(&request.prompt) {
            MockImage::Png => {
                let image = Self::image_for(&request.prompt);
                Ok(vec![InlineImage {
                    mime_type: image.mime_type,
                    data: image.data,
                }])
            }
            MockImage::Empty => Ok(Vec::new()),
            MockImage::Fail => Err(ServiceError::Status {
                status: 500,
                body: format!("scripted render failure for {}", request.prompt),
            }),
        }
    }
}

//! Gemini Content Service
//!
//! [`ContentService`] implementation for the Google Generative Language REST
//! API. Both operations go through the `generateContent` endpoint:
//!
//! - prompt generation uses JSON response mode with a response schema
//! - image rendering passes an aspect-ratio hint and reads `inlineData` parts

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{
    ContentService, ImageRequest, InlineImage, ServiceConfig, ServiceError, TextRequest,
};

/// Gemini REST client
///
/// Constructed explicitly from a [`ServiceConfig`]; there is no process-wide
/// client state.
#[derive(Clone)]
pub struct GeminiClient {
    config: ServiceConfig,
    api_key: String,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.config.base_url)
            .field("text_model", &self.config.text_model)
            .field("image_model", &self.config.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::MissingApiKey`] when no key is configured and
    /// [`ServiceError::Http`] if the HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ServiceError::MissingApiKey)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            api_key,
            http_client,
        })
    }

    /// Settings this client was built with
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ServiceError> {
        let response = self
            .http_client
            .post(self.generate_url(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ContentService for GeminiClient {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn complete_structured(&self, request: &TextRequest) -> Result<String, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(&request.prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.response_schema.clone()),
                image_config: None,
            }),
        };

        let response = self.generate(&self.config.text_model, &body).await?;
        Ok(response.text())
    }

    async fn render(&self, request: &ImageRequest) -> Result<Vec<InlineImage>, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(&request.prompt)],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.clone(),
                }),
            }),
        };

        let response = self.generate(&self.config.image_model, &body).await?;
        Ok(response.inline_images())
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(text: &str) -> Self {
        Self {
            parts: vec![Part {
                text: Some(text.to_string()),
                inline_data: None,
            }],
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[Part] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    /// Concatenated text parts of the first candidate
    fn text(&self) -> String {
        self.first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// Inline payloads of the first candidate, in response order
    fn inline_images(&self) -> Vec<InlineImage> {
        self.first_parts()
            .iter()
            .filter_map(|p| p.inline_data.clone())
            .collect()
    }
}

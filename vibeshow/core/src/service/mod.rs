//! Content-Generation Service
//!
//! Abstracted access to the remote service that writes scene descriptions
//! and renders images, behind the [`ContentService`] trait.
//!
//! # Available Services
//!
//! - **Gemini**: Google Generative Language REST API
//! - **Mock**: scripted, offline double for tests
//!
//! # Usage
//!
//! ```ignore
//! use vibeshow_core::service::{GeminiClient, ServiceConfig};
//!
//! let client = GeminiClient::new(ServiceConfig::with_api_key(key))?;
//! ```

mod gemini;
mod mock;
mod traits;

pub use gemini::GeminiClient;
pub use mock::{MockCall, MockImage, MockService};
pub use traits::{
    ContentService, ImageRequest, InlineImage, ServiceConfig, ServiceError, TextRequest,
};

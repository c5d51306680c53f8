//! AI service integration for chat replies and image generation
//!
//! Provides the backend seams used by the assistant: a conversational
//! completion service and an image generation service, with Gemini
//! implementations and in-memory mocks.

pub mod gemini;
pub mod mock;

pub use gemini::{GeminiChatClient, GeminiImageClient};
pub use mock::{MockChatClient, MockImageGenerationClient};

use crate::models::{ChatRequest, ImageRequest};
use crate::Result;
use async_trait::async_trait;

/// Image payload as returned inline by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Runs one conversational completion.
    ///
    /// Returns `Ok(None)` when the backend answered without any text.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Generates one image.
    ///
    /// Returns `Ok(None)` when no part of the response carried image data.
    async fn generate(&self, request: &ImageRequest) -> Result<Option<InlineImage>>;
}

//! Text generation seam
//!
//! Everything that talks to a generative model goes through `TextGenerator`,
//! so the pipeline can be driven by Gemini in production and by a recording
//! stub in tests.

use async_trait::async_trait;
use thiserror::Error;

/// One ordered piece of a generation request
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    InlineData { mime_type: String, data: Vec<u8> },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to create HTTP client: {0}")]
    Client(String),

    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("Request blocked by the model: {0}")]
    Blocked(String),

    #[error("Empty response from generation service")]
    EmptyResponse,
}

/// A generative model that turns ordered content parts into a single text reply
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, parts: &[ContentPart]) -> Result<String, GenerationError>;
}

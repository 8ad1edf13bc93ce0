//! Generation provider abstraction.
//!
//! The panel talks to the model through the [`GenerationProvider`] trait so
//! the request/response plumbing can be swapped out (or mocked in tests)
//! without touching the orchestration logic.

pub mod gemini;

use anyhow::Result;
use async_trait::async_trait;
use base64::Engine;

/// A reference to a generated image: declared media type plus the base64
/// payload exactly as the provider returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub mime_type: String,
    pub data: String,
}

impl ImageRef {
    /// The displayable reference, `data:<mime>;base64,<payload>`.
    pub fn uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decode the payload for writing to disk.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(&self.data)?;
        Ok(bytes)
    }

    /// File extension matching the declared media type.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

/// What a provider response boiled down to.
///
/// A single extraction function produces exactly one of these; downstream
/// code matches exhaustively instead of probing nested JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// First candidate carried usable text.
    TextCandidate(String),
    /// First candidate carried an inline image part.
    ImageCandidate(ImageRef),
    /// The provider reported an error of its own.
    ProviderError(String),
    /// A syntactically valid response with nothing usable in it.
    Empty,
}

/// Trait implemented by every generation backend.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Send a text-generation request with the fully assembled prompt.
    async fn generate_text(&self, prompt: &str) -> Result<Extraction>;

    /// Send an image-generation request for the raw prompt.
    async fn generate_image(&self, prompt: &str) -> Result<Extraction>;

    /// Whether a credential is available. A provider that is not configured
    /// must never be asked to generate.
    fn is_configured(&self) -> bool;

    /// Display name for logging.
    fn name(&self) -> &str;
}

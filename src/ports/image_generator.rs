//! Image generator port for the remote generation API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// A kind of content the model may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Text commentary.
    Text,
    /// Inline image data.
    Image,
}

/// A request to generate content for one prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The resolved model identifier (e.g., `"gemini-3-pro-image-preview"`).
    pub model: String,
    /// The prompt, sent as the sole content item.
    pub prompt: String,
    /// Aspect ratio (e.g., `"16:9"`).
    pub aspect_ratio: String,
    /// Image size tier (`"1K"`, `"2K"`, `"4K"`).
    pub size: String,
    /// Content kinds the model may answer with.
    pub response_modalities: Vec<Modality>,
}

impl GenerationRequest {
    /// Build a request accepting both text and image responses.
    #[must_use]
    pub fn new(model: &str, prompt: &str, aspect_ratio: &str, size: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
            size: size.to_string(),
            response_modalities: vec![Modality::Text, Modality::Image],
        }
    }
}

/// One part of a generation response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponsePart {
    /// Inline image payload.
    Image {
        /// Raw image bytes (decoded from base64).
        #[serde(with = "base64_bytes")]
        data: Vec<u8>,
        /// MIME type of the image (e.g., `"image/jpeg"`).
        mime_type: String,
    },
    /// Text commentary from the model.
    Text {
        /// The text.
        text: String,
    },
}

/// Ordered parts returned for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Parts of every candidate, in order.
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Boxed future type returned by [`ImageGenerator::generate`].
pub type GenerateFuture<'a> =
    Pin<Box<dyn Future<Output = Result<GenerationResponse, GenerateError>> + Send + 'a>>;

/// Generates images from text prompts via an external API.
pub trait ImageGenerator: Send + Sync {
    /// Send one request and wait for its single response.
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

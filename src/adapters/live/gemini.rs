//! Live adapter for the Gemini `generateContent` API.

use base64::Engine;
use reqwest::Client;
use serde::Deserialize;

use crate::error::GenerateError;
use crate::ports::image_generator::{
    GenerateFuture, GenerationRequest, GenerationResponse, ImageGenerator, ResponsePart,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Live Gemini image generator that calls the Google AI API.
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    /// Create a new Gemini generator with the given API key.
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { client: Client::new(), api_key }
    }
}

/// JSON body for `models/{model}:generateContent`.
fn request_body(request: &GenerationRequest) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [{"text": request.prompt}]
        }],
        "generationConfig": {
            "responseModalities": request.response_modalities,
            "imageConfig": {
                "aspectRatio": request.aspect_ratio,
                "imageSize": request.size,
            }
        }
    })
}

/// Parts of the first candidate as a [`GenerationResponse`]. Further
/// candidates and empty text parts are dropped.
fn parse_response(body: &str) -> Result<GenerationResponse, GenerateError> {
    let parsed: GeminiResponse = serde_json::from_str(body).map_err(|e| GenerateError::Api {
        status: 200,
        message: format!("Failed to parse response: {e}"),
    })?;

    let candidate_parts =
        parsed.candidates.into_iter().next().map(|c| c.content.parts).unwrap_or_default();

    let mut parts = Vec::new();
    for part in candidate_parts {
        if let Some(inline) = part.inline_data {
            let data = base64::engine::general_purpose::STANDARD.decode(&inline.data).map_err(
                |e| GenerateError::Api {
                    status: 200,
                    message: format!("Failed to decode base64: {e}"),
                },
            )?;
            parts.push(ResponsePart::Image { data, mime_type: inline.mime_type });
        } else if let Some(text) = part.text.filter(|t| !t.is_empty()) {
            parts.push(ResponsePart::Text { text });
        }
    }
    Ok(GenerationResponse { parts })
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = format!("{GEMINI_API_BASE}/{}:generateContent", request.model);
            tracing::debug!(
                %url,
                aspect_ratio = %request.aspect_ratio,
                size = %request.size,
                "sending generateContent"
            );

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body(&request))
                .send()
                .await?;

            let status = response.status();
            let response_text = response.text().await?;
            tracing::debug!(
                status = status.as_u16(),
                bytes = response_text.len(),
                "received response"
            );

            if !status.is_success() {
                return Err(GenerateError::Api { status: status.as_u16(), message: response_text });
            }

            parse_response(&response_text)
        })
    }
}

// --- Gemini API response types ---

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_carries_prompt_modalities_and_image_config() {
        let request = GenerationRequest::new("gemini-3-pro-image-preview", "a moon", "16:9", "2K");
        let body = request_body(&request);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "a moon");
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["TEXT", "IMAGE"])
        );
        assert_eq!(body["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "2K");
    }

    #[test]
    fn parses_text_and_inline_parts_in_order() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "Here is your image"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                ]}
            }]
        }"#;
        let response = parse_response(body).unwrap();
        assert_eq!(
            response.parts,
            vec![
                ResponsePart::Text { text: "Here is your image".into() },
                ResponsePart::Image { data: vec![1, 2, 3], mime_type: "image/png".into() },
            ]
        );
    }

    #[test]
    fn only_first_candidate_is_read() {
        let body = r#"{
            "candidates": [
                {"content": {"parts": [{"thoughtSignature": "x"}, {"text": "first"}]}},
                {"content": {"parts": [
                    {"text": "second"},
                    {"inlineData": {"mimeType": "image/png", "data": "AQID"}}
                ]}}
            ]
        }"#;
        let response = parse_response(body).unwrap();
        assert_eq!(response.parts, vec![ResponsePart::Text { text: "first".into() }]);
    }

    #[test]
    fn empty_text_parts_are_dropped() {
        let body = r#"{"candidates": [{"content": {"parts": [
            {"text": ""},
            {"inlineData": {"mimeType": "image/jpeg", "data": "AQID"}},
            {"text": ""}
        ]}}]}"#;
        let response = parse_response(body).unwrap();
        assert_eq!(
            response.parts,
            vec![ResponsePart::Image { data: vec![1, 2, 3], mime_type: "image/jpeg".into() }]
        );
    }

    #[test]
    fn candidate_without_content_is_empty_response() {
        let response = parse_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(response.parts.is_empty());
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let response = parse_response(r#"{"promptFeedback": {"blockReason": "OTHER"}}"#).unwrap();
        assert!(response.parts.is_empty());
    }

    #[test]
    fn bad_base64_is_an_error() {
        let body = r#"{"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "!!!"}}
        ]}}]}"#;
        assert!(parse_response(body).is_err());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(parse_response("not json"), Err(GenerateError::Api { .. })));
    }
}

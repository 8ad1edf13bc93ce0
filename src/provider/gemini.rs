//! Gemini generateContent client.
//!
//! Implements [`GenerationProvider`] against the Google generative language
//! API. Both modalities POST the same `contents` shape; image requests add a
//! `generationConfig` declaring that text and image parts are both
//! acceptable. Responses are folded into an [`Extraction`] by a single
//! function so callers never probe raw JSON.
//!
//! The HTTP status is deliberately not checked before reading the body: the
//! API reports failures inside the JSON envelope (`error.message`), and that
//! message is what the user should see.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Extraction, GenerationProvider, ImageRef};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini API client.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    api_base: String,
    client: reqwest::Client,
}

// --- API Request Types ---

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseModalities")]
    response_modalities: Vec<&'static str>,
}

// --- API Response Types ---

#[derive(Deserialize, Debug, Default)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
    #[serde(rename = "inlineData")]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: Option<String>,
    data: String,
}

/// Fold a response envelope into exactly one [`Extraction`].
///
/// Priority: provider-reported error, then the first inline-data part of the
/// first candidate, then the first part's text, then `Empty`. Text requests
/// never produce inline data, so the image scan is a no-op for them.
pub fn extract(response: GenerateResponse) -> Extraction {
    if let Some(err) = response.error {
        return Extraction::ProviderError(err.message);
    }

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();

    for part in &parts {
        if let Some(inline) = &part.inline_data {
            return Extraction::ImageCandidate(ImageRef {
                mime_type: inline
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| "image/png".to_string()),
                data: inline.data.clone(),
            });
        }
    }

    match parts.into_iter().next().and_then(|p| p.text) {
        Some(text) if !text.is_empty() => Extraction::TextCandidate(text),
        _ => Extraction::Empty,
    }
}

#[derive(Deserialize, Debug)]
struct ApiError {
    message: String,
}

// --- Implementation ---

impl GeminiClient {
    pub fn new(api_key: Option<String>, model: String, api_base: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.is_empty()),
            model,
            api_base: api_base.unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<Extraction> {
        let api_key = self
            .api_key
            .as_deref()
            .context("Gemini API key is not configured")?;

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("X-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .context("Failed to send request to the Gemini API")?;

        let envelope: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        Ok(extract(envelope))
    }
}

#[async_trait]
impl GenerationProvider for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<Extraction> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: None,
        };
        self.generate(&request).await
    }

    async fn generate_image(&self, prompt: &str) -> Result<Extraction> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
            }),
        };
        self.generate(&request).await
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let resp = parse(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "X" } ] } },
                { "content": { "parts": [ { "text": "ignored" } ] } }
            ]
        }));
        assert_eq!(extract(resp), Extraction::TextCandidate("X".to_string()));
    }

    #[test]
    fn test_extract_uses_first_part_only() {
        let resp = parse(json!({
            "candidates": [
                { "content": { "parts": [ {}, { "text": "second" } ] } }
            ]
        }));
        // The first part carries no text, so the response counts as empty.
        assert_eq!(extract(resp), Extraction::Empty);
    }

    #[test]
    fn test_extract_inline_image() {
        let resp = parse(json!({
            "candidates": [ { "content": { "parts": [
                { "text": "here is your image" },
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
            ] } } ]
        }));
        match extract(resp) {
            Extraction::ImageCandidate(r) => {
                assert_eq!(r.uri(), "data:image/png;base64,AAAA");
            }
            other => panic!("expected image candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_inline_image_defaults_mime_to_png() {
        let resp = parse(json!({
            "candidates": [ { "content": { "parts": [
                { "inlineData": { "data": "QUJD" } }
            ] } } ]
        }));
        match extract(resp) {
            Extraction::ImageCandidate(r) => assert_eq!(r.mime_type, "image/png"),
            other => panic!("expected image candidate, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_provider_error_wins() {
        let resp = parse(json!({
            "candidates": [ { "content": { "parts": [ { "text": "X" } ] } } ],
            "error": { "message": "quota exceeded", "code": 429 }
        }));
        assert_eq!(
            extract(resp),
            Extraction::ProviderError("quota exceeded".to_string())
        );
    }

    #[test]
    fn test_extract_empty_envelope() {
        assert_eq!(extract(parse(json!({}))), Extraction::Empty);
        assert_eq!(extract(parse(json!({ "candidates": [] }))), Extraction::Empty);
        assert_eq!(
            extract(parse(json!({ "candidates": [ { "content": { "parts": [] } } ] }))),
            Extraction::Empty
        );
    }

    #[test]
    fn test_client_without_key_reports_unconfigured() {
        let client = GeminiClient::new(None, DEFAULT_MODEL.to_string(), None);
        assert!(!client.is_configured());
        let client = GeminiClient::new(Some(String::new()), DEFAULT_MODEL.to_string(), None);
        assert!(!client.is_configured());
        let client = GeminiClient::new(Some("k".to_string()), DEFAULT_MODEL.to_string(), None);
        assert!(client.is_configured());
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hi".to_string(),
                }],
            }],
            generation_config: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "contents": [ { "parts": [ { "text": "hi" } ] } ] }));
    }

    #[test]
    fn test_image_request_declares_modalities() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "a cat".to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
            }),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            json!(["TEXT", "IMAGE"])
        );
    }
}

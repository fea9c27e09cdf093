//! Image generation provider.
//!
//! A single prompt goes out, a single image comes back as a data URI. There
//! is no retry or streaming; callers decide what to do with a failure.

use log::{debug, error};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::card::encode_data_uri;
use crate::config::GeneratorConfig;
use crate::error::GenerateError;

/// Produces an image for a free-text prompt.
pub trait ImageGenerator {
    /// Returns `data:<mime>;base64,<payload>`.
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Generator backed by the Gemini `generateContent` REST endpoint.
pub struct GeminiGenerator {
    client: Client,
    config: GeneratorConfig,
}

impl GeminiGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

impl ImageGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenerateError::MissingApiKey)?;
        debug!("requesting image from {}", self.config.model);

        let res = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::image(prompt))
            .send()?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().unwrap_or_default();
            error!("image provider returned {}: {}", status, body);
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = res.json()?;
        payload.into_data_uri().ok_or(GenerateError::NoImage)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn image(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: String,
}

impl GenerateResponse {
    /// First inline image of the first candidate. Missing mime types default to PNG.
    fn into_data_uri(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let inline = parts
            .into_iter()
            .filter_map(|part| part.inline_data)
            .find(|inline| !inline.data.is_empty())?;
        let mime = inline.mime_type.unwrap_or_else(|| "image/png".to_string());
        Some(format!("data:{};base64,{}", mime, inline.data))
    }
}

/// Generator that returns a fixed image; used for offline runs and tests.
pub struct StaticGenerator {
    image: String,
}

impl StaticGenerator {
    pub fn new(mime: &str, bytes: &[u8]) -> Self {
        Self {
            image: encode_data_uri(mime, bytes),
        }
    }
}

impl ImageGenerator for StaticGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        Ok(self.image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_body_matches_wire_format() {
        let body = serde_json::to_value(GenerateRequest::image("a robot")).expect("json");
        assert_eq!(
            body,
            serde_json::json!({
                "contents": [{"parts": [{"text": "a robot"}]}],
                "generationConfig": {"responseModalities": ["IMAGE"]}
            })
        );
    }

    #[test]
    fn response_skips_text_parts() {
        let raw = r#"{"candidates":[{"content":{"parts":[
            {"text":"here you go"},
            {"inlineData":{"mimeType":"image/jpeg","data":"QUJD"}}
        ]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.into_data_uri().as_deref(), Some("data:image/jpeg;base64,QUJD"));
    }

    #[test]
    fn response_defaults_mime_and_handles_empty() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"QUJD"}}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(parsed.into_data_uri().as_deref(), Some("data:image/png;base64,QUJD"));

        let empty: GenerateResponse = serde_json::from_str("{}").expect("parse");
        assert_eq!(empty.into_data_uri(), None);
    }

    #[test]
    fn missing_key_fails_without_request() {
        let generator = GeminiGenerator::new(GeneratorConfig {
            endpoint: "http://127.0.0.1:9".into(),
            ..GeneratorConfig::default()
        })
        .expect("client");
        assert!(matches!(
            generator.generate("x"),
            Err(GenerateError::MissingApiKey)
        ));
    }
}

//! Minimal client for the Gemini `generateContent` REST API
//!
//! One client serves every generative need in the pipeline: track titles,
//! video titles, thumbnail prompts, and thumbnail images. Callers construct
//! it only when an API key is configured; everything that consumes it keeps
//! a non-generative fallback.

use crate::config::GeminiConfig;
use crate::error::{Error, GenerativeError, Result};
use crate::utils::truncate_detail;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for text and image generation
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the API key is empty, or
    /// [`Error::Network`] when the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(Error::Config {
                message: "generative API key is required".to_string(),
                key: Some("gemini.api_key".to_string()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    /// Generate text from a prompt using the configured text model
    ///
    /// Concatenates the text parts of the first candidate and trims
    /// surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`GenerativeError::Api`] for non-2xx responses and
    /// [`GenerativeError::NoText`] when the response holds no text parts.
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let response = self
            .generate_content(&self.text_model, prompt, None)
            .await?;

        let text = response
            .first_candidate_parts()
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(GenerativeError::NoText.into());
        }

        debug!(model = %self.text_model, chars = text.len(), "generated text");
        Ok(text)
    }

    /// Generate an image from a prompt using the configured image model
    ///
    /// Returns the decoded image bytes of the first inline-data part.
    ///
    /// # Errors
    ///
    /// Returns [`GenerativeError::Api`] for non-2xx responses,
    /// [`GenerativeError::NoImage`] when no inline data comes back, and
    /// [`GenerativeError::Decode`] when the payload is not valid base64.
    pub async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let config = GenerationConfig {
            response_modalities: vec!["IMAGE"],
        };
        let response = self
            .generate_content(&self.image_model, prompt, Some(config))
            .await?;

        for part in response.first_candidate_parts() {
            if let Some(inline) = &part.inline_data {
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(&inline.data)
                    .map_err(GenerativeError::Decode)?;
                debug!(model = %self.image_model, bytes = bytes.len(), "generated image");
                return Ok(bytes);
            }
        }

        Err(GenerativeError::NoImage.into())
    }

    async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Option<GenerationConfig>,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config,
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GenerativeError::Api {
                status: status.as_u16(),
                detail: truncate_detail(&detail),
            }
            .into());
        }

        Ok(response.json().await?)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
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

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn first_candidate_parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }
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
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: &str) -> GeminiConfig {
        GeminiConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            text_model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
        }
    }

    #[test]
    fn new_rejects_empty_api_key() {
        let config = GeminiConfig {
            api_key: String::new(),
            ..test_config("http://localhost")
        };
        assert!(GeminiClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn generate_text_returns_trimmed_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "  Neon Grid Protocol\n" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let text = client.generate_text("name a track").await.unwrap();
        assert_eq!(text, "Neon Grid Protocol");
    }

    #[tokio::test]
    async fn generate_text_joins_multiple_text_parts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Hollow " }, { "text": "Depths" }] }
                }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let text = client.generate_text("prompt").await.unwrap();
        assert_eq!(text, "Hollow Depths");
    }

    #[tokio::test]
    async fn generate_text_without_candidates_is_no_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let err = client.generate_text("prompt").await.unwrap_err();
        assert!(
            matches!(err, Error::Generative(GenerativeError::NoText)),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn generate_image_decodes_inline_data() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"fake-png-bytes");

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-image-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [
                        { "text": "here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": encoded } }
                    ]}
                }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let bytes = client.generate_image("a dark workspace").await.unwrap();
        assert_eq!(bytes, b"fake-png-bytes");
    }

    #[tokio::test]
    async fn generate_image_without_inline_data_is_no_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-3-pro-image-preview:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "no image, sorry" }] }
                }]
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let err = client.generate_image("prompt").await.unwrap_err();
        assert!(
            matches!(err, Error::Generative(GenerativeError::NoImage)),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn non_success_status_surfaces_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(429).set_body_string("{\"error\":\"rate limited\"}"),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri())).unwrap();
        let err = client.generate_text("prompt").await.unwrap_err();
        match err {
            Error::Generative(GenerativeError::Api { status, detail }) => {
                assert_eq!(status, 429);
                assert!(detail.contains("rate limited"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

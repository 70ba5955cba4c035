//! Gemini API interaction.
//!
//! The generative model is treated as an opaque capability: given the article
//! text, return the model's text or fail. Each request is a single attempt;
//! there is no retry or backoff.
//!
//! # Architecture
//!
//! - [`AskAsync`]: core trait defining async model interaction
//! - [`GeminiClient`]: `generateContent` over REST, asking for JSON that
//!   follows [`crate::schema::response_schema`]

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::schema::response_schema;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Trait for async model interaction.
///
/// Implementors send text to a model and return its answer. Keeping this
/// behind a trait lets the analysis step run against a canned model in tests.
pub trait AskAsync {
    async fn ask(&self, text: &str) -> Result<String, AnalysisError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    config: AnalysisConfig,
    api_key: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: AnalysisConfig, api_key: String) -> Result<Self, AnalysisError> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request<'a>(&'a self, text: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![RequestPart {
                    text: self.config.system_prompt(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![RequestPart { text }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AskAsync for GeminiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.config.model, chars = text.len()))]
    async fn ask(&self, text: &str) -> Result<String, AnalysisError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request(text))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Gemini API call failed"
            );
            return Err(AnalysisError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let candidate = parsed.candidates.into_iter().next();
        let finish_reason = candidate.as_ref().and_then(|c| c.finish_reason.clone());
        let text = candidate
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .filter(|t| !t.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = text.len(),
            ?finish_reason,
            "Gemini API call succeeded"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::Server) -> GeminiClient {
        let config = AnalysisConfig {
            endpoint: server.url(),
            ..AnalysisConfig::default()
        };
        GeminiClient::new(config, "test-key".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_ask_returns_candidate_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Editorial body" }] }],
                "generationConfig": {
                    "responseMimeType": "application/json",
                    "maxOutputTokens": 8192
                }
            })))
            .with_status(200)
            .with_body(
                json!({
                    "candidates": [{
                        "content": { "parts": [{ "text": "{\"central_idea\":" }, { "text": " \"x\"}" }] },
                        "finishReason": "STOP"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let text = client_for(&server).ask("Editorial body").await.unwrap();
        assert_eq!(text, "{\"central_idea\": \"x\"}");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ask_sends_system_instruction() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_body(Matcher::Regex("CAT VARC mentor".to_string()))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"{}"}]}}]}"#)
            .create_async()
            .await;

        assert_eq!(client_for(&server).ask("text").await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_ask_maps_http_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(429)
            .with_body("RESOURCE_EXHAUSTED")
            .create_async()
            .await;

        let err = client_for(&server).ask("text").await.unwrap_err();
        assert!(matches!(err, AnalysisError::Api { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_ask_without_candidates() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .with_status(200)
            .with_body(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#)
            .create_async()
            .await;

        let err = client_for(&server).ask("text").await.unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyResponse));
    }
}

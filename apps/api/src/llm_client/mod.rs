/// LLM Client — the single point of entry for calls to the Gemini API.
///
/// Callers depend on the `TextGenerator` capability, never on `GeminiClient`
/// directly, so the vendor can be swapped or faked in tests.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

const MAX_OUTPUT_TOKENS: u32 = 4096;
const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Prompt blocked by the model: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    fn is_retryable(&self) -> bool {
        match self {
            LlmError::Http(_) => true,
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Narrow capability: turn a prompt into raw model text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` client with optional retry on 429/5xx/transport errors.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    max_retries: u32,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            base_url: config.gemini_api_base.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            max_retries: config.llm_max_retries,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Makes a raw call to the Gemini API, returning the full response object.
    /// Retries up to `max_retries` times with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let mut attempt = 0;
        loop {
            match self.call_once(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self
                        .retry_base_delay
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        "LLM call attempt {} failed ({}), retrying after {}ms...",
                        attempt,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn call_once(&self, prompt: &str) -> Result<GenerateContentResponse, LlmError> {
        let request_body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let response = self.call(prompt).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked(reason));
        }

        response.text().ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str, retries: u32) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: "gemini-test".to_string(),
            gemini_api_base: base.to_string(),
            llm_timeout_secs: 5,
            llm_max_retries: retries,
            upload_dir: "uploads".into(),
            max_upload_bytes: 1024,
            min_resume_chars: 50,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    fn text_response(text: &str) -> serde_json::Value {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 5 }
        })
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{ "content": { "parts": [{ "text": "Hello, " }, { "text": "world" }] } }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Hello, world"));
    }

    #[test]
    fn test_response_text_none_without_candidates() {
        let response: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [] })).unwrap();
        assert!(response.text().is_none());
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "analyze me" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_response("raw advice")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 0)).unwrap();
        let text = client.generate("analyze me").await.unwrap();
        assert_eq!(text, "raw advice");
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 3)).unwrap();
        match client.generate("p").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 0)).unwrap();
        assert!(matches!(
            client.generate("p").await,
            Err(LlmError::Api { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_retries_server_errors_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 2))
            .unwrap()
            .with_retry_base_delay(Duration::from_millis(1));
        assert!(client.generate("p").await.is_err());
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 0)).unwrap();
        assert!(matches!(
            client.generate("p").await,
            Err(LlmError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_empty_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&test_config(&server.uri(), 0)).unwrap();
        assert!(matches!(
            client.generate("p").await,
            Err(LlmError::EmptyContent)
        ));
    }
}

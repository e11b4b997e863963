//! Chat-completion client for OpenAI-compatible LLM providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{Error, Result};

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// A provider that turns a chat request into free text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Perform one completion call and return the trimmed text of the first
    /// choice. Failures are reported as [`Error::Upstream`].
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

/// Client for an OpenAI-compatible `chat/completions` endpoint.
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl ChatCompletionsClient {
    /// Create a new client rooted at `base_url` (e.g. `https://api.groq.com/openai/v1`).
    pub fn new(http: reqwest::Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionsClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(model = %request.model, max_tokens = request.max_tokens, "Calling LLM provider");

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("LLM provider returned {}: {}", status, body);
            return Err(Error::Upstream(format!("{} - {}", status, body)));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to parse completion: {}", e)))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("Completion has no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.1-8b-instant".to_string(),
            messages: vec![ChatMessage::system("Be funny."), ChatMessage::user("cats")],
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    #[tokio::test]
    async fn test_complete_returns_trimmed_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/openai/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({
                "model": "llama-3.1-8b-instant",
                "max_tokens": 200,
                "messages": [{"role": "system", "content": "Be funny."}, {"role": "user", "content": "cats"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Meow.  "}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let base = format!("{}/openai/v1/", server.uri());
        let client = ChatCompletionsClient::new(reqwest::Client::new(), &base, "test-key");
        let text = client.complete(&sample_request()).await.unwrap();
        assert_eq!(text, "Meow.");
    }

    #[tokio::test]
    async fn test_error_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limit exceeded"))
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(reqwest::Client::new(), &server.uri(), "k");
        let err = client.complete(&sample_request()).await.unwrap_err();
        match err {
            Error::Upstream(message) => assert!(message.contains("rate limit exceeded")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_choices_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(reqwest::Client::new(), &server.uri(), "k");
        let err = client.complete(&sample_request()).await.unwrap_err();
        assert!(matches!(err, Error::Upstream(_)));
    }

    #[tokio::test]
    async fn test_null_content_is_empty_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": null}}]
            })))
            .mount(&server)
            .await;

        let client = ChatCompletionsClient::new(reqwest::Client::new(), &server.uri(), "k");
        assert_eq!(client.complete(&sample_request()).await.unwrap(), "");
    }
}

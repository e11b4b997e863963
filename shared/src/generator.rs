//! Text generation for the three features, with mock and canned fallbacks
//! when no LLM credential is configured.

use std::sync::Arc;

use tracing::info;

use crate::definition::{definition_completion, mock_definition, normalize};
use crate::llm::{ChatMessage, CompletionClient, CompletionRequest};
use crate::models::{DefinitionRequest, DefinitionResponse};
use crate::Result;

/// Joke returned when no LLM credential is configured.
pub const CANNED_JOKE: &str =
    "Why did the AI go to therapy? Because it had too many deep learning issues! 🤖";

/// Caption returned when no LLM credential is configured.
pub const CANNED_CAPTION: &str = "Living my best life! ✨ #vibes #lifestyle";

#[derive(Clone)]
pub struct Generator {
    client: Option<Arc<dyn CompletionClient>>,
    model: String,
}

impl Generator {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client: Some(client),
            model: model.into(),
        }
    }

    /// Generator that only serves mock and canned responses.
    pub fn offline() -> Self {
        Self {
            client: None,
            model: String::new(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.client.is_some()
    }

    /// Definition from the model, or the mock payload when requested or offline.
    pub async fn define(&self, request: &DefinitionRequest) -> Result<DefinitionResponse> {
        let client = match &self.client {
            Some(client) if !request.use_mock => client,
            _ => {
                info!(use_mock = request.use_mock, "Returning mock definition");
                return Ok(mock_definition(&request.text));
            }
        };

        let raw = client
            .complete(&definition_completion(&self.model, &request.text))
            .await?;
        Ok(normalize(&raw, &request.text))
    }

    pub async fn joke(&self, prompt: &str) -> Result<String> {
        let Some(client) = &self.client else {
            return Ok(CANNED_JOKE.to_string());
        };
        client.complete(&self.joke_completion(prompt)).await
    }

    pub async fn caption(&self, prompt: &str) -> Result<String> {
        let Some(client) = &self.client else {
            return Ok(CANNED_CAPTION.to_string());
        };
        client.complete(&self.caption_completion(prompt)).await
    }

    fn joke_completion(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(
                    "You are a funny comedian. Generate humorous jokes based on the given prompt.",
                ),
                ChatMessage::user(format!("Generate a funny joke based on: {}", prompt)),
            ],
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    fn caption_completion(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(
                    "You are a social media expert. Generate engaging Instagram captions with \
                     relevant hashtags.",
                ),
                ChatMessage::user(format!(
                    "Generate an engaging Instagram caption for: {}",
                    prompt
                )),
            ],
            temperature: 0.6,
            max_tokens: 300,
        }
    }
}

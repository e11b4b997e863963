//! Shared data models.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Service name reported by the info and health routes.
pub const SERVICE_NAME: &str = "AI Dictionary API";

/// Definition request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DefinitionRequest {
    /// Text to define
    #[validate(length(min = 1, max = 500))]
    pub text: String,
    /// Skip the LLM call and return the canned definition
    #[serde(default)]
    pub use_mock: bool,
}

/// Joke request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JokeRequest {
    #[validate(length(min = 1, max = 500))]
    pub prompt: String,
}

/// Caption request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CaptionRequest {
    #[validate(length(min = 1, max = 500))]
    pub prompt: String,
}

/// Usage example for a defined term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub sentence: String,
    pub context: String,
}

/// Synonym with a free-text similarity tier (high/medium/low).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synonym {
    pub word: String,
    pub similarity: String,
}

/// Structured definition returned by `/define`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionResponse {
    pub word: String,
    pub part_of_speech: String,
    pub definition: String,
    pub examples: Vec<Example>,
    pub synonyms: Vec<Synonym>,
    /// Nominally 0-1; reported as given, never clamped.
    pub confidence: f64,
}

/// Joke response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokeResponse {
    pub joke: String,
}

/// Caption response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub caption: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            message: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            service: SERVICE_NAME,
        }
    }
}

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identity provider id
    pub id: String,
    /// Email, empty when the provider has none
    pub email: String,
    /// Profile username, if a profile exists or was created
    pub username: Option<String>,
}

/// Generation feature, as recorded in usage events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Dictionary,
    Jokes,
    Captions,
}

impl Feature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Dictionary => "dictionary",
            Feature::Jokes => "jokes",
            Feature::Captions => "captions",
        }
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_mock_defaults_to_false() {
        let request: DefinitionRequest = serde_json::from_str(r#"{"text":"serendipity"}"#).unwrap();
        assert!(!request.use_mock);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_text_length_bounds() {
        let empty = DefinitionRequest {
            text: String::new(),
            use_mock: false,
        };
        assert!(empty.validate().is_err());

        let max = DefinitionRequest {
            text: "a".repeat(500),
            use_mock: false,
        };
        assert!(max.validate().is_ok());

        let too_long = DefinitionRequest {
            text: "a".repeat(501),
            use_mock: false,
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        // 500 multi-byte characters is still within bounds.
        let request = JokeRequest {
            prompt: "é".repeat(500),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_service_info_version() {
        let info = ServiceInfo::current();
        assert_eq!(info.message, "AI Dictionary API");
        assert_eq!(info.version, "1.0.0");
    }
}

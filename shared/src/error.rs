//! Error types for the dictionary service.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while serving a request.
#[derive(Error, Debug)]
pub enum Error {
    /// Request body failed shape or length constraints
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or rejected bearer token
    #[error("Authentication error: {0}")]
    Auth(String),

    /// A required external credential is absent
    #[error("Configuration error: {0}")]
    Config(String),

    /// The LLM provider call failed
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Profile, subscription or usage store call failed
    #[error("Store error: {0}")]
    Store(String),

    /// Outbound HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 422,
            Error::Auth(_) => 401,
            _ => 500,
        }
    }

    /// Human-readable `detail` for the error envelope.
    ///
    /// Validation, authentication and configuration messages are shown as-is.
    /// Upstream failures embed the provider's message; anything else is
    /// wrapped in the route's `context`.
    pub fn detail(&self, context: &str) -> String {
        match self {
            Error::Validation(message) | Error::Auth(message) | Error::Config(message) => {
                message.clone()
            }
            Error::Upstream(message) => format!("LLM provider error: {}", message),
            other => format!("{}: {}", context, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("too long".into()).status_code(), 422);
        assert_eq!(Error::Auth("Not authenticated".into()).status_code(), 401);
        assert_eq!(Error::Config("missing".into()).status_code(), 500);
        assert_eq!(Error::Upstream("boom".into()).status_code(), 500);
        assert_eq!(Error::Store("down".into()).status_code(), 500);
    }

    #[test]
    fn test_upstream_detail_embeds_message() {
        let detail = Error::Upstream("rate limited".into()).detail("Error generating joke");
        assert_eq!(detail, "LLM provider error: rate limited");
    }

    #[test]
    fn test_unexpected_detail_is_wrapped() {
        let detail = Error::Store("feature_usage returned 503".into()).detail("Error generating caption");
        assert_eq!(
            detail,
            "Error generating caption: Store error: feature_usage returned 503"
        );
    }

    #[test]
    fn test_auth_detail_is_verbatim() {
        let detail = Error::Auth("Invalid authentication credentials".into()).detail("ignored");
        assert_eq!(detail, "Invalid authentication credentials");
    }
}

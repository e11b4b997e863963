//! Configuration management for the dictionary function.

use std::env;

use crate::secrets::ApiKeys;

/// Default OpenAI-compatible endpoint (Groq).
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default chat model.
pub const DEFAULT_LLM_MODEL: &str = "llama-3.1-8b-instant";

const GROQ_KEY_PLACEHOLDER: &str = "your_groq_api_key_here";
const SUPABASE_URL_PLACEHOLDER: &str = "your_supabase_project_url";
const SUPABASE_KEY_PLACEHOLDER: &str = "your_supabase_service_key";

/// Application configuration loaded from environment variables.
///
/// Every credential is optional: a missing LLM key puts the service in mock
/// mode, a missing Supabase URL or service key disables authentication.
#[derive(Clone, Default)]
pub struct Config {
    /// Supabase project URL
    pub supabase_url: Option<String>,
    /// Supabase service-role key
    pub supabase_service_key: Option<String>,
    /// Supabase JWT secret; enables local token verification
    pub supabase_jwt_secret: Option<String>,
    /// LLM provider API key
    pub llm_api_key: Option<String>,
    /// LLM provider base URL
    pub llm_base_url: String,
    /// Chat model name
    pub llm_model: String,
    /// ARN of a Secrets Manager secret holding API keys
    pub api_keys_secret_arn: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            supabase_url: configured(lookup("SUPABASE_URL"), SUPABASE_URL_PLACEHOLDER),
            supabase_service_key: configured(
                lookup("SUPABASE_SERVICE_KEY"),
                SUPABASE_KEY_PLACEHOLDER,
            ),
            supabase_jwt_secret: configured(lookup("SUPABASE_JWT_SECRET"), ""),
            llm_api_key: configured(lookup("GROQ_API_KEY"), GROQ_KEY_PLACEHOLDER),
            llm_base_url: configured(lookup("LLM_BASE_URL"), "")
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            llm_model: configured(lookup("LLM_MODEL"), "")
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            api_keys_secret_arn: configured(lookup("API_KEYS_SECRET_ARN"), ""),
        }
    }

    /// Fill credentials that are still unset from a fetched secret.
    pub fn with_secrets(mut self, keys: ApiKeys) -> Self {
        if self.llm_api_key.is_none() {
            self.llm_api_key = configured(keys.groq_api_key, GROQ_KEY_PLACEHOLDER);
        }
        if self.supabase_service_key.is_none() {
            self.supabase_service_key =
                configured(keys.supabase_service_key, SUPABASE_KEY_PLACEHOLDER);
        }
        if self.supabase_jwt_secret.is_none() {
            self.supabase_jwt_secret = configured(keys.supabase_jwt_secret, "");
        }
        self
    }

    /// Supabase URL and service key, when both are present.
    pub fn supabase(&self) -> Option<(&str, &str)> {
        match (&self.supabase_url, &self.supabase_service_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

// Secrets stay out of Debug output; only presence is reported.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_service_key", &self.supabase_service_key.is_some())
            .field("supabase_jwt_secret", &self.supabase_jwt_secret.is_some())
            .field("llm_api_key", &self.llm_api_key.is_some())
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("api_keys_secret_arn", &self.api_keys_secret_arn)
            .finish()
    }
}

/// Treat empty and placeholder values as unset.
fn configured(value: Option<String>, placeholder: &str) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .filter(|v| placeholder.is_empty() || !v.contains(placeholder))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = config_from(&[]);
        assert!(config.llm_api_key.is_none());
        assert!(config.supabase().is_none());
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
    }

    #[test]
    fn test_placeholders_count_as_unset() {
        let config = config_from(&[
            ("GROQ_API_KEY", "your_groq_api_key_here"),
            ("SUPABASE_URL", "your_supabase_project_url"),
            ("SUPABASE_SERVICE_KEY", "your_supabase_service_key"),
        ]);
        assert!(config.llm_api_key.is_none());
        assert!(config.supabase_url.is_none());
        assert!(config.supabase_service_key.is_none());
    }

    #[test]
    fn test_supabase_requires_both_values() {
        let config = config_from(&[("SUPABASE_URL", "https://abc.supabase.co")]);
        assert!(config.supabase().is_none());

        let config = config_from(&[
            ("SUPABASE_URL", "https://abc.supabase.co"),
            ("SUPABASE_SERVICE_KEY", "service-key"),
        ]);
        assert_eq!(
            config.supabase(),
            Some(("https://abc.supabase.co", "service-key"))
        );
    }

    #[test]
    fn test_secrets_fill_only_missing_values() {
        let config = config_from(&[("GROQ_API_KEY", "from-env")]).with_secrets(ApiKeys {
            groq_api_key: Some("from-secret".to_string()),
            supabase_service_key: Some("service-from-secret".to_string()),
            supabase_jwt_secret: None,
        });
        assert_eq!(config.llm_api_key.as_deref(), Some("from-env"));
        assert_eq!(
            config.supabase_service_key.as_deref(),
            Some("service-from-secret")
        );
        assert!(config.supabase_jwt_secret.is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = config_from(&[("GROQ_API_KEY", "gsk_very_secret")]);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("gsk_very_secret"));
    }
}

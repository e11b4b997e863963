//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tokio::sync::RwLock;

use crate::{Error, Result};

/// Cached secrets with lazy initialization.
static SECRETS_CACHE: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, String>> {
    SECRETS_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// API keys stored as a JSON secret.
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeys {
    #[serde(rename = "GROQ_API_KEY", default)]
    pub groq_api_key: Option<String>,
    #[serde(rename = "SUPABASE_SERVICE_KEY", default)]
    pub supabase_service_key: Option<String>,
    #[serde(rename = "SUPABASE_JWT_SECRET", default)]
    pub supabase_jwt_secret: Option<String>,
}

/// Get a secret value from Secrets Manager with caching.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    {
        let cache = get_cache().read().await;
        if let Some(value) = cache.get(secret_arn) {
            return Ok(value.clone());
        }
    }

    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    let secret_string = response
        .secret_string()
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))?
        .to_string();

    {
        let mut cache = get_cache().write().await;
        cache.insert(secret_arn.to_string(), secret_string.clone());
    }

    Ok(secret_string)
}

/// Get API keys from Secrets Manager.
pub async fn get_api_keys(client: &SecretsClient, secret_arn: &str) -> Result<ApiKeys> {
    let secret_string = get_secret(client, secret_arn).await?;
    parse_api_keys(&secret_string)
}

fn parse_api_keys(secret_string: &str) -> Result<ApiKeys> {
    serde_json::from_str(secret_string)
        .map_err(|e| Error::Aws(format!("Failed to parse API keys secret: {}", e)))
}

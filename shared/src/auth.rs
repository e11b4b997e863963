//! Bearer-token authentication and first-sight profile creation.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::User;
use crate::{Error, Result};

/// Detail returned for any token the provider does not accept.
pub const INVALID_CREDENTIALS: &str = "Invalid authentication credentials";

/// Identity resolved from a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Row in the external profile store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Verifies bearer tokens.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifiedUser>;
}

/// Reads and creates profile rows keyed by user id.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>>;
    async fn insert_profile(&self, profile: &Profile) -> Result<()>;
}

/// How the caller's profile was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileResolution {
    /// A stored profile was found
    Existing,
    /// No usable profile was found and one was created
    Created,
    /// Creating the profile failed; the identity is usable without a username
    Unsaved(String),
}

/// Result of a successful authentication.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: User,
    pub profile: ProfileResolution,
}

/// Token verification plus best-effort profile resolution.
#[derive(Clone)]
pub struct Authenticator {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
}

impl Authenticator {
    pub fn new(identity: Arc<dyn IdentityProvider>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { identity, profiles }
    }

    /// Verify `token` and resolve (or create) the caller's profile.
    ///
    /// Only verification failures are errors. Profile store failures degrade
    /// into [`ProfileResolution::Unsaved`].
    pub async fn authenticate(&self, token: &str) -> Result<Authenticated> {
        let verified = self.identity.verify_token(token).await.map_err(|e| {
            warn!(error = %e, "Token verification failed");
            Error::Auth(INVALID_CREDENTIALS.to_string())
        })?;

        info!(user_id = %verified.id, "User authenticated");

        let existing = match self.profiles.fetch_profile(&verified.id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %verified.id, error = %e, "Profile fetch failed, creating profile");
                None
            }
        };

        if let Some(profile) = existing {
            return Ok(Authenticated {
                user: User {
                    id: verified.id,
                    email: verified.email.unwrap_or_default(),
                    username: profile.username,
                },
                profile: ProfileResolution::Existing,
            });
        }

        Ok(self.create_profile(verified).await)
    }

    async fn create_profile(&self, verified: VerifiedUser) -> Authenticated {
        let username = synthesize_username(&verified);
        let profile = Profile {
            id: verified.id.clone(),
            username: Some(username.clone()),
            email: verified.email.clone(),
            is_active: true,
        };

        let (username, resolution) = match self.profiles.insert_profile(&profile).await {
            Ok(()) => {
                info!(user_id = %verified.id, "User profile created");
                (Some(username), ProfileResolution::Created)
            }
            Err(e) => {
                // Concurrent first requests can race here; the loser lands in this arm.
                warn!(user_id = %verified.id, error = %e, "Failed to create user profile");
                (None, ProfileResolution::Unsaved(e.to_string()))
            }
        };

        Authenticated {
            user: User {
                id: verified.id,
                email: verified.email.unwrap_or_default(),
                username,
            },
            profile: resolution,
        }
    }
}

/// Username for a new profile: metadata `username`, else the email's local
/// part, else `user_` followed by the first 8 characters of the id.
pub fn synthesize_username(user: &VerifiedUser) -> String {
    if let Some(name) = user
        .user_metadata
        .get("username")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
    {
        return name.to_string();
    }

    match user.email.as_deref().and_then(|e| e.split('@').next()) {
        Some(local) if !local.is_empty() => local.to_string(),
        _ => format!("user_{}", user.id.chars().take(8).collect::<String>()),
    }
}

/// JWT claims issued by Supabase Auth.
#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseClaims {
    /// Subject (user id)
    pub sub: String,
    /// Email
    #[serde(default)]
    pub email: Option<String>,
    /// Audience
    pub aud: String,
    /// Expiration
    pub exp: u64,
    /// Free-form metadata set at signup
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Verifies Supabase access tokens locally with the project's JWT secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["authenticated"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtVerifier {
    async fn verify_token(&self, token: &str) -> Result<VerifiedUser> {
        let token_data = decode::<SupabaseClaims>(token, &self.key, &self.validation)
            .map_err(|e| Error::Auth(format!("Failed to decode token: {}", e)))?;

        let claims = token_data.claims;
        Ok(VerifiedUser {
            id: claims.sub,
            email: claims.email,
            user_metadata: claims.user_metadata,
        })
    }
}

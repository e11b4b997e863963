//! Request pipeline shared by all routes: authenticate, gate, log usage,
//! generate.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{Authenticator, JwtVerifier};
use crate::generator::Generator;
use crate::llm::ChatCompletionsClient;
use crate::models::{
    CaptionRequest, CaptionResponse, DefinitionRequest, DefinitionResponse, Feature, JokeRequest,
    JokeResponse, User,
};
use crate::subscription::SubscriptionGate;
use crate::supabase::SupabaseClient;
use crate::usage::UsageRecorder;
use crate::{Config, Error, Result};

/// Dependencies for every route, built once at startup.
#[derive(Clone)]
pub struct Services {
    authenticator: Option<Authenticator>,
    gate: SubscriptionGate,
    usage: UsageRecorder,
    generator: Generator,
}

impl Services {
    pub fn new(
        authenticator: Option<Authenticator>,
        gate: SubscriptionGate,
        usage: UsageRecorder,
        generator: Generator,
    ) -> Self {
        Self {
            authenticator,
            gate,
            usage,
            generator,
        }
    }

    /// Wire the Supabase and LLM adapters that `config` has credentials for.
    pub fn from_config(config: &Config, http: reqwest::Client) -> Self {
        let generator = match &config.llm_api_key {
            Some(key) => {
                info!(model = %config.llm_model, base_url = %config.llm_base_url, "LLM provider configured");
                let client = ChatCompletionsClient::new(http.clone(), &config.llm_base_url, key);
                Generator::new(Arc::new(client), config.llm_model.clone())
            }
            None => {
                warn!("LLM API key not configured, serving mock responses");
                Generator::offline()
            }
        };

        let Some((url, service_key)) = config.supabase() else {
            warn!("Supabase not configured, authenticated routes will fail");
            return Self::new(
                None,
                SubscriptionGate::unconfigured(),
                UsageRecorder::disabled(),
                generator,
            );
        };

        let supabase = Arc::new(SupabaseClient::new(http, url, service_key));
        let authenticator = match &config.supabase_jwt_secret {
            Some(secret) => {
                info!("Verifying tokens locally with the Supabase JWT secret");
                Authenticator::new(Arc::new(JwtVerifier::new(secret)), supabase.clone())
            }
            None => Authenticator::new(supabase.clone(), supabase.clone()),
        };

        Self::new(
            Some(authenticator),
            SubscriptionGate::new(supabase.clone()),
            UsageRecorder::new(supabase),
            generator,
        )
    }

    /// Resolve the caller from a bearer token.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<User> {
        let token = token.ok_or_else(|| Error::Auth("Not authenticated".to_string()))?;
        let authenticator = self.authenticator.as_ref().ok_or_else(|| {
            Error::Config("Authentication service not configured".to_string())
        })?;

        Ok(authenticator.authenticate(token).await?.user)
    }

    /// Authenticate and run the subscription gate.
    pub async fn authorize_premium(&self, token: Option<&str>) -> Result<User> {
        let user = self.authenticate(token).await?;
        let decision = self.gate.check(&user).await;
        // Never taken while the gate fails open; kept for a fail-closed policy.
        if !decision.allows() {
            return Err(Error::Auth("Active subscription required".to_string()));
        }
        Ok(user)
    }

    pub async fn define(
        &self,
        token: Option<&str>,
        request: &DefinitionRequest,
    ) -> Result<DefinitionResponse> {
        let user = self.authenticate(token).await?;
        self.usage.record(&user, Feature::Dictionary, &request.text).await;
        self.generator.define(request).await
    }

    pub async fn generate_joke(
        &self,
        token: Option<&str>,
        request: &JokeRequest,
    ) -> Result<JokeResponse> {
        let user = self.authorize_premium(token).await?;
        self.usage.record(&user, Feature::Jokes, &request.prompt).await;
        let joke = self.generator.joke(&request.prompt).await?;
        Ok(JokeResponse { joke })
    }

    pub async fn generate_caption(
        &self,
        token: Option<&str>,
        request: &CaptionRequest,
    ) -> Result<CaptionResponse> {
        let user = self.authorize_premium(token).await?;
        self.usage.record(&user, Feature::Captions, &request.prompt).await;
        let caption = self.generator.caption(&request.prompt).await?;
        Ok(CaptionResponse { caption })
    }
}

//! Supabase adapter: token verification through GoTrue and table access
//! through PostgREST.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{IdentityProvider, Profile, ProfileStore, VerifiedUser};
use crate::subscription::{Subscription, SubscriptionStore};
use crate::usage::{UsageEvent, UsageLog};
use crate::{Error, Result};

const PROFILES_TABLE: &str = "user_profiles";
const SUBSCRIPTIONS_TABLE: &str = "user_subscriptions";
const USAGE_TABLE: &str = "feature_usage";

/// Service-role client for a Supabase project.
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(http: reqwest::Client, base_url: &str, service_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the service-role credentials PostgREST expects.
    fn service(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// `GET` rows matching `eq` filters.
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let query = filters
            .iter()
            .map(|(column, value)| format!("{}=eq.{}", column, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let url = format!("{}?select=*&{}", self.table_url(table), query);

        let response = self.service(self.http.get(&url)).send().await?;
        let response = ensure_success(table, response).await?;
        Ok(response.json().await?)
    }

    async fn insert<T: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        row: &T,
        prefer: &str,
    ) -> Result<()> {
        let response = self
            .service(self.http.post(self.table_url(table)))
            .header("Prefer", prefer)
            .json(row)
            .send()
            .await?;
        ensure_success(table, response).await?;
        Ok(())
    }
}

async fn ensure_success(table: &str, response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::Store(format!("{} returned {}: {}", table, status, body)))
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn verify_token(&self, token: &str) -> Result<VerifiedUser> {
        let response = self
            .http
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Auth(format!(
                "Token rejected by identity provider: {}",
                response.status()
            )));
        }

        let user: VerifiedUser = response.json().await?;
        debug!(user_id = %user.id, "Token verified by identity provider");
        Ok(user)
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        let rows: Vec<Profile> = self.select(PROFILES_TABLE, &[("id", user_id)]).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        self.insert(PROFILES_TABLE, profile, "return=representation")
            .await
    }
}

#[async_trait]
impl SubscriptionStore for SupabaseClient {
    async fn active_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        let rows: Vec<Subscription> = self
            .select(
                SUBSCRIPTIONS_TABLE,
                &[("user_id", user_id), ("status", "active")],
            )
            .await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl UsageLog for SupabaseClient {
    async fn record(&self, event: &UsageEvent) -> Result<()> {
        self.insert(USAGE_TABLE, event, "return=minimal").await
    }
}

//! Subscription gate for premium generation features.
//!
//! The gate is fail-open: a missing subscription, a lookup error, or an
//! unconfigured store all still allow access. Decisions other than
//! [`GateDecision::Active`] are logged so they can be audited.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::models::User;
use crate::Result;

/// Active subscription row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Subscription {
    pub user_id: String,
    pub status: String,
}

/// Looks up a user's active subscription.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn active_subscription(&self, user_id: &str) -> Result<Option<Subscription>>;
}

/// Outcome of a subscription check.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Active,
    NoSubscription,
    LookupFailed(String),
}

impl GateDecision {
    /// Whether the request may proceed. Always true.
    pub fn allows(&self) -> bool {
        true
    }
}

#[derive(Clone, Default)]
pub struct SubscriptionGate {
    store: Option<Arc<dyn SubscriptionStore>>,
}

impl SubscriptionGate {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Gate with no backing store.
    pub fn unconfigured() -> Self {
        Self { store: None }
    }

    pub async fn check(&self, user: &User) -> GateDecision {
        let Some(store) = &self.store else {
            warn!(user_id = %user.id, "Subscription store not configured, allowing access");
            return GateDecision::LookupFailed("subscription store not configured".to_string());
        };

        match store.active_subscription(&user.id).await {
            Ok(Some(_)) => GateDecision::Active,
            Ok(None) => {
                warn!(user_id = %user.id, "No active subscription, allowing access");
                GateDecision::NoSubscription
            }
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Subscription lookup failed, allowing access");
                GateDecision::LookupFailed(e.to_string())
            }
        }
    }
}

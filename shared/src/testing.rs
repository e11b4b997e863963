//! In-memory fakes for the service ports, for unit and endpoint tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::auth::{IdentityProvider, Profile, ProfileStore, VerifiedUser};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::subscription::{Subscription, SubscriptionStore};
use crate::usage::{UsageEvent, UsageLog};
use crate::{Error, Result};

/// Identity provider backed by a token table.
#[derive(Default)]
pub struct FakeIdentity {
    users: HashMap<String, VerifiedUser>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub const VALID_TOKEN: &'static str = "valid-token";

    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts [`Self::VALID_TOKEN`] as `user-1` / `ada@example.com`.
    pub fn with_default_user() -> Self {
        Self::new().with_user(
            Self::VALID_TOKEN,
            VerifiedUser {
                id: "user-1".to_string(),
                email: Some("ada@example.com".to_string()),
                user_metadata: serde_json::Value::Null,
            },
        )
    }

    pub fn with_user(mut self, token: &str, user: VerifiedUser) -> Self {
        self.users.insert(token.to_string(), user);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verify_token(&self, token: &str) -> Result<VerifiedUser> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.users
            .get(token)
            .cloned()
            .ok_or_else(|| Error::Auth("unknown token".to_string()))
    }
}

#[derive(Default)]
pub struct FakeProfiles {
    profiles: Mutex<HashMap<String, Profile>>,
    inserted: Mutex<Vec<Profile>>,
    fail_fetch: bool,
    fail_insert: bool,
}

impl FakeProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, profile: Profile) -> Self {
        lock(&self.profiles).insert(profile.id.clone(), profile);
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn failing_insert(mut self) -> Self {
        self.fail_insert = true;
        self
    }

    pub fn inserted(&self) -> Vec<Profile> {
        lock(&self.inserted).clone()
    }
}

#[async_trait]
impl ProfileStore for FakeProfiles {
    async fn fetch_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        if self.fail_fetch {
            return Err(Error::Store("user_profiles unavailable".to_string()));
        }
        Ok(lock(&self.profiles).get(user_id).cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<()> {
        if self.fail_insert {
            return Err(Error::Store("duplicate key value".to_string()));
        }
        lock(&self.profiles).insert(profile.id.clone(), profile.clone());
        lock(&self.inserted).push(profile.clone());
        Ok(())
    }
}

pub struct FakeSubscriptions {
    active: Vec<String>,
    fail: bool,
}

impl FakeSubscriptions {
    pub fn active(user_ids: &[&str]) -> Self {
        Self {
            active: user_ids.iter().map(|id| id.to_string()).collect(),
            fail: false,
        }
    }

    /// Store whose table does not exist.
    pub fn failing() -> Self {
        Self {
            active: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl SubscriptionStore for FakeSubscriptions {
    async fn active_subscription(&self, user_id: &str) -> Result<Option<Subscription>> {
        if self.fail {
            return Err(Error::Store(
                "relation \"user_subscriptions\" does not exist".to_string(),
            ));
        }
        Ok(self
            .active
            .iter()
            .find(|id| id.as_str() == user_id)
            .map(|id| Subscription {
                user_id: id.clone(),
                status: "active".to_string(),
            }))
    }
}

#[derive(Default)]
pub struct FakeUsageLog {
    events: Mutex<Vec<UsageEvent>>,
    fail: bool,
}

impl FakeUsageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<UsageEvent> {
        lock(&self.events).clone()
    }
}

#[async_trait]
impl UsageLog for FakeUsageLog {
    async fn record(&self, event: &UsageEvent) -> Result<()> {
        if self.fail {
            return Err(Error::Store("feature_usage unavailable".to_string()));
        }
        lock(&self.events).push(event.clone());
        Ok(())
    }
}

/// Completion client with a fixed reply or a fixed upstream error.
pub struct FakeCompletion {
    reply: std::result::Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl CompletionClient for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        lock(&self.requests).push(request.clone());
        self.reply.clone().map_err(Error::Upstream)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

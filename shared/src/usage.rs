//! Best-effort feature usage logging.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::{Feature, User};
use crate::Result;

/// Row written to the usage store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageEvent {
    pub user_id: String,
    pub feature_name: &'static str,
    pub query: String,
    /// Character length of the query (placeholder until responses are measured)
    pub response_length: usize,
    pub tokens_used: u32,
}

impl UsageEvent {
    pub fn new(user: &User, feature: Feature, query: &str) -> Self {
        Self {
            user_id: user.id.clone(),
            feature_name: feature.as_str(),
            query: query.to_string(),
            response_length: query.chars().count(),
            tokens_used: 0,
        }
    }
}

/// Append-only sink for usage events.
#[async_trait]
pub trait UsageLog: Send + Sync {
    async fn record(&self, event: &UsageEvent) -> Result<()>;
}

/// Outcome of a usage write.
#[derive(Debug, Clone, PartialEq)]
pub enum UsageOutcome {
    Recorded,
    Skipped,
    Failed(String),
}

#[derive(Clone, Default)]
pub struct UsageRecorder {
    log: Option<Arc<dyn UsageLog>>,
}

impl UsageRecorder {
    pub fn new(log: Arc<dyn UsageLog>) -> Self {
        Self { log: Some(log) }
    }

    /// Recorder that drops every event.
    pub fn disabled() -> Self {
        Self { log: None }
    }

    /// Write one event. Failures are logged and reported, never raised.
    pub async fn record(&self, user: &User, feature: Feature, query: &str) -> UsageOutcome {
        let Some(log) = &self.log else {
            return UsageOutcome::Skipped;
        };

        let event = UsageEvent::new(user, feature, query);
        match log.record(&event).await {
            Ok(()) => {
                debug!(user_id = %user.id, feature = %feature, "Feature usage recorded");
                UsageOutcome::Recorded
            }
            Err(e) => {
                warn!(user_id = %user.id, feature = %feature, error = %e, "Failed to record feature usage");
                UsageOutcome::Failed(e.to_string())
            }
        }
    }
}

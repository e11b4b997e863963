//! Shared library for the AI Dictionary function.
//!
//! This crate provides the request pipeline (authentication, subscription
//! gate, usage logging, LLM generation and normalization) and the adapters
//! for the external identity, storage and LLM services.

pub mod auth;
pub mod config;
pub mod definition;
pub mod error;
pub mod generator;
pub mod http;
pub mod llm;
pub mod models;
pub mod secrets;
pub mod service;
pub mod subscription;
pub mod supabase;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod usage;

pub use auth::{Authenticated, Authenticator, IdentityProvider, JwtVerifier, ProfileStore};
pub use config::Config;
pub use error::{Error, Result};
pub use generator::Generator;
pub use llm::{ChatCompletionsClient, CompletionClient};
pub use models::{
    CaptionRequest, CaptionResponse, DefinitionRequest, DefinitionResponse, Feature,
    HealthStatus, JokeRequest, JokeResponse, ServiceInfo, User,
};
pub use secrets::{get_api_keys, get_secret, ApiKeys};
pub use service::Services;
pub use subscription::{GateDecision, SubscriptionGate, SubscriptionStore};
pub use supabase::SupabaseClient;
pub use usage::{UsageLog, UsageOutcome, UsageRecorder};

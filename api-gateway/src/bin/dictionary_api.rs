//! Dictionary API Lambda - Definitions, jokes and captions from an LLM.
//!
//! Endpoints:
//! - GET / - Service info
//! - GET /health - Liveness
//! - POST /define - Structured definition (authenticated)
//! - POST /jokes/generate - Joke (authenticated, subscription-gated)
//! - POST /captions/generate - Instagram caption (authenticated, subscription-gated)

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use serde::Serialize;
use shared::http::{bearer_token, error_response, json_response, parse_json_body};
use shared::{
    get_api_keys, CaptionRequest, CaptionResponse, Config, DefinitionRequest,
    DefinitionResponse, HealthStatus, JokeRequest, JokeResponse, ServiceInfo, Services,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFINE_CONTEXT: &str = "Error processing definition request";
const JOKE_CONTEXT: &str = "Error generating joke";
const CAPTION_CONTEXT: &str = "Error generating caption";

const KNOWN_PATHS: [&str; 5] = ["/", "/health", "/define", "/jokes/generate", "/captions/generate"];

/// Application state shared across requests.
struct AppState {
    services: Services,
}

impl AppState {
    async fn new() -> Result<Self, Error> {
        let mut config = Config::from_env();

        if let Some(secret_arn) = config.api_keys_secret_arn.clone() {
            let aws = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let secrets_client = aws_sdk_secretsmanager::Client::new(&aws);
            let keys = get_api_keys(&secrets_client, &secret_arn).await?;
            config = config.with_secrets(keys);
        }

        info!(config = ?config, "Configuration loaded");

        Ok(Self {
            services: Services::from_config(&config, reqwest::Client::new()),
        })
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    let method = event.method().as_str();
    let path = normalize_path(event.uri().path());

    info!("Dictionary request: {} {}", method, path);

    match (method, path) {
        ("GET", "/") => json_response(200, &ServiceInfo::current()),
        ("GET", "/health") => json_response(200, &HealthStatus::healthy()),

        ("POST", "/define") => respond(define(&state, &event).await, DEFINE_CONTEXT),
        ("POST", "/jokes/generate") => respond(generate_joke(&state, &event).await, JOKE_CONTEXT),
        ("POST", "/captions/generate") => {
            respond(generate_caption(&state, &event).await, CAPTION_CONTEXT)
        }

        (_, path) if KNOWN_PATHS.contains(&path) => error_response(405, "Method Not Allowed"),
        _ => error_response(404, "Not Found"),
    }
}

async fn define(state: &AppState, event: &Request) -> shared::Result<DefinitionResponse> {
    let request: DefinitionRequest = parse_json_body(event.body())?;
    info!(use_mock = request.use_mock, "Definition requested");
    state
        .services
        .define(bearer_token(event.headers()), &request)
        .await
}

async fn generate_joke(state: &AppState, event: &Request) -> shared::Result<JokeResponse> {
    let request: JokeRequest = parse_json_body(event.body())?;
    state
        .services
        .generate_joke(bearer_token(event.headers()), &request)
        .await
}

async fn generate_caption(state: &AppState, event: &Request) -> shared::Result<CaptionResponse> {
    let request: CaptionRequest = parse_json_body(event.body())?;
    state
        .services
        .generate_caption(bearer_token(event.headers()), &request)
        .await
}

/// Drop a trailing slash, keeping the root path intact.
fn normalize_path(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Serialize a route result, mapping errors onto the `{detail}` envelope.
fn respond<T: Serialize>(
    result: shared::Result<T>,
    context: &str,
) -> Result<Response<Body>, Error> {
    match result {
        Ok(body) => json_response(200, &body),
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                error!(status, error = %e, "{}", context);
            } else {
                warn!(status, error = %e, "Request rejected");
            }
            error_response(status, e.detail(context))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}

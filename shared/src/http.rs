//! HTTP helpers for the Lambda function.

use lambda_http::http::header::{AUTHORIZATION, CONTENT_TYPE, WWW_AUTHENTICATE};
use lambda_http::http::{HeaderMap, HeaderValue};
use lambda_http::{Body, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::{Error, Result};

/// Error envelope returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Create a JSON response with the given status code and data.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(data)?))?)
}

/// Create an error response with the given status code and detail.
pub fn error_response(
    status: u16,
    detail: impl Into<String>,
) -> std::result::Result<Response<Body>, lambda_http::Error> {
    let mut response = json_response(
        status,
        &ErrorBody {
            detail: detail.into(),
        },
    )?;
    if status == 401 {
        response
            .headers_mut()
            .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    }
    Ok(response)
}

/// Parse and validate a JSON request body.
pub fn parse_json_body<T: DeserializeOwned + Validate>(body: &Body) -> Result<T> {
    let parsed: T = serde_json::from_slice(body.as_ref())
        .map_err(|e| Error::Validation(format!("Invalid request body: {}", e)))?;
    parsed
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;
    Ok(parsed)
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

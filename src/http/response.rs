//! Response construction.
//!
//! # Responsibilities
//! - Serialize API data as JSON
//! - Map routing and client errors to status codes
//!
//! # Design Decisions
//! - Error bodies are the plain-text message, as the upstream sends them
//! - API error statuses are passed through unchanged
//! - Transport and decode failures become 502 Bad Gateway

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::client::ClientError;
use crate::routing::RouteError;

/// 200 with `data` as the JSON body.
pub fn ok(data: Value) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

pub fn bad_request() -> Response {
    error(StatusCode::BAD_REQUEST, "Bad Request")
}

pub fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not Found")
}

/// `status` with `message` as a plain-text body.
pub fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, message.into()).into_response()
}

/// 405 with an `Allow` header listing `allowed`.
pub fn method_not_allowed(allowed: &[Method]) -> Response {
    let mut response = error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");

    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }

    response
}

pub fn route_error(err: &RouteError) -> Response {
    match err {
        RouteError::NotFound => not_found(),
        RouteError::MethodNotAllowed { allowed } => method_not_allowed(allowed),
    }
}

pub fn client_error(err: &ClientError) -> Response {
    match err {
        ClientError::Api(api) => {
            let status = StatusCode::from_u16(api.status).unwrap_or(StatusCode::BAD_GATEWAY);
            error(status, api.message.clone())
        }
        ClientError::Transport(_) | ClientError::Decode(_) => {
            error(StatusCode::BAD_GATEWAY, "Upstream request failed")
        }
        ClientError::MissingParam(_) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

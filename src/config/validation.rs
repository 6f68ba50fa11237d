//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream endpoint and credentials
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("api.endpoint '{0}' is not an absolute http(s) URL")]
    InvalidEndpoint(String),

    #[error("api.api_key or api.secret must be set")]
    MissingCredentials,

    #[error("http.path_prefix '{0}' must start with '/' and not end with '/'")]
    InvalidPathPrefix(String),

    #[error("http.path_prefix '{0}' must not contain '{{', '}}' or '*'")]
    PathPrefixSyntax(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.api.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => errors.push(ValidationError::InvalidEndpoint(config.api.endpoint.clone())),
    }

    if config.api.api_key.is_empty() && config.api.secret.is_empty() {
        errors.push(ValidationError::MissingCredentials);
    }

    let prefix = &config.http.path_prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') {
        errors.push(ValidationError::InvalidPathPrefix(prefix.clone()));
    }
    // The prefix becomes part of an axum route template
    if prefix.contains(['{', '}', '*']) {
        errors.push(ValidationError::PathPrefixSyntax(prefix.clone()));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

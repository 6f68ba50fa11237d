//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable holding the API user identifier.
pub const ENV_USER_ID: &str = "UMAMI_API_USER_ID";
/// Environment variable holding the API client secret.
pub const ENV_SECRET: &str = "UMAMI_API_CLIENT_SECRET";
/// Environment variable holding the API endpoint URL.
pub const ENV_ENDPOINT: &str = "UMAMI_API_CLIENT_ENDPOINT";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "UMAMI_API_KEY";
/// Environment variable overriding the listener bind address.
pub const ENV_BIND_ADDRESS: &str = "PROXY_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ProxyConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
pub fn load_from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overwrite config fields with any non-empty values returned by `lookup`.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 5] = [
        (ENV_USER_ID, &mut config.api.user_id),
        (ENV_SECRET, &mut config.api.secret),
        (ENV_ENDPOINT, &mut config.api.endpoint),
        (ENV_API_KEY, &mut config.api.api_key),
        (ENV_BIND_ADDRESS, &mut config.listener.bind_address),
    ];

    for (key, field) in targets {
        if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
            tracing::debug!(key, "Applying environment override");
            *field = value;
        }
    }
}

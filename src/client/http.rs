//! HTTP implementation of the analytics API.
//!
//! # Responsibilities
//! - Build upstream URLs under the configured endpoint
//! - Attach credentials to every request
//! - Translate upstream statuses into `ClientError::Api`
//! - Bound every call with the configured timeout

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;

use crate::client::api::AnalyticsApi;
use crate::client::types::{ApiError, ClientError, ClientResult};
use crate::config::ApiConfig;

/// Header carrying the API key for hosted deployments.
pub const API_KEY_HEADER: &str = "x-umami-api-key";
/// Header carrying the acting user for self-hosted deployments.
pub const USER_ID_HEADER: &str = "x-umami-user-id";

/// Analytics API client over HTTP.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    config: ApiConfig,
    base_url: String,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// The endpoint is taken as-is; a trailing `/` is ignored.
    pub fn new(config: ApiConfig, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = config.endpoint.trim_end_matches('/').to_string();

        tracing::info!(
            endpoint = %base_url,
            timeout_secs = timeout.as_secs(),
            api_key = !config.api_key.is_empty(),
            "Analytics API client initialized"
        );

        Ok(Self {
            http,
            config,
            base_url,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        if !self.config.api_key.is_empty() {
            return req.header(API_KEY_HEADER, &self.config.api_key);
        }

        let mut req = req;
        if !self.config.secret.is_empty() {
            req = req.bearer_auth(&self.config.secret);
        }
        if !self.config.user_id.is_empty() {
            req = req.header(USER_ID_HEADER, &self.config.user_id);
        }
        req
    }

    async fn get(&self, path: &str, query: Option<&Value>) -> ClientResult<Value> {
        let mut req = self.http.get(self.url(path));
        if let Some(data) = query {
            req = req.query(&query_pairs(data));
        }
        self.send(path, req).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> ClientResult<Value> {
        let mut req = self.http.post(self.url(path));
        if let Some(data) = body.filter(|d| !d.is_null()) {
            req = req.json(data);
        }
        self.send(path, req).await
    }

    async fn delete(&self, path: &str) -> ClientResult<Value> {
        let req = self.http.delete(self.url(path));
        self.send(path, req).await
    }

    async fn send(&self, path: &str, req: RequestBuilder) -> ClientResult<Value> {
        let response = match self.authorize(req).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(path, error = %e, "Analytics API request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(path, status = status.as_u16(), "Analytics API returned error");
            return Err(ClientError::Api(ApiError::new(
                status.as_u16(),
                error_message(status, &text),
            )));
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("Unknown Error").to_string()
    } else {
        body.to_string()
    }
}

/// Flatten the scalar fields of a JSON object into query-string pairs.
///
/// Nested arrays and objects are skipped; nulls are dropped.
pub fn query_pairs(data: &Value) -> Vec<(String, String)> {
    let Some(map) = data.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), value))
        })
        .collect()
}

#[async_trait]
impl AnalyticsApi for ApiClient {
    async fn get_teams(&self) -> ClientResult<Value> {
        self.get("teams", None).await
    }

    async fn create_team(&self, data: Value) -> ClientResult<Value> {
        self.post("teams", Some(&data)).await
    }

    async fn join_team(&self, data: Value) -> ClientResult<Value> {
        self.post("teams/join", Some(&data)).await
    }

    async fn get_team(&self, team_id: &str) -> ClientResult<Value> {
        self.get(&format!("teams/{team_id}"), None).await
    }

    async fn update_team(&self, team_id: &str, data: Value) -> ClientResult<Value> {
        self.post(&format!("teams/{team_id}"), Some(&data)).await
    }

    async fn delete_team(&self, team_id: &str) -> ClientResult<Value> {
        self.delete(&format!("teams/{team_id}")).await
    }

    async fn get_team_users(&self, team_id: &str) -> ClientResult<Value> {
        self.get(&format!("teams/{team_id}/users"), None).await
    }

    async fn delete_team_user(&self, team_id: &str, user_id: &str) -> ClientResult<Value> {
        self.delete(&format!("teams/{team_id}/users/{user_id}")).await
    }

    async fn get_team_websites(&self, team_id: &str) -> ClientResult<Value> {
        self.get(&format!("teams/{team_id}/websites"), None).await
    }

    async fn create_team_websites(&self, team_id: &str, data: Value) -> ClientResult<Value> {
        self.post(&format!("teams/{team_id}/websites"), Some(&data)).await
    }

    async fn delete_team_website(&self, team_id: &str, website_id: &str) -> ClientResult<Value> {
        self.delete(&format!("teams/{team_id}/websites/{website_id}")).await
    }

    async fn get_websites(&self) -> ClientResult<Value> {
        self.get("websites", None).await
    }

    async fn create_website(&self, data: Value) -> ClientResult<Value> {
        self.post("websites", Some(&data)).await
    }

    async fn get_website(&self, website_id: &str) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}"), None).await
    }

    async fn update_website(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.post(&format!("websites/{website_id}"), Some(&data)).await
    }

    async fn delete_website(&self, website_id: &str) -> ClientResult<Value> {
        self.delete(&format!("websites/{website_id}")).await
    }

    async fn get_website_active(&self, website_id: &str) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/active"), None).await
    }

    async fn get_website_event_data(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/eventdata"), Some(&data)).await
    }

    async fn get_website_events(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/events"), Some(&data)).await
    }

    async fn get_website_metrics(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/metrics"), Some(&data)).await
    }

    async fn get_website_pageviews(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/pageviews"), Some(&data)).await
    }

    async fn reset_website(&self, website_id: &str) -> ClientResult<Value> {
        self.post(&format!("websites/{website_id}/reset"), None).await
    }

    async fn get_website_stats(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.get(&format!("websites/{website_id}/stats"), Some(&data)).await
    }

    async fn get_users(&self) -> ClientResult<Value> {
        self.get("users", None).await
    }

    async fn create_user(&self, data: Value) -> ClientResult<Value> {
        self.post("users", Some(&data)).await
    }

    async fn get_user(&self, user_id: &str) -> ClientResult<Value> {
        self.get(&format!("users/{user_id}"), None).await
    }

    async fn update_user(&self, user_id: &str, data: Value) -> ClientResult<Value> {
        self.post(&format!("users/{user_id}"), Some(&data)).await
    }

    async fn delete_user(&self, user_id: &str) -> ClientResult<Value> {
        self.delete(&format!("users/{user_id}")).await
    }

    async fn update_user_password(&self, user_id: &str, data: Value) -> ClientResult<Value> {
        self.post(&format!("users/{user_id}/password"), Some(&data)).await
    }

    async fn get_user_websites(&self, user_id: &str) -> ClientResult<Value> {
        self.get(&format!("users/{user_id}/websites"), None).await
    }

    async fn get_user_teams(&self, user_id: &str) -> ClientResult<Value> {
        self.get(&format!("users/{user_id}/teams"), None).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("endpoint", &self.base_url)
            .field("user_id", &self.config.user_id)
            .finish()
    }
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the query handler mounted under the prefix
//! - Wire up middleware (tracing, limits, timeouts, request ID)
//! - Turn query string or JSON body into request data
//! - Dispatch requests to the routing engine and run the resolved query
//! - Observability (metrics, request IDs)

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, Query as QueryString, State},
    http::{HeaderMap, Method},
    response::Response,
    routing::{any, get},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::client::{AnalyticsApi, ClientError};
use crate::config::ProxyConfig;
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response;
use crate::lifecycle::{shutdown, signals};
use crate::observability::metrics;
use crate::routing::Router as ApiRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ApiRouter>,
}

/// HTTP server for the analytics proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given API client.
    pub fn new(config: ProxyConfig, client: Arc<dyn AnalyticsApi>) -> Self {
        let state = AppState {
            router: Arc::new(ApiRouter::new(client)),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = &config.http.path_prefix;

        Router::new()
            .route("/health", get(health_handler))
            .route(&format!("{prefix}/{{*url}}"), any(query_handler))
            .fallback(not_found_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.http.max_body_size))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// Run the server until `shutdown` fires or a termination signal arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.http.path_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown::wait(shutdown_rx) => tracing::info!("Shutdown requested"),
                    _ = signals::wait_for_signal() => {}
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The composed router, for serving in-process.
    pub fn into_router(self) -> Router {
        self.router
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn not_found_handler() -> Response {
    response::not_found()
}

/// Resolve the path after the prefix and run the matching API call.
async fn query_handler(
    State(state): State<AppState>,
    Path(url): Path<String>,
    method: Method,
    QueryString(query): QueryString<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %url,
        "Routing request"
    );

    let data = match request_data(&method, query, &body) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(request_id = %request_id, path = %url, error = %e, "Malformed JSON body");
            metrics::record_request("none", method.as_str(), 400, start_time);
            return response::bad_request();
        }
    };

    let query = match state.router.resolve(&url, &method, data) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %url, error = %e, "No route matched");
            let response = response::route_error(&e);
            metrics::record_request("none", method.as_str(), response.status().as_u16(), start_time);
            return response;
        }
    };

    let route = query.route();
    let response = match query.run().await {
        Ok(data) => response::ok(data),
        Err(e) => {
            match &e {
                ClientError::Api(api) => {
                    tracing::debug!(request_id = %request_id, route, status = api.status, "API returned error");
                }
                ClientError::Transport(_) | ClientError::Decode(_) => {
                    tracing::error!(request_id = %request_id, route, error = %e, "Upstream error");
                    metrics::record_upstream_error(route);
                }
                ClientError::MissingParam(_) => {
                    tracing::error!(request_id = %request_id, route, error = %e, "Route handler misconfigured");
                }
            }
            response::client_error(&e)
        }
    };

    let status = response.status().as_u16();
    tracing::debug!(request_id = %request_id, route, status, "Request complete");
    metrics::record_request(route, method.as_str(), status, start_time);

    response
}

/// Query-string pairs for reads and deletes, the JSON body otherwise.
///
/// Missing data is `null`.
pub fn request_data(
    method: &Method,
    query: BTreeMap<String, String>,
    body: &[u8],
) -> Result<Value, serde_json::Error> {
    if method == Method::GET || method == Method::DELETE || method == Method::HEAD {
        if query.is_empty() {
            return Ok(Value::Null);
        }
        let map = query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        return Ok(Value::Object(map));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_data_from_query() {
        let mut query = BTreeMap::new();
        query.insert("startAt".to_string(), "1".to_string());
        query.insert("endAt".to_string(), "2".to_string());

        let data = request_data(&Method::GET, query, b"ignored").unwrap();
        assert_eq!(data, json!({ "startAt": "1", "endAt": "2" }));

        let data = request_data(&Method::DELETE, BTreeMap::new(), b"").unwrap();
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn test_request_data_from_body() {
        let data = request_data(&Method::POST, BTreeMap::new(), br#"{"code":"abc"}"#).unwrap();
        assert_eq!(data, json!({ "code": "abc" }));

        let data = request_data(&Method::POST, BTreeMap::new(), b"  \n").unwrap();
        assert_eq!(data, Value::Null);

        assert!(request_data(&Method::POST, BTreeMap::new(), b"{not json").is_err());
    }
}

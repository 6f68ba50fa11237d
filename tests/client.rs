//! ApiClient tests against a mock analytics upstream.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use analytics_proxy::client::{AnalyticsApi, ApiClient, ClientError};
use analytics_proxy::config::ApiConfig;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde_json::{json, Value};

mod common;

/// What the upstream saw for one request.
#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Bytes,
}

type Log = Arc<Mutex<Vec<Seen>>>;

async fn upstream(State(log): State<Log>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let path = uri.path().to_string();
    log.lock().unwrap().push(Seen {
        method,
        uri: uri.to_string(),
        headers,
        body,
    });

    match path.as_str() {
        "/api/teams/404" => (StatusCode::NOT_FOUND, "").into_response(),
        "/api/teams/409" => (StatusCode::CONFLICT, "Team name taken").into_response(),
        "/api/websites/5/reset" => StatusCode::OK.into_response(),
        "/api/users/garbage" => (StatusCode::OK, "<html>").into_response(),
        "/api/websites/1/active" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            (StatusCode::OK, "[]").into_response()
        }
        _ => axum::Json(json!({ "ok": true, "path": path })).into_response(),
    }
}

async fn start_upstream() -> (String, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/{*path}", any(upstream))
        .with_state(log.clone());
    let addr = common::start_backend(app).await;
    (format!("http://{}/api/", addr), log)
}

fn client(endpoint: &str, api_key: &str) -> ApiClient {
    let config = ApiConfig {
        user_id: "user-1".into(),
        secret: "s3cret".into(),
        endpoint: endpoint.into(),
        api_key: api_key.into(),
    };
    ApiClient::new(config, Duration::from_secs(1)).unwrap()
}

fn last(log: &Log) -> Seen {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_get_with_api_key() {
    let (endpoint, log) = start_upstream().await;
    let api = client(&endpoint, "key-123");

    let data = api.get_team("7").await.unwrap();
    assert_eq!(data, json!({ "ok": true, "path": "/api/teams/7" }));

    let seen = last(&log);
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.headers["x-umami-api-key"], "key-123");
    assert!(seen.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_secret_and_user_id_without_api_key() {
    let (endpoint, log) = start_upstream().await;
    let api = client(&endpoint, "");

    api.get_users().await.unwrap();

    let seen = last(&log);
    assert_eq!(seen.headers["authorization"], "Bearer s3cret");
    assert_eq!(seen.headers["x-umami-user-id"], "user-1");
    assert!(seen.headers.get("x-umami-api-key").is_none());
}

#[tokio::test]
async fn test_get_data_becomes_query_string() {
    let (endpoint, log) = start_upstream().await;
    let api = client(&endpoint, "k");

    api.get_website_stats("7", json!({ "startAt": 1, "endAt": "2" }))
        .await
        .unwrap();

    let seen = last(&log);
    assert!(seen.uri.starts_with("/api/websites/7/stats?"));
    assert!(seen.uri.contains("startAt=1"));
    assert!(seen.uri.contains("endAt=2"));
}

#[tokio::test]
async fn test_writes_send_json_body() {
    let (endpoint, log) = start_upstream().await;
    let api = client(&endpoint, "k");

    api.update_user_password("2", json!({ "currentPassword": "a", "newPassword": "b" }))
        .await
        .unwrap();

    let seen = last(&log);
    assert_eq!(seen.method, Method::POST);
    assert!(seen.uri.ends_with("/api/users/2/password"));
    let body: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(body, json!({ "currentPassword": "a", "newPassword": "b" }));

    api.delete_team_website("1", "3").await.unwrap();
    let seen = last(&log);
    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.uri, "/api/teams/1/websites/3");
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let (endpoint, _) = start_upstream().await;
    let api = client(&endpoint, "k");

    assert_eq!(api.reset_website("5").await.unwrap(), Value::Null);
}

#[tokio::test]
async fn test_error_statuses() {
    let (endpoint, _) = start_upstream().await;
    let api = client(&endpoint, "k");

    match api.get_team("409").await {
        Err(ClientError::Api(e)) => {
            assert_eq!(e.status, 409);
            assert_eq!(e.message, "Team name taken");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    match api.delete_team("404").await {
        Err(ClientError::Api(e)) => {
            assert_eq!(e.status, 404);
            assert_eq!(e.message, "Not Found");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(api.get_user("garbage").await, Err(ClientError::Decode(_))));
}

#[tokio::test]
async fn test_timeout_and_unreachable_are_transport_errors() {
    let (endpoint, _) = start_upstream().await;
    let api = client(&endpoint, "k");
    assert!(matches!(api.get_website_active("1").await, Err(ClientError::Transport(_))));

    // Nothing listens on port 1
    let api = client("http://127.0.0.1:1/api", "k");
    assert!(matches!(api.get_websites().await, Err(ClientError::Transport(_))));
}

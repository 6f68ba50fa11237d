//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use analytics_proxy::client::{AnalyticsApi, ApiError, ClientError, ClientResult};
use analytics_proxy::config::ProxyConfig;
use analytics_proxy::http::HttpServer;
use analytics_proxy::lifecycle::Shutdown;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// One recorded call against the API.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
    pub data: Value,
}

/// How the mock answers every call.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Echo the call back as `{ method, args, data }`.
    Echo,
    Api(u16, &'static str),
    Transport,
    /// Echo, but only after sleeping.
    Slow(Duration),
}

/// An `AnalyticsApi` that records calls instead of making them.
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
    reply: Reply,
}

impl RecordingApi {
    pub fn new() -> Arc<Self> {
        Self::with_reply(Reply::Echo)
    }

    pub fn with_reply(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            reply,
        })
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.lock().unwrap().last().cloned()
    }

    async fn record(&self, method: &'static str, args: &[&str], data: Value) -> ClientResult<Value> {
        let call = Call {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
            data,
        };
        self.calls.lock().unwrap().push(call.clone());

        if let Reply::Slow(delay) = self.reply {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            Reply::Echo | Reply::Slow(_) => Ok(json!({
                "method": call.method,
                "args": call.args,
                "data": call.data,
            })),
            Reply::Api(status, message) => Err(ClientError::Api(ApiError::new(*status, *message))),
            Reply::Transport => Err(ClientError::Transport("connection refused".into())),
        }
    }
}

#[async_trait]
impl AnalyticsApi for RecordingApi {
    async fn get_teams(&self) -> ClientResult<Value> {
        self.record("getTeams", &[], Value::Null).await
    }
    async fn create_team(&self, data: Value) -> ClientResult<Value> {
        self.record("createTeam", &[], data).await
    }
    async fn join_team(&self, data: Value) -> ClientResult<Value> {
        self.record("joinTeam", &[], data).await
    }
    async fn get_team(&self, team_id: &str) -> ClientResult<Value> {
        self.record("getTeam", &[team_id], Value::Null).await
    }
    async fn update_team(&self, team_id: &str, data: Value) -> ClientResult<Value> {
        self.record("updateTeam", &[team_id], data).await
    }
    async fn delete_team(&self, team_id: &str) -> ClientResult<Value> {
        self.record("deleteTeam", &[team_id], Value::Null).await
    }
    async fn get_team_users(&self, team_id: &str) -> ClientResult<Value> {
        self.record("getTeamUsers", &[team_id], Value::Null).await
    }
    async fn delete_team_user(&self, team_id: &str, user_id: &str) -> ClientResult<Value> {
        self.record("deleteTeamUser", &[team_id, user_id], Value::Null).await
    }
    async fn get_team_websites(&self, team_id: &str) -> ClientResult<Value> {
        self.record("getTeamWebsites", &[team_id], Value::Null).await
    }
    async fn create_team_websites(&self, team_id: &str, data: Value) -> ClientResult<Value> {
        self.record("createTeamWebsites", &[team_id], data).await
    }
    async fn delete_team_website(&self, team_id: &str, website_id: &str) -> ClientResult<Value> {
        self.record("deleteTeamWebsite", &[team_id, website_id], Value::Null).await
    }
    async fn get_websites(&self) -> ClientResult<Value> {
        self.record("getWebsites", &[], Value::Null).await
    }
    async fn create_website(&self, data: Value) -> ClientResult<Value> {
        self.record("createWebsite", &[], data).await
    }
    async fn get_website(&self, website_id: &str) -> ClientResult<Value> {
        self.record("getWebsite", &[website_id], Value::Null).await
    }
    async fn update_website(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("updateWebsite", &[website_id], data).await
    }
    async fn delete_website(&self, website_id: &str) -> ClientResult<Value> {
        self.record("deleteWebsite", &[website_id], Value::Null).await
    }
    async fn get_website_active(&self, website_id: &str) -> ClientResult<Value> {
        self.record("getWebsiteActive", &[website_id], Value::Null).await
    }
    async fn get_website_event_data(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("getWebsiteEventData", &[website_id], data).await
    }
    async fn get_website_events(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("getWebsiteEvents", &[website_id], data).await
    }
    async fn get_website_metrics(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("getWebsiteMetrics", &[website_id], data).await
    }
    async fn get_website_pageviews(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("getWebsitePageviews", &[website_id], data).await
    }
    async fn reset_website(&self, website_id: &str) -> ClientResult<Value> {
        self.record("resetWebsite", &[website_id], Value::Null).await
    }
    async fn get_website_stats(&self, website_id: &str, data: Value) -> ClientResult<Value> {
        self.record("getWebsiteStats", &[website_id], data).await
    }
    async fn get_users(&self) -> ClientResult<Value> {
        self.record("getUsers", &[], Value::Null).await
    }
    async fn create_user(&self, data: Value) -> ClientResult<Value> {
        self.record("createUser", &[], data).await
    }
    async fn get_user(&self, user_id: &str) -> ClientResult<Value> {
        self.record("getUser", &[user_id], Value::Null).await
    }
    async fn update_user(&self, user_id: &str, data: Value) -> ClientResult<Value> {
        self.record("updateUser", &[user_id], data).await
    }
    async fn delete_user(&self, user_id: &str) -> ClientResult<Value> {
        self.record("deleteUser", &[user_id], Value::Null).await
    }
    async fn update_user_password(&self, user_id: &str, data: Value) -> ClientResult<Value> {
        self.record("updateUserPassword", &[user_id], data).await
    }
    async fn get_user_websites(&self, user_id: &str) -> ClientResult<Value> {
        self.record("getUserWebsites", &[user_id], Value::Null).await
    }
    async fn get_user_teams(&self, user_id: &str) -> ClientResult<Value> {
        self.record("getUserTeams", &[user_id], Value::Null).await
    }
}

/// Start the proxy on an ephemeral port over `api`.
///
/// Returns the bound address and the shutdown handle that stops it.
pub async fn start_proxy(api: Arc<dyn AnalyticsApi>) -> (SocketAddr, Shutdown) {
    let mut config = ProxyConfig::default();
    config.api.api_key = "test-key".into();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, api);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Start an axum app on an ephemeral port, returning its address.
pub async fn start_backend(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}

/// A reqwest client that never reuses connections or goes through a proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

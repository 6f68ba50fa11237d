//! Analytics API proxy library.
//!
//! Maps `{prefix}/<path>` requests onto calls of an analytics management
//! API (teams, websites, users) and relays the result.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use client::{AnalyticsApi, ApiClient};
pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Router;

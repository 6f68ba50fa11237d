//! Analytics API client subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables / config file (user id, secret, endpoint, API key)
//!     → http.rs (ApiClient: reqwest with timeout and credentials)
//!     → api.rs (AnalyticsApi trait object shared with the router)
//! ```
//!
//! # Security Constraints
//! - Credentials ONLY from config or environment
//! - Never log secrets or API keys
//! - All upstream calls have a configurable timeout

pub mod api;
pub mod http;
pub mod types;

pub use api::AnalyticsApi;
pub use http::ApiClient;
pub use types::{ApiError, ClientError, ClientResult};

//! The analytics management API surface consumed by the router.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::types::ClientResult;

/// One async method per resource action of the analytics API.
///
/// `data` arguments carry the request body for writes and the query
/// parameters for reads. Implementations return the upstream payload on
/// success and a [`ClientError`](crate::client::ClientError) otherwise.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    // Teams
    async fn get_teams(&self) -> ClientResult<Value>;
    async fn create_team(&self, data: Value) -> ClientResult<Value>;
    async fn join_team(&self, data: Value) -> ClientResult<Value>;
    async fn get_team(&self, team_id: &str) -> ClientResult<Value>;
    async fn update_team(&self, team_id: &str, data: Value) -> ClientResult<Value>;
    async fn delete_team(&self, team_id: &str) -> ClientResult<Value>;
    async fn get_team_users(&self, team_id: &str) -> ClientResult<Value>;
    async fn delete_team_user(&self, team_id: &str, user_id: &str) -> ClientResult<Value>;
    async fn get_team_websites(&self, team_id: &str) -> ClientResult<Value>;
    async fn create_team_websites(&self, team_id: &str, data: Value) -> ClientResult<Value>;
    async fn delete_team_website(&self, team_id: &str, website_id: &str) -> ClientResult<Value>;

    // Websites
    async fn get_websites(&self) -> ClientResult<Value>;
    async fn create_website(&self, data: Value) -> ClientResult<Value>;
    async fn get_website(&self, website_id: &str) -> ClientResult<Value>;
    async fn update_website(&self, website_id: &str, data: Value) -> ClientResult<Value>;
    async fn delete_website(&self, website_id: &str) -> ClientResult<Value>;
    async fn get_website_active(&self, website_id: &str) -> ClientResult<Value>;
    async fn get_website_event_data(&self, website_id: &str, data: Value) -> ClientResult<Value>;
    async fn get_website_events(&self, website_id: &str, data: Value) -> ClientResult<Value>;
    async fn get_website_metrics(&self, website_id: &str, data: Value) -> ClientResult<Value>;
    async fn get_website_pageviews(&self, website_id: &str, data: Value) -> ClientResult<Value>;
    async fn reset_website(&self, website_id: &str) -> ClientResult<Value>;
    async fn get_website_stats(&self, website_id: &str, data: Value) -> ClientResult<Value>;

    // Users
    async fn get_users(&self) -> ClientResult<Value>;
    async fn create_user(&self, data: Value) -> ClientResult<Value>;
    async fn get_user(&self, user_id: &str) -> ClientResult<Value>;
    async fn update_user(&self, user_id: &str, data: Value) -> ClientResult<Value>;
    async fn delete_user(&self, user_id: &str) -> ClientResult<Value>;
    async fn update_user_password(&self, user_id: &str, data: Value) -> ClientResult<Value>;
    async fn get_user_websites(&self, user_id: &str) -> ClientResult<Value>;
    async fn get_user_teams(&self, user_id: &str) -> ClientResult<Value>;
}

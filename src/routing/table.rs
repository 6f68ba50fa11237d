//! The standard route table.
//!
//! Each handler is a one-line delegation to the [`AnalyticsApi`] method of
//! the same name. Updates are `POST`, as the upstream API expects.

use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;

use crate::client::AnalyticsApi;
use crate::routing::matcher::PathParams;
use crate::routing::router::{HandlerFuture, Route, RouteTable};

type Api = Arc<dyn AnalyticsApi>;

impl RouteTable {
    /// The fixed table of teams, websites and users routes.
    ///
    /// `teams/join` precedes `teams/{id}` so the literal wins ties.
    pub fn standard() -> Self {
        Self::new(vec![
            Route::new("teams", "teams").get(get_teams).post(create_team),
            Route::new("teams.join", "teams/join").post(join_team),
            Route::new("team", "teams/{id}")
                .get(get_team)
                .post(update_team)
                .delete(delete_team),
            Route::new("team.users", "teams/{id}/users").get(get_team_users),
            Route::new("team.user", "teams/{team_id}/users/{user_id}").delete(delete_team_user),
            Route::new("team.websites", "teams/{id}/websites")
                .get(get_team_websites)
                .post(create_team_websites),
            Route::new("team.website", "teams/{team_id}/websites/{website_id}")
                .delete(delete_team_website),
            Route::new("websites", "websites").get(get_websites).post(create_website),
            Route::new("website", "websites/{id}")
                .get(get_website)
                .post(update_website)
                .delete(delete_website),
            Route::new("website.active", "websites/{id}/active").get(get_website_active),
            Route::new("website.eventdata", "websites/{id}/eventdata").get(get_website_event_data),
            Route::new("website.events", "websites/{id}/events").get(get_website_events),
            Route::new("website.metrics", "websites/{id}/metrics").get(get_website_metrics),
            Route::new("website.pageviews", "websites/{id}/pageviews").get(get_website_pageviews),
            Route::new("website.reset", "websites/{id}/reset").post(reset_website),
            Route::new("website.stats", "websites/{id}/stats").get(get_website_stats),
            Route::new("users", "users").get(get_users).post(create_user),
            Route::new("user", "users/{id}")
                .get(get_user)
                .post(update_user)
                .delete(delete_user),
            Route::new("user.password", "users/{id}/password").post(update_user_password),
            Route::new("user.websites", "users/{id}/websites").get(get_user_websites),
            Route::new("user.teams", "users/{id}/teams").get(get_user_teams),
        ])
    }
}

// Teams

fn get_teams(api: Api, _: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_teams().await }.boxed()
}

fn create_team(api: Api, _: PathParams, data: Value) -> HandlerFuture {
    async move { api.create_team(data).await }.boxed()
}

fn join_team(api: Api, _: PathParams, data: Value) -> HandlerFuture {
    async move { api.join_team(data).await }.boxed()
}

fn get_team(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_team(params.require("id")?).await }.boxed()
}

fn update_team(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.update_team(params.require("id")?, data).await }.boxed()
}

fn delete_team(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.delete_team(params.require("id")?).await }.boxed()
}

fn get_team_users(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_team_users(params.require("id")?).await }.boxed()
}

fn delete_team_user(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move {
        let team_id = params.require("team_id")?;
        let user_id = params.require("user_id")?;
        api.delete_team_user(team_id, user_id).await
    }
    .boxed()
}

fn get_team_websites(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_team_websites(params.require("id")?).await }.boxed()
}

fn create_team_websites(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.create_team_websites(params.require("id")?, data).await }.boxed()
}

fn delete_team_website(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move {
        let team_id = params.require("team_id")?;
        let website_id = params.require("website_id")?;
        api.delete_team_website(team_id, website_id).await
    }
    .boxed()
}

// Websites

fn get_websites(api: Api, _: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_websites().await }.boxed()
}

fn create_website(api: Api, _: PathParams, data: Value) -> HandlerFuture {
    async move { api.create_website(data).await }.boxed()
}

fn get_website(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_website(params.require("id")?).await }.boxed()
}

fn update_website(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.update_website(params.require("id")?, data).await }.boxed()
}

fn delete_website(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.delete_website(params.require("id")?).await }.boxed()
}

fn get_website_active(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_website_active(params.require("id")?).await }.boxed()
}

fn get_website_event_data(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.get_website_event_data(params.require("id")?, data).await }.boxed()
}

fn get_website_events(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.get_website_events(params.require("id")?, data).await }.boxed()
}

fn get_website_metrics(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.get_website_metrics(params.require("id")?, data).await }.boxed()
}

fn get_website_pageviews(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.get_website_pageviews(params.require("id")?, data).await }.boxed()
}

fn reset_website(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.reset_website(params.require("id")?).await }.boxed()
}

fn get_website_stats(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.get_website_stats(params.require("id")?, data).await }.boxed()
}

// Users

fn get_users(api: Api, _: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_users().await }.boxed()
}

fn create_user(api: Api, _: PathParams, data: Value) -> HandlerFuture {
    async move { api.create_user(data).await }.boxed()
}

fn get_user(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_user(params.require("id")?).await }.boxed()
}

fn update_user(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.update_user(params.require("id")?, data).await }.boxed()
}

fn delete_user(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.delete_user(params.require("id")?).await }.boxed()
}

fn update_user_password(api: Api, params: PathParams, data: Value) -> HandlerFuture {
    async move { api.update_user_password(params.require("id")?, data).await }.boxed()
}

fn get_user_websites(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_user_websites(params.require("id")?).await }.boxed()
}

fn get_user_teams(api: Api, params: PathParams, _: Value) -> HandlerFuture {
    async move { api.get_user_teams(params.require("id")?).await }.boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_standard_table_shape() {
        let table = RouteTable::standard();
        assert_eq!(table.len(), 21);

        let (route, params) = table.find("teams/join").unwrap();
        assert_eq!(route.name(), "teams.join");
        assert!(params.is_empty());

        let (route, params) = table.find("teams/42").unwrap();
        assert_eq!(route.name(), "team");
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(route.methods(), vec![Method::GET, Method::POST, Method::DELETE]);
    }

    #[test]
    fn test_every_template_is_reachable() {
        // A route shadowed by an earlier one would never be selected
        let table = RouteTable::standard();
        for route in table.routes() {
            let path = route.pattern().template().replace("{id}", "7")
                .replace("{team_id}", "7")
                .replace("{user_id}", "8")
                .replace("{website_id}", "9");
            let (found, _) = table.find(&path).unwrap();
            assert_eq!(found.name(), route.name(), "path {path}");
        }
    }

    #[test]
    fn test_unknown_paths() {
        let table = RouteTable::standard();
        assert!(table.find("").is_none());
        assert!(table.find("team/7/users/8").is_none());
        assert!(table.find("websites/7/stats/extra").is_none());
        assert!(table.find("reports").is_none());
    }
}

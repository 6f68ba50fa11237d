//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in table order
//! - Resolve (path, method) to a deferred API call
//! - Return an explicit routing error rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan over the table, first match wins
//! - A matched route without a handler for the method is a 405, never a
//!   fall-through to later routes

use std::fmt;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use futures_util::future::BoxFuture;
use serde_json::Value;
use thiserror::Error;

use crate::client::{AnalyticsApi, ClientResult};
use crate::routing::matcher::{PathParams, PathPattern};

/// Future returned by a route handler.
pub type HandlerFuture = BoxFuture<'static, ClientResult<Value>>;

/// A route handler: one delegation to the analytics API.
pub type Handler = fn(Arc<dyn AnalyticsApi>, PathParams, Value) -> HandlerFuture;

/// A path pattern plus the handlers registered for it.
pub struct Route {
    name: &'static str,
    pattern: PathPattern,
    handlers: Vec<(Method, Handler)>,
}

impl Route {
    pub fn new(name: &'static str, template: &str) -> Self {
        Self {
            name,
            pattern: PathPattern::new(template),
            handlers: Vec::new(),
        }
    }

    /// Register `handler` for `method`, replacing any earlier registration.
    pub fn on(mut self, method: Method, handler: Handler) -> Self {
        self.handlers.retain(|(m, _)| *m != method);
        self.handlers.push((method, handler));
        self
    }

    pub fn get(self, handler: Handler) -> Self {
        self.on(Method::GET, handler)
    }

    pub fn post(self, handler: Handler) -> Self {
        self.on(Method::POST, handler)
    }

    pub fn put(self, handler: Handler) -> Self {
        self.on(Method::PUT, handler)
    }

    pub fn delete(self, handler: Handler) -> Self {
        self.on(Method::DELETE, handler)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Methods with a registered handler, in registration order.
    pub fn methods(&self) -> Vec<Method> {
        self.handlers.iter().map(|(m, _)| m.clone()).collect()
    }

    fn handler(&self, method: &Method) -> Option<Handler> {
        self.handlers
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, h)| *h)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("name", &self.name)
            .field("pattern", &self.pattern.template())
            .field("methods", &self.methods())
            .finish()
    }
}

/// Ordered list of routes. Earlier routes take precedence.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route whose pattern matches `path`, with its captured params.
    pub fn find(&self, path: &str) -> Option<(&Route, PathParams)> {
        self.routes
            .iter()
            .find_map(|route| route.pattern.match_path(path).map(|params| (route, params)))
    }
}

/// Why a request could not be routed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Not Found")]
    NotFound,

    #[error("Method Not Allowed")]
    MethodNotAllowed { allowed: Vec<Method> },
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::NotFound => StatusCode::NOT_FOUND,
            RouteError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// A resolved but not yet executed API call.
pub struct Query {
    route: &'static str,
    params: PathParams,
    data: Value,
    handler: Handler,
    client: Arc<dyn AnalyticsApi>,
}

impl Query {
    /// Name of the route that produced this query.
    pub fn route(&self) -> &'static str {
        self.route
    }

    pub fn params(&self) -> &PathParams {
        &self.params
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Perform the API call.
    pub async fn run(self) -> ClientResult<Value> {
        (self.handler)(self.client, self.params, self.data).await
    }
}

impl fmt::Debug for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("route", &self.route)
            .field("params", &self.params)
            .field("data", &self.data)
            .finish()
    }
}

/// Maps request paths and methods onto analytics API calls.
pub struct Router {
    table: RouteTable,
    client: Arc<dyn AnalyticsApi>,
}

impl Router {
    /// Create a router over the standard route table.
    pub fn new(client: Arc<dyn AnalyticsApi>) -> Self {
        Self::with_table(client, RouteTable::standard())
    }

    pub fn with_table(client: Arc<dyn AnalyticsApi>, table: RouteTable) -> Self {
        tracing::debug!(routes = table.len(), "Route table compiled");
        Self { table, client }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Resolve `path` and `method` to a deferred call carrying `data`.
    ///
    /// The API is not contacted until [`Query::run`] is awaited.
    pub fn resolve(&self, path: &str, method: &Method, data: Value) -> Result<Query, RouteError> {
        let Some((route, params)) = self.table.find(path) else {
            tracing::debug!(path, "No route matched");
            return Err(RouteError::NotFound);
        };

        let Some(handler) = route.handler(method) else {
            tracing::debug!(path, route = route.name, method = %method, "Method not registered on route");
            return Err(RouteError::MethodNotAllowed {
                allowed: route.methods(),
            });
        };

        tracing::debug!(path, route = route.name, method = %method, "Route matched");

        Ok(Query {
            route: route.name,
            params,
            data,
            handler,
            client: self.client.clone(),
        })
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("table", &self.table).finish()
    }
}

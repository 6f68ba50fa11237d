//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (path after prefix, method, data)
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (segment match, named params)
//!     → Return: deferred Query, or NotFound / MethodNotAllowed
//!
//! Route compilation (at startup):
//!     table.rs (standard route list)
//!     → compile path templates
//!     → freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex (segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (table order)

pub mod matcher;
pub mod router;
pub mod table;

pub use matcher::{PathParams, PathPattern};
pub use router::{Handler, HandlerFuture, Query, Route, RouteError, RouteTable, Router};

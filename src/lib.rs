//! Embeddable HTTP request router.
//!
//! A request is matched against a tree of path patterns, gated by method
//! filters; the most specific terminal handler runs with the path variables
//! bound on the way down.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod todos;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Handler, PathParams, RequestFilter, RouteRequest, Router};

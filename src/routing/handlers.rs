//! Stock terminal handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::params::PathParams;
use crate::routing::router::Handler;
use crate::routing::RouteRequest;

/// Empty `404 Not Found`, typically mounted under `/**`.
pub fn not_found() -> impl Handler {
    |_req: &RouteRequest, _params: &PathParams| -> Response {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Empty `405 Method Not Allowed`, typically the node-level fallback behind
/// method filters.
pub fn method_not_allowed() -> impl Handler {
    |_req: &RouteRequest, _params: &PathParams| -> Response {
        StatusCode::METHOD_NOT_ALLOWED.into_response()
    }
}

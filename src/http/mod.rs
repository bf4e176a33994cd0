//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and propagated)
//!     → body buffered, routing::Router::route
//!     → handler response, or 404 when unhandled
//!     → response.rs helpers (JSON, error → status)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use response::{json_response, json_response_with_status, ApiError};
pub use server::{HttpServer, ServerError};

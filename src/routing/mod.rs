//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, buffered body)
//!     → router.rs (walk registrations in declaration order)
//!     → pattern.rs (match the unconsumed path, bind {variables})
//!     → filter.rs (method / predicate gate)
//!     → params.rs (merge bindings for the branch being explored)
//!     → Return: handler response, or None (unhandled)
//!
//! Tree Construction (at startup):
//!     register / filter / handle calls
//!     → patterns parsed and validated
//!     → check() rejects trees with bad patterns
//!     → Freeze behind Arc, read-only while serving
//! ```
//!
//! # Design Decisions
//! - Tree built at startup, immutable at runtime
//! - No regex in the matching path (segment comparison only)
//! - Deterministic: same input always reaches the same handler
//! - First match wins (declaration order), backtracking on failure

use axum::body::Bytes;
use axum::http::Request;

pub mod filter;
pub mod handlers;
pub mod params;
pub mod pattern;
pub mod router;

pub use filter::RequestFilter;
pub use params::{ParamRule, PathParams};
pub use pattern::{PathMatch, PathPattern, PathSegment, PatternError};
pub use router::{Handler, Router, RouterError};

/// A request as seen by the router: body already buffered.
pub type RouteRequest = Request<Bytes>;

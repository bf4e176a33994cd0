//! Request filters gating router registrations.
//!
//! # Responsibilities
//! - Accept or reject a request independently of its path
//! - Method filters for the common verbs
//!
//! # Design Decisions
//! - Method comparison is verbatim (case-sensitive)
//! - One filter per registration; no AND/OR combinators
//! - Stateless: a filter never looks at anything but the request

use std::fmt;
use std::sync::Arc;

use crate::routing::RouteRequest;

type PredicateFn = dyn Fn(&RouteRequest) -> bool + Send + Sync;

/// Predicate deciding whether a registration applies to a request.
#[derive(Clone)]
pub enum RequestFilter {
    /// Accepts every request.
    All,
    /// Accepts requests whose method is exactly this name.
    Method(String),
    /// Accepts requests for which the closure returns true.
    Predicate(Arc<PredicateFn>),
}

impl RequestFilter {
    pub fn all() -> Self {
        RequestFilter::All
    }

    pub fn method(name: impl Into<String>) -> Self {
        RequestFilter::Method(name.into())
    }

    pub fn get() -> Self {
        Self::method("GET")
    }

    pub fn put() -> Self {
        Self::method("PUT")
    }

    pub fn post() -> Self {
        Self::method("POST")
    }

    pub fn patch() -> Self {
        Self::method("PATCH")
    }

    pub fn delete() -> Self {
        Self::method("DELETE")
    }

    /// Filter on any other request attribute (headers, query, ...).
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&RouteRequest) -> bool + Send + Sync + 'static,
    {
        RequestFilter::Predicate(Arc::new(f))
    }

    /// Returns true if the request passes this filter.
    pub fn accepts(&self, req: &RouteRequest) -> bool {
        match self {
            RequestFilter::All => true,
            RequestFilter::Method(name) => req.method().as_str() == name,
            RequestFilter::Predicate(f) => f(req),
        }
    }
}

impl Default for RequestFilter {
    fn default() -> Self {
        RequestFilter::All
    }
}

impl fmt::Debug for RequestFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFilter::All => f.write_str("All"),
            RequestFilter::Method(name) => f.debug_tuple("Method").field(name).finish(),
            RequestFilter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

//! Router tree and recursive dispatch.
//!
//! # Responsibilities
//! - Hold ordered (filter, pattern, child) registrations per node
//! - Hold an optional terminal handler per node
//! - Walk the tree for a request, accumulating path parameters
//!
//! # Design Decisions
//! - Built once at startup, immutable while serving (shared via Arc, no locks)
//! - Registrations are tried in declaration order; first handled wins
//! - A node's own handler runs only when the consumed prefix equals the whole
//!   request path
//! - Each branch gets its own merged parameter map

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::routing::filter::RequestFilter;
use crate::routing::params::PathParams;
use crate::routing::pattern::{PathPattern, PatternError};
use crate::routing::RouteRequest;

/// Terminal request handler.
///
/// Implemented for every `Fn(&RouteRequest, &PathParams) -> Response`.
pub trait Handler: Send + Sync {
    fn call(&self, req: &RouteRequest, params: &PathParams) -> Response;
}

impl<F> Handler for F
where
    F: Fn(&RouteRequest, &PathParams) -> Response + Send + Sync,
{
    fn call(&self, req: &RouteRequest, params: &PathParams) -> Response {
        self(req, params)
    }
}

/// Router configuration failed.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route patterns: {}", join_errors(.0))]
    InvalidPatterns(Vec<PatternError>),
}

fn join_errors(errors: &[PatternError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A child router reachable when both filter and pattern accept the request.
#[derive(Debug)]
struct Registration {
    filter: RequestFilter,
    pattern: PathPattern,
    router: Router,
}

impl Registration {
    /// Match against the part of the path not consumed by ancestors.
    ///
    /// A prefix that is not found in the path (an empty literal consumed past
    /// its end) leaves the path as is.
    fn matches(&self, prefix: &str, req: &RouteRequest) -> Option<(String, PathParams)> {
        let path = req.uri().path();
        let remaining = path.replacen(prefix, "", 1);

        let m = self.pattern.match_path(&remaining)?;
        if !self.filter.accepts(req) {
            return None;
        }
        Some((m.matched, m.params))
    }
}

/// A node of the router tree.
#[derive(Default)]
pub struct Router {
    registrations: Vec<Registration>,
    handler: Option<Box<dyn Handler>>,
    errors: Vec<PatternError>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a child router under `pattern`.
    ///
    /// `configure` populates the child before it is attached. Returns `self`
    /// so sibling registrations can be chained. An invalid pattern is recorded
    /// and reported by [`Router::check`]; the child is not attached.
    pub fn register<F>(&mut self, pattern: &str, configure: F) -> &mut Self
    where
        F: FnOnce(&mut Router),
    {
        let mut child = Router::new();
        configure(&mut child);

        match PathPattern::parse(pattern) {
            Ok(pattern) => self.registrations.push(Registration {
                filter: RequestFilter::All,
                pattern,
                router: child,
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Rejected route pattern");
                self.errors.push(e);
                self.errors.append(&mut child.errors);
            }
        }
        self
    }

    /// Add a filtered branch that consumes no path and return it.
    pub fn filter(&mut self, filter: RequestFilter) -> &mut Router {
        let idx = self.registrations.len();
        self.registrations.push(Registration {
            filter,
            pattern: PathPattern::empty(),
            router: Router::new(),
        });
        &mut self.registrations[idx].router
    }

    /// Set this node's terminal handler, replacing any previous one.
    pub fn handle<H>(&mut self, handler: H)
    where
        H: Handler + 'static,
    {
        self.handler = Some(Box::new(handler));
    }

    /// Like [`Router::handle`] for closures returning anything that converts
    /// into a response.
    pub fn handle_fn<F, R>(&mut self, f: F)
    where
        F: Fn(&RouteRequest, &PathParams) -> R + Send + Sync + 'static,
        R: IntoResponse,
    {
        self.handle(move |req: &RouteRequest, params: &PathParams| {
            f(req, params).into_response()
        });
    }

    /// Report every pattern rejected anywhere in this tree.
    pub fn check(&self) -> Result<(), RouterError> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(RouterError::InvalidPatterns(errors))
        }
    }

    fn collect_errors(&self, out: &mut Vec<PatternError>) {
        out.extend(self.errors.iter().cloned());
        for registration in &self.registrations {
            registration.router.collect_errors(out);
        }
    }

    /// Dispatch a request from the root.
    ///
    /// Returns `None` if no node handled it.
    pub fn route(&self, req: &RouteRequest) -> Option<Response> {
        self.dispatch("", req, &PathParams::new())
    }

    /// Recursive dispatch below `prefix`, the path consumed by ancestors.
    pub fn dispatch(
        &self,
        prefix: &str,
        req: &RouteRequest,
        params: &PathParams,
    ) -> Option<Response> {
        for registration in &self.registrations {
            let Some((matched, fresh)) = registration.matches(prefix, req) else {
                continue;
            };

            let next_prefix = format!("{}{}", prefix, matched);
            let next_params = params.merged(&fresh);
            if let Some(response) = registration.router.dispatch(&next_prefix, req, &next_params) {
                return Some(response);
            }
        }

        let path = req.uri().path();
        match &self.handler {
            Some(handler) if prefix == path => {
                tracing::debug!(method = %req.method(), path = %path, "Handling request");
                Some(handler.call(req, params))
            }
            _ => None,
        }
    }

    /// Number of direct registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("registrations", &self.registrations)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handlers;
    use axum::body::Bytes;
    use axum::http::{HeaderMap, HeaderName, Request, StatusCode};

    fn request(method: &str, path: &str) -> RouteRequest {
        Request::builder()
            .method(method)
            .uri(path)
            .body(Bytes::new())
            .unwrap()
    }

    /// Responds with `status` and echoes every path parameter as a header.
    fn echo(status: StatusCode, body: &'static str) -> impl Handler {
        move |_req: &RouteRequest, params: &PathParams| {
            let mut response = (status, body).into_response();
            for (k, v) in params.iter() {
                let name: HeaderName = k.parse().unwrap();
                response.headers_mut().insert(name, v.parse().unwrap());
            }
            response
        }
    }

    async fn call(
        router: &Router,
        method: &str,
        path: &str,
    ) -> Option<(StatusCode, HeaderMap, String)> {
        let response = router.route(&request(method, path))?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        Some((status, headers, String::from_utf8(bytes.to_vec()).unwrap()))
    }

    async fn assert_routed(
        router: &Router,
        method: &str,
        path: &str,
        status: StatusCode,
        body: &str,
    ) -> HeaderMap {
        let (actual_status, headers, actual_body) = call(router, method, path)
            .await
            .unwrap_or_else(|| panic!("[{}:{}] not handled", method, path));
        assert_eq!(actual_status, status, "[{}:{}] wrong status", method, path);
        assert_eq!(actual_body, body, "[{}:{}] wrong body", method, path);
        headers
    }

    fn todo_router() -> Router {
        let mut router = Router::new();
        router
            .register("/api/todos", |todos| {
                todos.register("/{todoId}", |todo| {
                    todo.filter(RequestFilter::get())
                        .handle(echo(StatusCode::OK, "todo-id-handler"));
                    todo.handle(echo(StatusCode::METHOD_NOT_ALLOWED, "405:todo-id"));
                });

                todos
                    .filter(RequestFilter::get())
                    .handle(echo(StatusCode::OK, "todo-list-handler"));

                // exact /api/todos with any other method
                todos.handle(echo(StatusCode::METHOD_NOT_ALLOWED, "405:todo-list"));
            })
            .register("/**", |catch_all| {
                catch_all.handle(echo(StatusCode::NOT_FOUND, "404:catchAll global"));
            });
        router
    }

    #[tokio::test]
    async fn test_todo_routing_table() {
        let router = todo_router();
        assert!(router.check().is_ok());

        let not_allowed = StatusCode::METHOD_NOT_ALLOWED;
        let catch_all = "404:catchAll global";

        assert_routed(&router, "GET", "/api/todos", StatusCode::OK, "todo-list-handler").await;
        assert_routed(&router, "PATCH", "/api/todos", not_allowed, "405:todo-list").await;

        let headers =
            assert_routed(&router, "GET", "/api/todos/123-456", StatusCode::OK, "todo-id-handler")
                .await;
        assert_eq!(headers.get("todoid").unwrap(), "123-456");

        assert_routed(&router, "PATCH", "/api/todos/123-456", not_allowed, "405:todo-id").await;
        for path in ["/api/todos/123-456/not-existent", "/api/not-existent", "/not-existent"] {
            assert_routed(&router, "GET", path, StatusCode::NOT_FOUND, catch_all).await;
        }
    }

    #[tokio::test]
    async fn test_trailing_slash_falls_through_to_catch_all() {
        let router = todo_router();
        // `{todoId}` never binds an empty value.
        assert_routed(&router, "GET", "/api/todos/", StatusCode::NOT_FOUND, "404:catchAll global")
            .await;
    }

    #[tokio::test]
    async fn test_trailing_slash_pattern_needs_trailing_slash() {
        let mut router = Router::new();
        router.register("/api/todo/", |todo| {
            todo.handle_fn(|_: &RouteRequest, _: &PathParams| "todo");
        });

        // The exhausted path still matches the empty literal, but the consumed
        // prefix "/api/todo/" never equals "/api/todo".
        assert!(call(&router, "GET", "/api/todo").await.is_none());
        assert_routed(&router, "GET", "/api/todo/", StatusCode::OK, "todo").await;
    }

    #[tokio::test]
    async fn test_unmatched_returns_none() {
        let mut router = Router::new();
        router.register("/api", |api| {
            api.handle(handlers::not_found());
        });
        assert!(call(&router, "GET", "/other").await.is_none());
        assert!(call(&router, "GET", "/api/deeper").await.is_none());
        assert!(call(&router, "GET", "/api").await.is_some());
    }

    #[tokio::test]
    async fn test_first_declared_registration_wins() {
        let mut router = Router::new();
        router
            .register("/a/{x}", |r| r.handle_fn(|_: &RouteRequest, _: &PathParams| "first"))
            .register("/a/{y}", |r| r.handle_fn(|_: &RouteRequest, _: &PathParams| "second"))
            .register("/a/b", |r| r.handle_fn(|_: &RouteRequest, _: &PathParams| "third"));

        assert_routed(&router, "GET", "/a/b", StatusCode::OK, "first").await;
    }

    #[tokio::test]
    async fn test_handler_requires_exact_match() {
        let mut router = Router::new();
        router.register("/api", |api| {
            api.register("/items", |items| {
                items.filter(RequestFilter::post()).handle(handlers::not_found());
            });
            api.handle(handlers::method_not_allowed());
        });

        // The /items child rejects GET; /api must not answer for a longer path.
        assert!(call(&router, "GET", "/api/items").await.is_none());

        let (status, _, _) = call(&router, "GET", "/api").await.unwrap();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_parameters_do_not_leak_between_siblings() {
        let mut router = Router::new();
        router
            .register("/things/{id}", |thing| {
                // binds id=123, then fails deeper for /things/123/other
                thing.register("/detail", |d| d.handle(handlers::not_found()));
            })
            .register("/things", |things| {
                things.register("/**", |rest| {
                    rest.handle_fn(|_: &RouteRequest, params: &PathParams| {
                        format!("id={}", params.get("id").unwrap_or("none"))
                    });
                });
            });

        assert_routed(&router, "GET", "/things/123/other", StatusCode::OK, "id=none").await;
        assert_routed(&router, "GET", "/things/123/detail", StatusCode::NOT_FOUND, "").await;
    }

    #[tokio::test]
    async fn test_parameters_accumulate_down_the_tree() {
        let mut router = Router::new();
        router.register("/users/{user}", |user| {
            user.register("/posts/{post}", |post| {
                post.handle_fn(|_: &RouteRequest, params: &PathParams| {
                    format!(
                        "{}:{}",
                        params.get("user").unwrap_or("-"),
                        params.get("post").unwrap_or("-")
                    )
                });
            });
        });

        assert_routed(&router, "GET", "/users/bob/posts/7", StatusCode::OK, "bob:7").await;
    }

    #[tokio::test]
    async fn test_filter_returns_child() {
        let mut router = Router::new();
        router.register("/items", |items| {
            items
                .filter(RequestFilter::delete())
                .handle_fn(|_: &RouteRequest, _: &PathParams| "deleted");
            items.handle_fn(|_: &RouteRequest, _: &PathParams| "fallback");
            assert_eq!(items.len(), 1);
        });

        assert_routed(&router, "DELETE", "/items", StatusCode::OK, "deleted").await;
        assert_routed(&router, "GET", "/items", StatusCode::OK, "fallback").await;
    }

    #[tokio::test]
    async fn test_handle_overwrites_previous() {
        let mut router = Router::new();
        router.register("/x", |x| {
            x.handle(handlers::not_found());
            x.handle(handlers::method_not_allowed());
        });

        let (status, _, _) = call(&router, "GET", "/x").await.unwrap();
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_check_reports_nested_invalid_patterns() {
        let mut router = Router::new();
        router.register("/api", |api| {
            api.register("/{id", |_| {});
            api.register("/files/**/meta", |_| {});
        });
        router.register("/ok", |_| {});

        let err = router.check().unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("invalid route patterns: "));
        assert!(message.contains("'/{id'") && message.contains("'/files/**/meta'"));
        match err {
            RouterError::InvalidPatterns(errors) => assert_eq!(errors.len(), 2),
        }
        assert_eq!(router.len(), 2);
    }

    #[test]
    fn test_router_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Router>();
    }
}

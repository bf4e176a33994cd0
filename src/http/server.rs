//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Validate the route tree before serving
//! - Create the Axum app whose single fallback hands requests to the tree
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Buffer request bodies so handlers run synchronously
//! - Translate "unhandled" into 404 Not Found
//! - Serve with graceful shutdown

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;
use crate::routing::{Router, RouterError};

/// Errors preventing the server from starting or running.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("route tree rejected: {0}")]
    Routes(#[from] RouterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<Router>,
    pub max_body_bytes: usize,
}

/// HTTP server serving one route tree.
pub struct HttpServer {
    app: axum::Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a server for `router`. Fails if the tree holds invalid patterns.
    pub fn new(config: ServerConfig, router: Router) -> Result<Self, ServerError> {
        router.check()?;

        let state = AppState {
            router: Arc::new(router),
            max_body_bytes: config.limits.max_body_bytes,
        };
        let app = Self::build_app(&config, state);
        Ok(Self { app, config })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &ServerConfig, state: AppState) -> axum::Router {
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered app, e.g. for driving with `tower::ServiceExt`.
    pub fn app(&self) -> axum::Router {
        self.app.clone()
    }

    /// Run the server until Ctrl+C/SIGTERM or until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.app.into_make_service())
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {},
                    _ = shutdown.recv() => {
                        tracing::info!("Shutdown requested");
                    },
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Buffers the body, walks the route tree, answers 404 if nothing handled it.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&request).to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
            metrics::record_request(&method, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };
    let request = Request::from_parts(parts, bytes);

    let response = match state.router.route(&request) {
        Some(response) => response,
        None => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                "No route matched"
            );
            metrics::record_unhandled(&method);
            StatusCode::NOT_FOUND.into_response()
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start_time);
    response
}

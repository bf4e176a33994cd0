//! Shared utilities for integration tests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use route_tree::config::ServerConfig;
use route_tree::http::HttpServer;
use route_tree::todos::{self, TodoStore};
use tower::ServiceExt;

/// Config suitable for tests: loopback, short timeout.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.timeouts.request_secs = 5;
    config
}

/// A server over a fresh, empty todo store.
pub fn todo_server() -> HttpServer {
    HttpServer::new(test_config(), todos::routes(TodoStore::new())).unwrap()
}

/// Drive one request through the fully layered app.
#[allow(dead_code)]
pub async fn send(server: &HttpServer, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Response) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = server.app().oneshot(request).await.unwrap();
    (response.status(), response)
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn text_body(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

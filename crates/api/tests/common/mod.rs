//! Shared helpers for HTTP-level integration tests.
//!
//! The app is built over the in-memory store so the full router, validation,
//! and error mapping are exercised without a live database.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::Duration;
use tower::ServiceExt;

use bankd_api::config::Config;
use bankd_api::routes;
use bankd_api::service::AuthService;
use bankd_api::state::AppState;
use bankd_core::token::{TokenCodec, TOKEN_KEY_SIZE};
use bankd_db::store::AuthStore;
use bankd_db::MemoryStore;

/// Build a test `Config` with safe defaults and a fixed 32-byte key.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused".to_string(),
        token_symmetric_key: "0123456789abcdef0123456789abcdef".to_string(),
        access_token_duration: Duration::minutes(15),
        refresh_token_duration: Duration::hours(24),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
    }
}

/// Build the application router backed by a fresh in-memory store.
pub fn build_test_app() -> Router {
    let config = test_config();
    let codec =
        TokenCodec::new(config.token_symmetric_key.as_bytes()).expect("test key must be 32 bytes");
    assert_eq!(config.token_symmetric_key.len(), TOKEN_KEY_SIZE);

    let store: Arc<dyn AuthStore> = Arc::new(MemoryStore::new());
    let auth = Arc::new(AuthService::new(
        store,
        codec.clone(),
        config.access_token_duration,
        config.refresh_token_duration,
    ));

    routes::router(AppState {
        auth,
        codec,
        config: Arc::new(config),
    })
    // Requests never cross a socket here, so connect info is mocked.
    .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 0))))
}

/// Issue a GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Issue a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::USER_AGENT, "bankd-test/1.0")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body must be valid JSON")
}

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::handlers::auth;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the application router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(auth::create_user))
        .route("/users/login", post(auth::login_user))
        .route("/users/me", get(auth::me))
        .route("/tokens/renew_access", post(auth::renew_access_token))
        .with_state(state)
}

pub mod auth;
pub mod license;
pub mod subscription;
pub mod webhooks;

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::db::AppState;
use crate::error::AppError;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".into())
}

/// Every API route, unlayered. `main` adds tracing and CORS.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth::router())
        .nest("/api/license", license::router())
        .nest("/api/subscription", subscription::router())
        .nest("/api/payment", webhooks::router())
        .fallback(not_found)
}

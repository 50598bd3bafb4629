use axum::{routing::get, Router};

use crate::error::AppError;
use crate::server::AppState;

use super::health::{health, ready};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .fallback(not_found)
}

async fn not_found() -> AppError {
    AppError::NotFound("resource not found".to_string())
}

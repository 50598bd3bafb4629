//! Health and readiness endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::db::HealthResult;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: HealthResult,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
}

/// Probe the database and report the outcome. Returns 503 when the probe
/// fails so load balancers route around the instance, with the same body
/// shape either way.
pub async fn health(State(state): State<AppState>) -> Response {
    let database = state.db.check_health().await;

    let (status, label) = if database.healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    let body = HealthResponse {
        status: label.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    };

    (status, Json(body)).into_response()
}

/// Cheap readiness probe: reports whether a pool is currently established
/// without forcing initialization or touching the network.
pub async fn ready(State(state): State<AppState>) -> Response {
    let ready = state.db.is_established().await;

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(ReadyResponse { ready })).into_response()
}

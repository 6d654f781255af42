//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    /// Simulated model round-trip applied to every prediction
    prediction_latency_ms: u64,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: severity_core::constants::APP_NAME,
        version: env!("CARGO_PKG_VERSION"),
        prediction_latency_ms: state.predictor.latency().as_millis() as u64,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

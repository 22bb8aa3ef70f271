use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Background transcription runs holding the single-flight guard right now.
    pub transcriptions_in_flight: usize,
}

/// Liveness plus a view of the background transcription load. Needs no authentication.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            version: env!("CARGO_PKG_VERSION"),
            transcriptions_in_flight: state.orchestrator.in_flight_count(),
        }),
    )
}

use axum::extract::State;
use axum::http::StatusCode;

use crate::AppState;

/// Liveness check backed by a database round trip
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.db.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

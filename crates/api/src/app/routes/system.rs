use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use vendorguard_auth::RoleStore;

use crate::app::{AppState, dto::HealthResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// Public liveness probe: can the profile store be reached?
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.store().health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse { status: "healthy" })),
        Err(err) => {
            tracing::warn!(error = %err, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse { status: "unhealthy" }),
            )
        }
    }
}

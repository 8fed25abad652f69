use axum::{Extension, Json, Router, routing::get};

use vendorguard_auth::IdentityContext;

use crate::app::{AppState, dto::SessionResponse};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/session", get(current))
}

/// The caller's identity as resolved for this request.
pub async fn current(Extension(identity): Extension<IdentityContext>) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: identity.subject().to_string(),
        role: identity.role(),
    })
}

use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use vendorguard_auth::{IdentityContext, Role, assign_role};
use vendorguard_core::SubjectId;

use crate::app::{
    AppState,
    dto::{MessageResponse, RoleUpdateRequest},
    errors,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/admin/set-user-role", post(set_user_role))
}

/// Set a user's role. Only `sme` and `auditor` can be granted here.
pub async fn set_user_role(
    State(state): State<AppState>,
    Extension(actor): Extension<IdentityContext>,
    payload: Result<Json<RoleUpdateRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(update)) = payload else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "body must be a JSON object with user_id and role",
        );
    };

    let Ok(subject) = SubjectId::parse(update.user_id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_user_id", "user_id must not be empty");
    };

    let role = match update.role.parse::<Role>() {
        Ok(role) if role.is_assignable() => role,
        _ => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_role", "invalid role specified");
        }
    };

    tracing::info!(actor = %actor.subject(), subject = %subject, role = %role, "role update requested");

    match assign_role(state.store().as_ref(), &subject, role).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: format!("User role set to {role}"),
            }),
        )
            .into_response(),
        Err(err) => errors::assign_role_error_to_response(&err),
    }
}

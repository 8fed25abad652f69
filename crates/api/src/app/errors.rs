use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use vendorguard_auth::{AssignRoleError, AuthzError, FailureClass, SessionError};

/// Map a gate failure to a response.
///
/// 401 responses carry `WWW-Authenticate: Bearer`. A role mismatch also
/// reports the required and actual roles; roles are not secret.
pub fn session_error_to_response(err: &SessionError) -> Response {
    match (err.class(), err) {
        (FailureClass::Unauthenticated, _) => {
            let mut res = json_error(StatusCode::UNAUTHORIZED, err.code(), err.to_string());
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            res
        }
        (
            FailureClass::Forbidden,
            SessionError::Unauthorized(AuthzError::Forbidden { required, actual }),
        ) => (
            StatusCode::FORBIDDEN,
            axum::Json(json!({
                "error": err.code(),
                "message": err.to_string(),
                "required": required,
                "actual": actual,
            })),
        )
            .into_response(),
        (FailureClass::Forbidden, _) => json_error(StatusCode::FORBIDDEN, err.code(), err.to_string()),
    }
}

pub fn assign_role_error_to_response(err: &AssignRoleError) -> Response {
    match err {
        AssignRoleError::NotAssignable(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_role", "invalid role specified")
        }
        AssignRoleError::ProfileNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        // Store detail is logged where it happens; the caller gets the summary.
        AssignRoleError::Store(_) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            err.to_string(),
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

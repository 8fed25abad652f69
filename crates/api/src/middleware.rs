use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use vendorguard_auth::Guard;

use crate::app::{Gate, errors};

/// Per-route middleware state: the shared gate plus the route's guard.
#[derive(Clone)]
pub struct RouteGuard {
    gate: Arc<Gate>,
    guard: Arc<Guard>,
}

impl RouteGuard {
    pub fn new(gate: Arc<Gate>, guard: Guard) -> Self {
        Self {
            gate,
            guard: Arc::new(guard),
        }
    }
}

/// Authenticate and authorize the request before the handler runs.
///
/// On success the `IdentityContext` is inserted into request extensions for
/// handlers to extract.
pub async fn require_role(
    State(route): State<RouteGuard>,
    mut req: Request,
    next: Next,
) -> Response {
    let bearer = extract_bearer(req.headers()).map(str::to_owned);

    match route.gate.authenticate(bearer.as_deref(), &route.guard).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(err) => errors::session_error_to_response(&err),
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// Anything else (no header, non-UTF-8 value, another scheme, blank token)
/// yields `None`, which the gate treats as a missing credential.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let header = header.to_str().ok()?;

    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, header::AUTHORIZATION};

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer(&headers("Bearer a.b.c")), Some("a.b.c"));
        assert_eq!(extract_bearer(&headers("bearer  a.b.c ")), Some("a.b.c"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(extract_bearer(&headers("Bearer")), None);
        assert_eq!(extract_bearer(&headers("Bearer    ")), None);
    }

    #[test]
    fn non_utf8_header_is_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe.a.b").unwrap(),
        );
        assert_eq!(extract_bearer(&headers), None);
    }
}

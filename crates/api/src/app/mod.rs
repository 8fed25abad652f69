//! HTTP API application wiring (axum router + gate wiring).
//!
//! - `routes/`: HTTP handlers (one file per area)
//! - `dto.rs`: request/response bodies
//! - `errors.rs`: consistent error responses
//!
//! Guards are built once here and attached per route group with
//! `route_layer`, so every protected route states its required roles at
//! registration time.

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, middleware::from_fn_with_state};

use vendorguard_auth::{AccessGate, Guard, Hs256TokenVerifier, RoleStore, TokenVerifier};
use vendorguard_infra::{AppConfig, InMemoryRoleStore, RoleStoreConfig, SupabaseRoleStore};

use crate::middleware::{self, RouteGuard};

pub mod dto;
pub mod errors;
pub mod routes;

/// Gate over type-erased collaborators, so the router is independent of the
/// configured profile store.
pub type Gate = AccessGate<Arc<dyn TokenVerifier>, Arc<dyn RoleStore>>;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
}

impl AppState {
    pub fn new(verifier: Arc<dyn TokenVerifier>, store: Arc<dyn RoleStore>) -> Self {
        Self {
            gate: Arc::new(AccessGate::new(verifier, store)),
        }
    }

    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let verifier: Arc<dyn TokenVerifier> =
            Arc::new(Hs256TokenVerifier::new(config.verifier_config()));

        let store: Arc<dyn RoleStore> = match &config.role_store {
            RoleStoreConfig::Supabase(supabase) => Arc::new(
                SupabaseRoleStore::new(supabase).context("failed to build Supabase role store")?,
            ),
            RoleStoreConfig::InMemory { seed } => {
                tracing::warn!("using in-memory role store; profiles are not persisted");
                Arc::new(InMemoryRoleStore::seeded(seed.iter().cloned()))
            }
        };

        Ok(Self::new(verifier, store))
    }

    pub fn store(&self) -> &Arc<dyn RoleStore> {
        self.gate.store()
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(state: AppState) -> Router {
    let sme_or_auditor = RouteGuard::new(state.gate.clone(), Guard::sme_or_auditor());
    let admin = RouteGuard::new(state.gate.clone(), Guard::admin_only());

    Router::new()
        .merge(routes::system::router())
        .merge(
            routes::session::router()
                .route_layer(from_fn_with_state(sme_or_auditor, middleware::require_role)),
        )
        .merge(
            routes::admin::router()
                .route_layer(from_fn_with_state(admin, middleware::require_role)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;
    use vendorguard_auth::VerifierConfig;
    use vendorguard_core::SubjectId;

    fn app() -> Router {
        let store = InMemoryRoleStore::seeded([(SubjectId::parse("u1").unwrap(), "sme")]);
        build_app(AppState::new(
            Arc::new(Hs256TokenVerifier::new(VerifierConfig::new("secret"))),
            Arc::new(store),
        ))
    }

    #[tokio::test]
    async fn health_needs_no_credential() {
        let res = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn guarded_routes_reject_before_body_parsing() {
        let res = app()
            .oneshot(
                Request::post("/api/admin/set-user-role")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_paths_are_not_guarded() {
        let res = app()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

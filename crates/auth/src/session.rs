use crate::{
    credential::Credential,
    error::{AuthzError, SessionError},
    guard::Guard,
    identity::IdentityContext,
    resolver::RoleResolver,
    store::RoleStore,
    verifier::TokenVerifier,
};

/// The single entry point route handlers depend on.
///
/// Composes verification, role resolution and the route's guard:
///
/// 1. verify the bearer credential (failure: unauthenticated)
/// 2. resolve the subject's current role
/// 3. reject an unknown role (profile missing; the credential itself was fine)
/// 4. build the [`IdentityContext`]
/// 5. run the guard (failure: forbidden)
///
/// Holds no per-request state; one instance serves all requests.
#[derive(Debug, Clone)]
pub struct AccessGate<V, S> {
    verifier: V,
    resolver: RoleResolver<S>,
}

impl<V, S> AccessGate<V, S>
where
    V: TokenVerifier,
    S: RoleStore,
{
    pub fn new(verifier: V, store: S) -> Self {
        Self {
            verifier,
            resolver: RoleResolver::new(store),
        }
    }

    /// The profile store behind the resolver (for health probes and role
    /// administration).
    pub fn store(&self) -> &S {
        self.resolver.store()
    }

    /// Authenticate `bearer` and authorize it against `guard`.
    ///
    /// `None` (no `Authorization` header) and a blank token both fail as a
    /// missing credential.
    pub async fn authenticate(
        &self,
        bearer: Option<&str>,
        guard: &Guard,
    ) -> Result<IdentityContext, SessionError> {
        let credential = Credential::new(bearer.unwrap_or_default())?;
        let claims = self.verifier.verify(&credential)?;

        let subject = claims.subject().clone();
        let role = self.resolver.resolve_role(&subject).await;
        if role.is_unknown() {
            tracing::info!(subject = %subject, "access denied: no provisioned role");
            return Err(AuthzError::RoleUnknown.into());
        }

        let identity = IdentityContext::new(subject, role, credential);
        if let Err(err) = guard.check(&identity) {
            tracing::info!(
                subject = %identity.subject(),
                role = %role,
                required = %guard.required(),
                "access denied: role not permitted"
            );
            return Err(err.into());
        }

        tracing::debug!(subject = %identity.subject(), role = %role, "request authorized");
        Ok(identity)
    }
}

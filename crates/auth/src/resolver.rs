use vendorguard_core::SubjectId;

use crate::{
    roles::Role,
    store::{AccessLevel, RoleRecord, RoleStore, RoleStoreError},
};

/// Maps a subject to its current role.
///
/// Always reads through the privileged path: a subject must be able to learn
/// its own role even when ordinary visibility rules would hide the profile.
///
/// Fail-closed: a missing profile, a missing or unrecognized role value, or
/// any store fault resolves to [`Role::Unknown`]. Faults are logged and
/// swallowed here; callers never see them.
///
/// No caching. One store read per call, so a role change is visible on the
/// very next request.
#[derive(Debug, Clone)]
pub struct RoleResolver<S> {
    store: S,
}

impl<S> RoleResolver<S>
where
    S: RoleStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn resolve_role(&self, subject: &SubjectId) -> Role {
        match self.store.read_role(subject, AccessLevel::Privileged).await {
            Ok(Some(RoleRecord { role: Some(raw) })) => {
                let role = Role::parse_or_unknown(&raw);
                if role.is_unknown() {
                    tracing::warn!(subject = %subject, stored_role = %raw, "unrecognized role value in profile");
                }
                role
            }
            Ok(Some(RoleRecord { role: None })) => {
                tracing::info!(subject = %subject, "profile has no role");
                Role::Unknown
            }
            Ok(None) | Err(RoleStoreError::NotFound) => {
                tracing::info!(subject = %subject, "no profile for subject");
                Role::Unknown
            }
            Err(err) => {
                tracing::warn!(subject = %subject, error = %err, "role lookup failed");
                Role::Unknown
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubRoleStore;

    fn subject(s: &str) -> SubjectId {
        SubjectId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn resolves_stored_role() {
        let resolver = RoleResolver::new(StubRoleStore::with_roles(&[("u1", "auditor")]));
        assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Auditor);
    }

    #[tokio::test]
    async fn always_uses_privileged_path() {
        let store = StubRoleStore::with_roles(&[("u1", "sme")]);
        store.hide_from_restricted("u1");
        let resolver = RoleResolver::new(store);

        assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Sme);
        assert_eq!(resolver.store().levels(), vec![AccessLevel::Privileged]);
    }

    #[tokio::test]
    async fn missing_profile_or_field_is_unknown() {
        let store = StubRoleStore::with_roles(&[("u1", "sme")]);
        store.insert("u3", RoleRecord::default());
        let resolver = RoleResolver::new(store);

        assert_eq!(resolver.resolve_role(&subject("u2")).await, Role::Unknown);
        assert_eq!(resolver.resolve_role(&subject("u3")).await, Role::Unknown);
    }

    #[tokio::test]
    async fn unrecognized_value_is_unknown() {
        let resolver = RoleResolver::new(StubRoleStore::with_roles(&[("u1", "superuser")]));
        assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Unknown);
    }

    #[tokio::test]
    async fn store_faults_are_swallowed() {
        for err in [
            RoleStoreError::Unavailable("connection refused".into()),
            RoleStoreError::Status(500),
            RoleStoreError::Malformed("expected array".into()),
        ] {
            let store = StubRoleStore::with_roles(&[("u1", "admin")]);
            store.fail_with(err);
            let resolver = RoleResolver::new(store);
            assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Unknown);
        }
    }

    #[tokio::test]
    async fn not_cached_between_calls() {
        let resolver = RoleResolver::new(StubRoleStore::with_roles(&[("u1", "sme")]));
        assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Sme);

        resolver.store().insert("u1", RoleRecord::with_role("auditor"));
        assert_eq!(resolver.resolve_role(&subject("u1")).await, Role::Auditor);
        assert_eq!(resolver.store().reads(), 2);
    }
}

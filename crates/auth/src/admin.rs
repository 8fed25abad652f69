//! Role administration.

use thiserror::Error;

use vendorguard_core::SubjectId;

use crate::{
    roles::Role,
    store::{RoleStore, RoleStoreError},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssignRoleError {
    #[error("role '{0}' cannot be assigned")]
    NotAssignable(Role),

    #[error("user profile not found")]
    ProfileNotFound,

    #[error("failed to set user role")]
    Store(#[source] RoleStoreError),
}

/// Overwrite a subject's role in the profile store.
///
/// Only `sme` and `auditor` may be assigned. The write goes through the
/// privileged path; callers are expected to have passed an admin guard.
pub async fn assign_role<S>(
    store: &S,
    subject: &SubjectId,
    role: Role,
) -> Result<(), AssignRoleError>
where
    S: RoleStore + ?Sized,
{
    if !role.is_assignable() {
        return Err(AssignRoleError::NotAssignable(role));
    }

    match store.write_role(subject, role).await {
        Ok(()) => {
            tracing::info!(subject = %subject, role = %role, "role assigned");
            Ok(())
        }
        Err(RoleStoreError::NotFound) => Err(AssignRoleError::ProfileNotFound),
        Err(err) => {
            tracing::error!(subject = %subject, error = %err, "role assignment failed");
            Err(AssignRoleError::Store(err))
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
    async fn assigns_sme_and_auditor() {
        let store = StubRoleStore::with_roles(&[("u1", "sme")]);
        assign_role(&store, &subject("u1"), Role::Auditor).await.unwrap();
        assert_eq!(store.role_of("u1").as_deref(), Some("auditor"));
    }

    #[tokio::test]
    async fn refuses_admin_and_unknown() {
        let store = StubRoleStore::with_roles(&[("u1", "sme")]);
        for role in [Role::Admin, Role::Unknown] {
            assert_eq!(
                assign_role(&store, &subject("u1"), role).await,
                Err(AssignRoleError::NotAssignable(role))
            );
        }
        assert_eq!(store.role_of("u1").as_deref(), Some("sme"));
    }

    #[tokio::test]
    async fn missing_profile() {
        let store = StubRoleStore::default();
        assert_eq!(
            assign_role(&store, &subject("ghost"), Role::Sme).await,
            Err(AssignRoleError::ProfileNotFound)
        );
    }

    #[tokio::test]
    async fn store_fault_is_reported() {
        let store = StubRoleStore::with_roles(&[("u1", "sme")]);
        store.fail_with(RoleStoreError::Status(503));
        assert_eq!(
            assign_role(&store, &subject("u1"), Role::Auditor).await,
            Err(AssignRoleError::Store(RoleStoreError::Status(503)))
        );
    }
}

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::{error::AuthzError, identity::IdentityContext, roles::Role};

/// Per-route role predicate.
///
/// Built once at startup and shared by every request on the route. A guard
/// holds no state beyond its role set, so `check` is pure and may be called
/// concurrently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard {
    allowed: BTreeSet<Role>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GuardError {
    #[error("a guard must permit at least one role")]
    Empty,

    #[error("the unknown role cannot be permitted by a guard")]
    PermitsUnknown,
}

/// The role set a guard demanded, as reported in a `Forbidden` failure.
///
/// Roles are not secret, so this is safe to expose to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredRoles(Vec<Role>);

impl Guard {
    /// Accept identities whose role is any of `roles`.
    pub fn require_any_of(roles: impl IntoIterator<Item = Role>) -> Result<Self, GuardError> {
        let allowed: BTreeSet<Role> = roles.into_iter().collect();
        if allowed.is_empty() {
            return Err(GuardError::Empty);
        }
        if allowed.contains(&Role::Unknown) {
            return Err(GuardError::PermitsUnknown);
        }
        Ok(Self { allowed })
    }

    pub fn admin_only() -> Self {
        Self {
            allowed: BTreeSet::from([Role::Admin]),
        }
    }

    pub fn sme_or_auditor() -> Self {
        Self {
            allowed: BTreeSet::from([Role::Sme, Role::Auditor]),
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        !role.is_unknown() && self.allowed.contains(&role)
    }

    pub fn check(&self, identity: &IdentityContext) -> Result<(), AuthzError> {
        let actual = identity.role();
        // Unreachable through `AccessGate`, which rejects unknown roles first.
        if actual.is_unknown() {
            return Err(AuthzError::RoleUnknown);
        }
        if self.permits(actual) {
            Ok(())
        } else {
            Err(AuthzError::Forbidden {
                required: self.required(),
                actual,
            })
        }
    }

    pub fn required(&self) -> RequiredRoles {
        RequiredRoles(self.allowed.iter().copied().collect())
    }
}

impl From<Vec<Role>> for RequiredRoles {
    fn from(mut roles: Vec<Role>) -> Self {
        roles.sort();
        roles.dedup();
        Self(roles)
    }
}

impl core::fmt::Display for RequiredRoles {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, role) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            f.write_str(role.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::Credential;
    use proptest::prelude::*;
    use vendorguard_core::SubjectId;

    fn identity(role: Role) -> IdentityContext {
        IdentityContext::new(
            SubjectId::parse("u1").unwrap(),
            role,
            Credential::new("a.b.c").unwrap(),
        )
    }

    #[test]
    fn construction_rejects_empty_and_unknown() {
        assert_eq!(Guard::require_any_of(Vec::<Role>::new()), Err(GuardError::Empty));
        assert_eq!(
            Guard::require_any_of([Role::Admin, Role::Unknown]),
            Err(GuardError::PermitsUnknown)
        );
    }

    #[test]
    fn predefined_guards_match_explicit_construction() {
        assert_eq!(
            Guard::admin_only(),
            Guard::require_any_of([Role::Admin]).unwrap()
        );
        assert_eq!(
            Guard::sme_or_auditor(),
            Guard::require_any_of([Role::Auditor, Role::Sme, Role::Sme]).unwrap()
        );
    }

    #[test]
    fn admin_guard_reports_required_and_actual() {
        let err = Guard::admin_only().check(&identity(Role::Sme)).unwrap_err();
        assert_eq!(
            err,
            AuthzError::Forbidden {
                required: RequiredRoles::from(vec![Role::Admin]),
                actual: Role::Sme,
            }
        );
    }

    #[test]
    fn sme_or_auditor_guard() {
        let guard = Guard::sme_or_auditor();
        assert!(guard.check(&identity(Role::Sme)).is_ok());
        assert!(guard.check(&identity(Role::Auditor)).is_ok());
        assert!(guard.check(&identity(Role::Admin)).is_err());
        assert_eq!(guard.required().to_string(), "sme or auditor");
    }

    #[test]
    fn unknown_role_never_passes() {
        assert_eq!(
            Guard::sme_or_auditor().check(&identity(Role::Unknown)),
            Err(AuthzError::RoleUnknown)
        );
    }

    fn known_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Admin), Just(Role::Sme), Just(Role::Auditor)]
    }

    proptest! {
        /// Property: a guard accepts exactly the roles it was built with.
        #[test]
        fn accepts_iff_role_in_set(
            allowed in prop::collection::vec(known_role(), 1..4),
            actual in known_role(),
        ) {
            let guard = Guard::require_any_of(allowed.clone()).unwrap();
            let outcome = guard.check(&identity(actual));
            prop_assert_eq!(outcome.is_ok(), allowed.contains(&actual));
            if let Err(AuthzError::Forbidden { required, actual: reported }) = outcome {
                prop_assert_eq!(reported, actual);
                prop_assert_eq!(required, RequiredRoles::from(allowed));
            }
        }
    }
}

//! Role store contract.
//!
//! The profile store is external; this module only says what the gate needs
//! from it. Adapters live in `vendorguard-infra`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vendorguard_core::SubjectId;

use crate::roles::Role;

/// Trust level of a store lookup.
///
/// `Restricted` goes through the store's ordinary visibility rules (row-level
/// security). `Privileged` bypasses them and is reserved for trusted
/// server-side decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    Restricted,
    Privileged,
}

/// A profile row as far as the gate cares: just the role column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(default)]
    pub role: Option<String>,
}

impl RoleRecord {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleStoreError {
    /// No profile matched the subject (writes only; reads return `Ok(None)`).
    #[error("profile not found")]
    NotFound,

    #[error("role store unavailable: {0}")]
    Unavailable(String),

    #[error("role store returned status {0}")]
    Status(u16),

    #[error("malformed role store response: {0}")]
    Malformed(String),
}

#[async_trait::async_trait]
pub trait RoleStore: Send + Sync {
    /// Look up the profile for `subject` at the given trust level.
    ///
    /// `Ok(None)` means no profile exists (or none is visible at `level`).
    async fn read_role(
        &self,
        subject: &SubjectId,
        level: AccessLevel,
    ) -> Result<Option<RoleRecord>, RoleStoreError>;

    /// Overwrite the role of an existing profile. Always privileged.
    async fn write_role(&self, subject: &SubjectId, role: Role) -> Result<(), RoleStoreError>;

    /// Reachability probe on the restricted path.
    async fn health_check(&self) -> Result<(), RoleStoreError> {
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S> RoleStore for Arc<S>
where
    S: RoleStore + ?Sized,
{
    async fn read_role(
        &self,
        subject: &SubjectId,
        level: AccessLevel,
    ) -> Result<Option<RoleRecord>, RoleStoreError> {
        (**self).read_role(subject, level).await
    }

    async fn write_role(&self, subject: &SubjectId, role: Role) -> Result<(), RoleStoreError> {
        (**self).write_role(subject, role).await
    }

    async fn health_check(&self) -> Result<(), RoleStoreError> {
        (**self).health_check().await
    }
}

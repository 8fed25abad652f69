use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use vendorguard_auth::{AccessLevel, Role, RoleRecord, RoleStore, RoleStoreError};
use vendorguard_core::SubjectId;

/// In-memory profile store for tests/dev.
///
/// Profiles can be hidden from the restricted path to emulate row-level
/// security; privileged reads always see everything.
#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    profiles: RwLock<HashMap<SubjectId, RoleRecord>>,
    hidden_from_restricted: RwLock<HashSet<SubjectId>>,
}

impl InMemoryRoleStore {
    /// Build a store pre-populated with `(subject, role)` profiles.
    pub fn seeded<I, R>(profiles: I) -> Self
    where
        I: IntoIterator<Item = (SubjectId, R)>,
        R: Into<String>,
    {
        let profiles = profiles
            .into_iter()
            .map(|(subject, role)| (subject, RoleRecord::with_role(role)))
            .collect();
        Self {
            profiles: RwLock::new(profiles),
            hidden_from_restricted: RwLock::default(),
        }
    }

    /// Create or replace a profile row.
    pub fn upsert(&self, subject: SubjectId, record: RoleRecord) -> Result<(), RoleStoreError> {
        let mut map = self.profiles.write().map_err(|_| poisoned())?;
        map.insert(subject, record);
        Ok(())
    }

    pub fn remove(&self, subject: &SubjectId) -> Result<(), RoleStoreError> {
        let mut map = self.profiles.write().map_err(|_| poisoned())?;
        map.remove(subject);
        Ok(())
    }

    pub fn hide_from_restricted(&self, subject: SubjectId) -> Result<(), RoleStoreError> {
        let mut hidden = self.hidden_from_restricted.write().map_err(|_| poisoned())?;
        hidden.insert(subject);
        Ok(())
    }

    fn visible(&self, subject: &SubjectId, level: AccessLevel) -> Result<bool, RoleStoreError> {
        match level {
            AccessLevel::Privileged => Ok(true),
            AccessLevel::Restricted => {
                let hidden = self.hidden_from_restricted.read().map_err(|_| poisoned())?;
                Ok(!hidden.contains(subject))
            }
        }
    }
}

fn poisoned() -> RoleStoreError {
    RoleStoreError::Unavailable("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn read_role(
        &self,
        subject: &SubjectId,
        level: AccessLevel,
    ) -> Result<Option<RoleRecord>, RoleStoreError> {
        if !self.visible(subject, level)? {
            return Ok(None);
        }
        let map = self.profiles.read().map_err(|_| poisoned())?;
        Ok(map.get(subject).cloned())
    }

    async fn write_role(&self, subject: &SubjectId, role: Role) -> Result<(), RoleStoreError> {
        let mut map = self.profiles.write().map_err(|_| poisoned())?;
        let record = map.get_mut(subject).ok_or(RoleStoreError::NotFound)?;
        record.role = Some(role.as_str().to_string());
        Ok(())
    }
}

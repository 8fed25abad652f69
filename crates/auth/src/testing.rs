//! Test fixtures shared by the unit tests in this crate.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use vendorguard_core::SubjectId;

use crate::{
    roles::Role,
    store::{AccessLevel, RoleRecord, RoleStore, RoleStoreError},
};

pub const SECRET: &str = "test-jwt-secret";

pub fn now_plus(secs: i64) -> i64 {
    Utc::now().timestamp() + secs
}

pub fn mint(secret: &str, claims: serde_json::Value) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("failed to encode jwt")
}

/// Profile store double.
///
/// Records can be hidden from the restricted path to emulate row-level
/// security, and the whole store can be switched into a failing mode.
#[derive(Default)]
pub struct StubRoleStore {
    records: Mutex<HashMap<String, RoleRecord>>,
    hidden_from_restricted: Mutex<Vec<String>>,
    failure: Mutex<Option<RoleStoreError>>,
    reads: AtomicUsize,
    levels: Mutex<Vec<AccessLevel>>,
}

impl StubRoleStore {
    pub fn with_roles(entries: &[(&str, &str)]) -> Self {
        let store = Self::default();
        for (subject, role) in entries {
            store.insert(subject, RoleRecord::with_role(*role));
        }
        store
    }

    pub fn insert(&self, subject: &str, record: RoleRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(subject.to_string(), record);
    }

    pub fn hide_from_restricted(&self, subject: &str) {
        self.hidden_from_restricted
            .lock()
            .unwrap()
            .push(subject.to_string());
    }

    pub fn fail_with(&self, err: RoleStoreError) {
        *self.failure.lock().unwrap() = Some(err);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn levels(&self) -> Vec<AccessLevel> {
        self.levels.lock().unwrap().clone()
    }

    pub fn role_of(&self, subject: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(subject)
            .and_then(|r| r.role.clone())
    }
}

#[async_trait::async_trait]
impl RoleStore for StubRoleStore {
    async fn read_role(
        &self,
        subject: &SubjectId,
        level: AccessLevel,
    ) -> Result<Option<RoleRecord>, RoleStoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.levels.lock().unwrap().push(level);

        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        if level == AccessLevel::Restricted
            && self
                .hidden_from_restricted
                .lock()
                .unwrap()
                .iter()
                .any(|s| s == subject.as_str())
        {
            return Ok(None);
        }

        Ok(self.records.lock().unwrap().get(subject.as_str()).cloned())
    }

    async fn write_role(&self, subject: &SubjectId, role: Role) -> Result<(), RoleStoreError> {
        if let Some(err) = self.failure.lock().unwrap().clone() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap();
        match records.get_mut(subject.as_str()) {
            Some(record) => {
                record.role = Some(role.as_str().to_string());
                Ok(())
            }
            None => Err(RoleStoreError::NotFound),
        }
    }
}

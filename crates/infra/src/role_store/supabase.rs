//! Supabase-backed profile store.
//!
//! Talks to the `profiles` table through PostgREST. The access level picks
//! the API key: the anon key goes through row-level security, the
//! service-role key bypasses it.

use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;

use vendorguard_auth::{AccessLevel, Role, RoleRecord, RoleStore, RoleStoreError};
use vendorguard_core::SubjectId;

use crate::config::SupabaseConfig;

const PROFILES_PATH: &str = "/rest/v1/profiles";

pub struct SupabaseRoleStore {
    client: Client,
    profiles_url: String,
    anon_key: String,
    service_role_key: String,
}

impl SupabaseRoleStore {
    /// Build the store. Every request carries `config.request_timeout`.
    pub fn new(config: &SupabaseConfig) -> Result<Self, RoleStoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RoleStoreError::Unavailable(format!("http client: {e}")))?;

        Ok(Self {
            client,
            profiles_url: format!("{}{}", config.url.trim_end_matches('/'), PROFILES_PATH),
            anon_key: config.anon_key.clone(),
            service_role_key: config.service_role_key.clone(),
        })
    }

    fn key(&self, level: AccessLevel) -> &str {
        match level {
            AccessLevel::Restricted => &self.anon_key,
            AccessLevel::Privileged => &self.service_role_key,
        }
    }

    fn authorized(&self, request: RequestBuilder, level: AccessLevel) -> RequestBuilder {
        let key = self.key(level);
        request.header("apikey", key).bearer_auth(key)
    }

    async fn rows(response: Response) -> Result<Vec<RoleRecord>, RoleStoreError> {
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "profiles request rejected");
            return Err(RoleStoreError::Status(status.as_u16()));
        }
        response
            .json::<Vec<RoleRecord>>()
            .await
            .map_err(|e| RoleStoreError::Malformed(e.to_string()))
    }
}

impl core::fmt::Debug for SupabaseRoleStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SupabaseRoleStore")
            .field("profiles_url", &self.profiles_url)
            .finish_non_exhaustive()
    }
}

fn transport(err: reqwest::Error) -> RoleStoreError {
    tracing::debug!(timeout = err.is_timeout(), connect = err.is_connect(), "profiles request failed");
    if err.is_timeout() {
        RoleStoreError::Unavailable("request timed out".to_string())
    } else {
        RoleStoreError::Unavailable(err.to_string())
    }
}

fn id_filter(subject: &SubjectId) -> String {
    format!("eq.{subject}")
}

#[async_trait::async_trait]
impl RoleStore for SupabaseRoleStore {
    async fn read_role(
        &self,
        subject: &SubjectId,
        level: AccessLevel,
    ) -> Result<Option<RoleRecord>, RoleStoreError> {
        let request = self
            .client
            .get(&self.profiles_url)
            .query(&[("select", "role".to_string()), ("id", id_filter(subject))]);

        let response = self
            .authorized(request, level)
            .send()
            .await
            .map_err(transport)?;

        let mut rows = Self::rows(response).await?;
        match rows.len() {
            0 => Ok(None),
            1 => Ok(rows.pop()),
            n => Err(RoleStoreError::Malformed(format!(
                "expected at most one profile, got {n}"
            ))),
        }
    }

    async fn write_role(&self, subject: &SubjectId, role: Role) -> Result<(), RoleStoreError> {
        let request = self
            .client
            .patch(&self.profiles_url)
            .query(&[("id", id_filter(subject))])
            .header("Prefer", "return=representation")
            .json(&json!({ "role": role.as_str() }));

        let response = self
            .authorized(request, AccessLevel::Privileged)
            .send()
            .await
            .map_err(transport)?;

        if Self::rows(response).await?.is_empty() {
            return Err(RoleStoreError::NotFound);
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RoleStoreError> {
        let request = self
            .client
            .get(&self.profiles_url)
            .query(&[("select", "id"), ("limit", "1")]);

        let response = self
            .authorized(request, AccessLevel::Restricted)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RoleStoreError::Status(status.as_u16()))
        }
    }
}

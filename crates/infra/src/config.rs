//! Configuration loading and representation.
//!
//! Everything comes from environment variables. Secrets are redacted in
//! `Debug` output.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use vendorguard_auth::{AudiencePolicy, VerifierConfig};
use vendorguard_core::SubjectId;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_LEEWAY_SECS: u64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable {0} is missing or empty")]
    Missing(&'static str),

    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    pub service_role_key: String,
    /// Deadline applied to every profile store request.
    pub request_timeout: Duration,
}

impl core::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("anon_key", &"<redacted>")
            .field("service_role_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Which profile store backs role resolution.
#[derive(Debug, Clone)]
pub enum RoleStoreConfig {
    Supabase(SupabaseConfig),
    /// Process-local profiles, seeded from `ROLE_SEED` (`sub=role,...`).
    InMemory { seed: Vec<(SubjectId, String)> },
}

#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub audience_policy: AudiencePolicy,
    pub leeway_secs: u64,
    pub role_store: RoleStoreConfig,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("audience_policy", &self.audience_policy)
            .field("leeway_secs", &self.leeway_secs)
            .field("role_store", &self.role_store)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &'static str| lookup(var).filter(|v| !v.trim().is_empty());
        let require = |var: &'static str| get(var).ok_or(ConfigError::Missing(var));

        let bind_addr: SocketAddr = parse_or("BIND_ADDR", get("BIND_ADDR"), || {
            DEFAULT_BIND_ADDR
                .parse::<SocketAddr>()
                .map_err(|e| e.to_string())
        })?;

        let audience_policy = match get("JWT_AUDIENCE_POLICY") {
            None => AudiencePolicy::default(),
            Some(raw) => raw.parse().map_err(|reason| ConfigError::Invalid {
                var: "JWT_AUDIENCE_POLICY",
                reason,
            })?,
        };

        let leeway_secs = parse_or("JWT_LEEWAY_SECS", get("JWT_LEEWAY_SECS"), || {
            Ok(DEFAULT_LEEWAY_SECS)
        })?;

        let role_store = match get("ROLE_STORE").as_deref().map(str::trim) {
            None | Some("supabase") => {
                let timeout_ms = parse_or(
                    "ROLE_LOOKUP_TIMEOUT_MS",
                    get("ROLE_LOOKUP_TIMEOUT_MS"),
                    || Ok(DEFAULT_LOOKUP_TIMEOUT_MS),
                )?;
                RoleStoreConfig::Supabase(SupabaseConfig {
                    url: require("SUPABASE_URL")?,
                    anon_key: require("SUPABASE_ANON_KEY")?,
                    service_role_key: require("SUPABASE_SERVICE_ROLE_KEY")?,
                    request_timeout: Duration::from_millis(timeout_ms),
                })
            }
            Some("memory") => RoleStoreConfig::InMemory {
                seed: parse_seed(get("ROLE_SEED").as_deref().unwrap_or_default())?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "ROLE_STORE",
                    reason: format!("expected 'supabase' or 'memory', got '{other}'"),
                });
            }
        };

        Ok(Self {
            bind_addr,
            jwt_secret: require("SUPABASE_JWT_SECRET")?,
            audience_policy,
            leeway_secs,
            role_store,
        })
    }

    pub fn verifier_config(&self) -> VerifierConfig {
        VerifierConfig::new(self.jwt_secret.as_bytes())
            .with_audience_policy(self.audience_policy)
            .with_leeway_secs(self.leeway_secs)
    }
}

fn parse_or<T, D>(var: &'static str, raw: Option<String>, default: D) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
    D: FnOnce() -> Result<T, String>,
{
    match raw {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => default().map_err(|reason| ConfigError::Invalid { var, reason }),
    }
}

fn parse_seed(raw: &str) -> Result<Vec<(SubjectId, String)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let invalid = |reason: String| ConfigError::Invalid {
                var: "ROLE_SEED",
                reason,
            };
            let (subject, role) = entry
                .split_once('=')
                .ok_or_else(|| invalid(format!("expected 'subject=role', got '{entry}'")))?;
            let subject = SubjectId::parse(subject.trim()).map_err(|e| invalid(e.to_string()))?;
            Ok((subject, role.trim().to_string()))
        })
        .collect()
}

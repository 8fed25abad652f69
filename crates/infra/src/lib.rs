//! Infrastructure layer: profile store adapters and configuration.

pub mod config;
pub mod role_store;

pub use config::{AppConfig, ConfigError, RoleStoreConfig, SupabaseConfig};
pub use role_store::{InMemoryRoleStore, SupabaseRoleStore};

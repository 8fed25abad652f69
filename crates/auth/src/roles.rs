use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse authorization category of a principal.
///
/// The set is closed. `Unknown` is a sentinel meaning "no usable role was
/// found"; it is never a valid guard target and never reaches a handler.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Sme,
    Auditor,
    Unknown,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized role '{0}'")]
pub struct UnrecognizedRole(pub String);

impl Role {
    /// Every role a guard may target.
    pub const KNOWN: [Role; 3] = [Role::Admin, Role::Sme, Role::Auditor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sme => "sme",
            Role::Auditor => "auditor",
            Role::Unknown => "unknown",
        }
    }

    /// Map a stored role string to a role, failing closed.
    ///
    /// Matching is exact (case-sensitive). Anything unrecognized, including
    /// the literal `"unknown"`, yields [`Role::Unknown`].
    pub fn parse_or_unknown(raw: &str) -> Self {
        raw.parse().unwrap_or(Role::Unknown)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Role::Unknown)
    }

    /// Whether the role may be granted through role administration.
    ///
    /// Admins are provisioned out-of-band; only `sme` and `auditor` can be
    /// assigned through the API.
    pub fn is_assignable(&self) -> bool {
        matches!(self, Role::Sme | Role::Auditor)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: only the three real roles are accepted.
impl FromStr for Role {
    type Err = UnrecognizedRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::KNOWN
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnrecognizedRole(s.to_string()))
    }
}

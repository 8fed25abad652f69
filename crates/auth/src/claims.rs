use chrono::{DateTime, Utc};
use serde::{Deserialize, de::IgnoredAny};

use vendorguard_core::SubjectId;

use crate::error::AuthError;

/// Claims as they appear on the wire, before any of our own checks.
///
/// Everything is optional here so that a missing or non-string `sub`
/// surfaces as [`AuthError::MissingSubject`] rather than as a decode failure.
/// NumericDate allows fractional seconds, so `exp` is read as a float.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawClaims {
    #[serde(default)]
    pub sub: Option<RawSubject>,

    #[serde(default)]
    pub aud: Option<RawAudience>,

    #[serde(default)]
    pub exp: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawSubject {
    Text(String),
    Other(IgnoredAny),
}

/// `aud` may be a single string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAudience {
    Single(String),
    Many(Vec<String>),
}

/// Claims whose signature has been verified.
///
/// Only the token verifier can produce one of these; there is no public
/// constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedClaims {
    subject: SubjectId,
    audience: Vec<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl VerifiedClaims {
    pub(crate) fn from_raw(raw: RawClaims) -> Result<Self, AuthError> {
        let subject = match raw.sub {
            Some(RawSubject::Text(sub)) => SubjectId::parse(sub).ok(),
            Some(RawSubject::Other(_)) | None => None,
        }
        .ok_or(AuthError::MissingSubject)?;

        let audience = match raw.aud {
            None => Vec::new(),
            Some(RawAudience::Single(aud)) => vec![aud],
            Some(RawAudience::Many(auds)) => auds,
        };

        // An `exp` outside chrono's range cannot be checked, so it is rejected.
        let expires_at = match raw.exp {
            None => None,
            Some(exp) => Some(
                DateTime::from_timestamp(exp.trunc() as i64, 0)
                    .ok_or(AuthError::InvalidCredential)?,
            ),
        };

        Ok(Self {
            subject,
            audience,
            expires_at,
        })
    }

    /// Whether `exp` lies further in the past than `leeway_secs`.
    ///
    /// Tokens without `exp` never expire here.
    pub(crate) fn is_expired(&self, now: DateTime<Utc>, leeway_secs: u64) -> bool {
        let leeway = i64::try_from(leeway_secs).unwrap_or(i64::MAX);
        self.expires_at
            .is_some_and(|exp| exp.timestamp().saturating_add(leeway) < now.timestamp())
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Audience values carried by the token (empty when `aud` was absent).
    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

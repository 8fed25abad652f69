//! Bearer token verification (HS256, shared secret).

use core::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use crate::{
    claims::{RawClaims, VerifiedClaims},
    credential::Credential,
    error::AuthError,
};

/// Audience the identity provider stamps on end-user session tokens.
pub const AUTHENTICATED_AUDIENCE: &str = "authenticated";

/// How strictly the `aud` claim is enforced.
///
/// Verification always tries the audience-bound check first. Under
/// `Fallback`, a failure of that check is followed by exactly one retry
/// without the audience requirement, because the provider does not populate
/// `aud` consistently. `Required` stops after the first attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum AudiencePolicy {
    #[default]
    Fallback,
    Required,
}

impl FromStr for AudiencePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(AudiencePolicy::Fallback),
            "required" => Ok(AudiencePolicy::Required),
            other => Err(format!("expected 'fallback' or 'required', got '{other}'")),
        }
    }
}

/// Verifier settings.
#[derive(Clone)]
pub struct VerifierConfig {
    secret: Vec<u8>,
    audience_policy: AudiencePolicy,
    leeway_secs: u64,
}

impl VerifierConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            audience_policy: AudiencePolicy::default(),
            leeway_secs: 60,
        }
    }

    pub fn with_audience_policy(mut self, policy: AudiencePolicy) -> Self {
        self.audience_policy = policy;
        self
    }

    /// Clock skew tolerated when checking `exp`.
    pub fn with_leeway_secs(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }
}

impl core::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("secret", &"<redacted>")
            .field("audience_policy", &self.audience_policy)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Verifies a bearer credential and extracts its claims.
///
/// Implementations are synchronous and must not perform network I/O.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, credential: &Credential) -> Result<VerifiedClaims, AuthError>;
}

impl<T> TokenVerifier for Arc<T>
where
    T: TokenVerifier + ?Sized,
{
    fn verify(&self, credential: &Credential) -> Result<VerifiedClaims, AuthError> {
        (**self).verify(credential)
    }
}

/// HS256 verifier keyed by the identity provider's shared JWT secret.
pub struct Hs256TokenVerifier {
    key: DecodingKey,
    audience_bound: Validation,
    lenient: Option<Validation>,
    leeway_secs: u64,
}

impl Hs256TokenVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        let key = DecodingKey::from_secret(&config.secret);

        let mut audience_bound = Validation::new(Algorithm::HS256);
        audience_bound.leeway = config.leeway_secs;
        audience_bound.set_audience(&[AUTHENTICATED_AUDIENCE]);
        audience_bound.set_required_spec_claims(&["aud"]);

        let lenient = match config.audience_policy {
            AudiencePolicy::Required => None,
            AudiencePolicy::Fallback => {
                let mut lenient = Validation::new(Algorithm::HS256);
                lenient.leeway = config.leeway_secs;
                lenient.validate_aud = false;
                lenient.required_spec_claims.clear();
                Some(lenient)
            }
        };

        Self {
            key,
            audience_bound,
            lenient,
            leeway_secs: config.leeway_secs,
        }
    }
}

impl TokenVerifier for Hs256TokenVerifier {
    fn verify(&self, credential: &Credential) -> Result<VerifiedClaims, AuthError> {
        let token = credential.expose();

        let raw = match decode::<RawClaims>(token, &self.key, &self.audience_bound) {
            Ok(data) => data.claims,
            Err(first) => {
                tracing::debug!(
                    attempt = "audience",
                    error_kind = ?first.kind(),
                    "token verification failed"
                );

                let Some(lenient) = &self.lenient else {
                    return Err(AuthError::InvalidCredential);
                };

                match decode::<RawClaims>(token, &self.key, lenient) {
                    Ok(data) => data.claims,
                    Err(second) => {
                        tracing::debug!(
                            attempt = "no_audience",
                            error_kind = ?second.kind(),
                            "token verification failed"
                        );
                        return Err(AuthError::InvalidCredential);
                    }
                }
            }
        };

        let claims = VerifiedClaims::from_raw(raw)?;

        // jsonwebtoken only checks integral `exp` values.
        if claims.is_expired(Utc::now(), self.leeway_secs) {
            tracing::debug!(error_kind = "expired", "token verification failed");
            return Err(AuthError::InvalidCredential);
        }

        Ok(claims)
    }
}

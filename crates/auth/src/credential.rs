use crate::error::AuthError;

/// Opaque bearer credential, as presented by the caller.
///
/// Lives for one request and is never persisted. `Debug` output is redacted
/// so the token cannot leak into logs through `{:?}`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw bearer string. Empty or whitespace-only input counts as no
    /// credential at all.
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::MissingCredential);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// The raw token, for forwarding to collaborators acting on the caller's
    /// behalf. Never log this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Credential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

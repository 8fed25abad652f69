use vendorguard_core::SubjectId;

use crate::{credential::Credential, roles::Role};

/// The verified identity of a request.
///
/// Built exactly once per request by [`crate::AccessGate`] and never
/// mutated afterwards. It is not cached across requests: the role is
/// re-resolved every time because it can change between requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    subject: SubjectId,
    role: Role,
    credential: Credential,
}

impl IdentityContext {
    pub(crate) fn new(subject: SubjectId, role: Role, credential: Credential) -> Self {
        Self {
            subject,
            role,
            credential,
        }
    }

    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// The bearer credential the caller presented, for calls made on the
    /// caller's behalf.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

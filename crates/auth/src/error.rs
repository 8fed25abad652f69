//! Gate failure taxonomy.
//!
//! `Display` strings are safe to hand back to callers. Anything more
//! detailed (decode errors, store faults) is logged, never carried here.

use thiserror::Error;

use crate::{guard::RequiredRoles, roles::Role};

/// Authentication failed: the caller could not be identified.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing bearer credential")]
    MissingCredential,

    #[error("could not validate credentials or session expired")]
    InvalidCredential,

    #[error("credential does not identify a subject")]
    MissingSubject,
}

/// Authorization failed: the caller is known but may not proceed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// Valid identity, but no provisioned role (missing profile or store fault).
    #[error("user profile not found or access denied")]
    RoleUnknown,

    #[error("operation forbidden: required role {required}, actual role {actual}")]
    Forbidden { required: RequiredRoles, actual: Role },
}

/// How a failure should be surfaced by a transport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureClass {
    /// 401-class.
    Unauthenticated,
    /// 403-class.
    Forbidden,
}

/// Any failure of [`crate::AccessGate::authenticate`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Unauthenticated(#[from] AuthError),

    #[error(transparent)]
    Unauthorized(#[from] AuthzError),
}

impl SessionError {
    pub fn class(&self) -> FailureClass {
        match self {
            SessionError::Unauthenticated(_) => FailureClass::Unauthenticated,
            SessionError::Unauthorized(_) => FailureClass::Forbidden,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Unauthenticated(AuthError::MissingCredential) => "missing_credential",
            SessionError::Unauthenticated(AuthError::InvalidCredential) => "invalid_credential",
            SessionError::Unauthenticated(AuthError::MissingSubject) => "missing_subject",
            SessionError::Unauthorized(AuthzError::RoleUnknown) => "role_unknown",
            SessionError::Unauthorized(AuthzError::Forbidden { .. }) => "forbidden",
        }
    }
}

//! `vendorguard-auth` — the authentication/authorization gate.
//!
//! This crate is intentionally decoupled from HTTP and from any concrete
//! profile store. The only collaborator it needs is a [`RoleStore`].
//!
//! Request flow:
//!
//! ```text
//! bearer -> TokenVerifier -> subject -> RoleResolver -> role
//!        -> IdentityContext -> Guard -> handler
//! ```

pub mod admin;
pub mod claims;
pub mod credential;
pub mod error;
pub mod guard;
pub mod identity;
pub mod resolver;
pub mod roles;
pub mod session;
pub mod store;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::{AssignRoleError, assign_role};
pub use claims::VerifiedClaims;
pub use credential::Credential;
pub use error::{AuthError, AuthzError, FailureClass, SessionError};
pub use guard::{Guard, GuardError, RequiredRoles};
pub use identity::IdentityContext;
pub use resolver::RoleResolver;
pub use roles::{Role, UnrecognizedRole};
pub use session::AccessGate;
pub use store::{AccessLevel, RoleRecord, RoleStore, RoleStoreError};
pub use verifier::{
    AUTHENTICATED_AUDIENCE, AudiencePolicy, Hs256TokenVerifier, TokenVerifier, VerifierConfig,
};

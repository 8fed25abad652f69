//! `vendorguard-core` — shared domain primitives.
//!
//! No IO, no framework types. Every other crate in the workspace depends on this one.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::SubjectId;

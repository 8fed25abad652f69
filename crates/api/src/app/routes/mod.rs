//! Route groups. Each `router()` is unguarded; `app::build_app` attaches
//! the guard for the group.

pub mod admin;
pub mod session;
pub mod system;

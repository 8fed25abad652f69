//! HTTP API: the access gate in front of axum routes.

pub mod app;
pub mod middleware;

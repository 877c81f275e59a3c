//! HTTP middleware and extractors for the admin gateway.

pub mod auth;

pub use auth::{AdminContext, AdminPage, RequireAdmin};

//! Core types for Inkstone.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod role;

pub use email::{Email, EmailError};
pub use role::Role;

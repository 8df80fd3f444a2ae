//! # Boardflow Shared Library
//!
//! Shared types and business logic used by the Boardflow API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and their ownership-scoped operations
//! - `ordering`: position-ordering engine for sibling sets
//! - `auth`: password hashing, JWT tokens, auth request context
//! - `db`: connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod ordering;

/// Current version of the Boardflow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

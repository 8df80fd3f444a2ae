//! BoardFlow API server
//!
//! HTTP API for BoardFlow: per-user boards of ordered columns holding
//! ordered tasks. Provides JWT authentication, board/column/task CRUD,
//! and adjacent-column task moves.
//!
//! Shared models, auth primitives, and the ordering engine live in
//! `boardflow-shared`.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

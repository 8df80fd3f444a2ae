/// API route handlers
///
/// Handlers organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration, login, token refresh
/// - `boards`: board collection and deletion
/// - `columns`: columns under a board, column updates/deletes
/// - `tasks`: tasks under a column, updates/deletes, adjacent moves
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod boards;
pub mod columns;
pub mod health;
pub mod tasks;

/// Plain confirmation body for deletions
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Authentication middleware support for Axum
///
/// The API layers a single JWT middleware over every protected route; this
/// module holds the pieces the middleware shares with handlers: the
/// [`AuthUser`] context that gets inserted into request extensions after a
/// bearer token validates, and the [`AuthError`] the middleware responds
/// with when it doesn't.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use boardflow_shared::auth::middleware::AuthUser;
///
/// async fn handler(Extension(auth): Extension<AuthUser>) -> String {
///     format!("Hello, user {}", auth.user_id)
/// }
/// ```
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authenticated-user context added to request extensions
///
/// Present on every request that passed the JWT middleware; handlers
/// extract it with Axum's `Extension` extractor and use `user_id` to scope
/// all reads and mutations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthUser {
    /// Authenticated user ID (the token's `sub` claim)
    pub user_id: Uuid,
}

impl AuthUser {
    /// Creates the context from a validated token's subject
    pub fn from_claims(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for the authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header is not a Bearer token
    InvalidFormat(String),

    /// Token validation failed (bad signature, expired, wrong type)
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Extracts the bearer token from an `Authorization` header value
///
/// Shared between the access-token middleware and the refresh endpoint
/// (which presents the refresh token the same way).
pub fn bearer_token(auth_header: &str) -> Result<&str, AuthError> {
    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))
}

/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT token generation and validation (access/refresh pair)
/// - [`middleware`]: authenticated-user request context and bearer parsing
///
/// # Example
///
/// ```no_run
/// use boardflow_shared::auth::password::{hash_password, verify_password};
/// use boardflow_shared::auth::jwt::issue_token_pair;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let pair = issue_token_pair(Uuid::new_v4(), "secret-key-at-least-32-bytes-long")?;
/// # let _ = pair;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;

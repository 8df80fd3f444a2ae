/// Authentication endpoints
///
/// - `POST /auth/register` - register a new user
/// - `POST /auth/login` - exchange credentials for a token pair
/// - `POST /auth/refresh` - exchange a refresh token for a fresh pair
///
/// Login and refresh return an access token (30 minutes) and a refresh
/// token (30 days). The refresh endpoint authenticates itself: the refresh
/// token is presented as the bearer token, not in the body, and both
/// tokens are rotated on success.
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::header, http::HeaderMap, http::StatusCode, Json};
use boardflow_shared::{
    auth::{
        jwt::{self, TokenPair},
        middleware::bearer_token,
        password,
    },
    models::user::{CreateUser, User, UserProfile},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired login name
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Newly created user
    pub user: UserProfile,

    /// Confirmation message
    pub message: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login name
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (30 minutes)
    pub access_token: String,

    /// Refresh token (30 days)
    pub refresh_token: String,

    /// Authenticated user
    pub user: UserProfile,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {"username": "alice", "password": "correct-horse-battery"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: username already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    if User::username_exists(&state.db, &req.username).await? {
        return Err(ApiError::BadRequest("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    // The unique constraint on username backstops the exists-check race;
    // a concurrent duplicate surfaces as the same 400.
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserProfile::from(&user),
            message: "User created".to_string(),
        }),
    ))
}

/// Login with username and password
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {"username": "alice", "password": "correct-horse-battery"}
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password (the two are
///   indistinguishable in the response)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let pair = jwt::issue_token_pair(user.id, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        user: UserProfile::from(&user),
    }))
}

/// Refresh the token pair
///
/// The refresh token is presented as the bearer token; on success a fresh
/// access + refresh pair is returned (refresh tokens rotate).
///
/// # Endpoint
///
/// ```text
/// POST /auth/refresh
/// Authorization: Bearer <refresh token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: missing, invalid, expired, or wrong-type token
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<TokenPair>> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = bearer_token(auth_header)?;

    let claims = jwt::validate_refresh_token(token, state.jwt_secret())?;

    let pair = jwt::issue_token_pair(claims.sub, state.jwt_secret())?;

    Ok(Json(pair))
}

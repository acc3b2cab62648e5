//! Handlers for the `/auth` resource (register, login).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use studyquest_core::error::CoreError;
use studyquest_db::models::user::{CreateUser, User, UserInfo};
use validator::Validate;

use crate::auth::jwt::generate_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 32, message = "username must be 3-32 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "passphrase must be at least 6 characters"))]
    pub passphrase: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "passphrase is required"))]
    pub passphrase: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserInfo,
}

fn issue_token(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = generate_token(user.id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserInfo::from(user),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create an account in the novice tier and return a token for it.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    input.validate()?;

    let username = input.username.trim().to_string();
    if username.chars().any(|c| c.is_whitespace() || c == '<' || c == '>') {
        return Err(AppError::BadRequest(
            "username may not contain whitespace or angle brackets".into(),
        ));
    }

    let passphrase_hash = hash_password(&input.passphrase)
        .map_err(|e| AppError::InternalError(format!("Passphrase hashing error: {e}")))?;

    let user = state
        .store
        .create_user(&CreateUser {
            username,
            passphrase_hash,
        })
        .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let data = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// POST /api/v1/auth/login
///
/// Verify a username and passphrase and return a fresh token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    input.validate()?;

    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or passphrase".into(),
        ))
    };

    let user = state
        .store
        .find_user_by_username(input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let matches = verify_password(&input.passphrase, &user.passphrase_hash)
        .map_err(|e| AppError::InternalError(format!("Passphrase verification error: {e}")))?;
    if !matches {
        tracing::debug!(user_id = user.id, "Rejected login");
        return Err(invalid());
    }

    tracing::info!(user_id = user.id, "User logged in");

    let data = issue_token(&state, &user)?;
    Ok(Json(DataResponse { data }))
}

/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/register` - Create an account, returns a token
/// - `POST /api/login` - Verify credentials, returns a token
///
/// Registration always assigns the `user` role; admins are provisioned out
/// of band. Login failures return a single generic 401 so the response does
/// not reveal whether the username or the password was wrong.

use crate::{
    app::AppState,
    error::{ApiError, ApiJson, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    /// Checked against the full length policy below
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    pub password: String,
}

/// Response for both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Signed bearer token (24h lifetime)
    pub token: String,

    /// The account, without its password hash
    pub user: User,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/register
/// {"username": "alice", "password": "longenough1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `409 Conflict`: username already taken
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    password::validate_password_length(&req.password).map_err(|message| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    // uniqueness is the column constraint; a duplicate maps to 409
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    let claims = jwt::Claims::new(user.id, &user.username, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /api/login
/// {"username": "alice", "password": "longenough1"}
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: unknown username or wrong password
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
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

    let claims = jwt::Claims::new(user.id, &user.username, user.role);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(AuthResponse { token, user }))
}

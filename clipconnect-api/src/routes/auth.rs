/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/signup` - Create an account (CREATOR or CLIPPER)
/// - `POST /api/auth/login` - Login and receive a bearer token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;
use clipconnect_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, Role, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (validated for minimum strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Account role, CREATOR or CLIPPER
    pub role: Role,

    /// Optional first name
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,

    /// Optional last name
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response for both signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Human-readable outcome
    pub message: String,

    /// Bearer token for subsequent requests
    pub token: String,

    /// The authenticated user (password hash excluded)
    pub user: User,
}

/// Create a new account
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "email": "creator@example.com",
///   "password": "hunter2hunter2",
///   "role": "CREATOR"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    password::validate_password_strength(&req.password)
        .map_err(ApiError::BadRequest)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            role: req.role,
            first_name: req.first_name,
            last_name: req.last_name,
        },
    )
    .await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Signup successful".to_string(),
            token,
            user,
        }),
    ))
}

/// Authenticate an existing account
///
/// A missing account and a wrong password both answer with the same
/// opaque 401 so the endpoint cannot be used to probe for emails.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "creator@example.com",
///   "password": "hunter2hunter2"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    User::update_last_login(&state.db, user.id).await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        token,
        user,
    }))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let claims = jwt::Claims::new(
        user.id,
        user.role,
        Duration::hours(state.config.jwt.expires_in_hours),
    );
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

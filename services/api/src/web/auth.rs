//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, logout and account deletion.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use bytes::Bytes;
use chrono::{Duration, Utc};
use selections_core::ValidationErrors;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::middleware::{session_id_from_headers, SESSION_COOKIE};
use crate::web::rest::parse_body;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Signup body. Like `LoginRequest`, only used for the OpenAPI document;
/// handlers read the raw JSON through `credentials`.
#[derive(ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn session_cookie(auth_session_id: &str, ttl: Duration) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        auth_session_id,
        ttl.num_seconds()
    )
}

fn cleared_cookie() -> String {
    format!(
        "{}=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Email (trimmed, lowercased) and password from a signup or login body.
fn credentials(body: &Bytes) -> Result<(String, String), ApiError> {
    let body = parse_body(body)?;
    let mut errors = ValidationErrors::default();
    let Value::Object(object) = &body else {
        errors.add("non_field_errors", "Invalid data. Expected a dictionary.");
        return Err(errors.into());
    };

    let email = credential_field(object, &mut errors, "email").map(|e| e.trim().to_lowercase());
    let password = credential_field(object, &mut errors, "password").map(str::to_string);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok((email, password)),
        _ => Err(errors.into()),
    }
}

fn credential_field<'a>(
    object: &'a Map<String, Value>,
    errors: &mut ValidationErrors,
    name: &str,
) -> Option<&'a str> {
    match object.get(name) {
        None => errors.add(name, "This field is required."),
        Some(Value::Null) => errors.add(name, "This field may not be null."),
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(name, "This field may not be blank.")
        }
        Some(Value::String(s)) => return Some(s.as_str()),
        Some(_) => errors.add(name, "Not a valid string."),
    }
    None
}

/// Creates an auth session for `user_id` and returns the `Set-Cookie` value.
async fn start_auth_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let auth_session_id = Uuid::new_v4().to_string();
    let ttl = Duration::days(state.config.session_ttl_days);

    state
        .accounts
        .create_auth_session(&auth_session_id, user_id, Utc::now() + ttl)
        .await?;

    Ok(session_cookie(&auth_session_id, ttl))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 400, description = "Missing, blank or malformed email or password"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = credentials(&body)?;

    // 1. Hash the password
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ApiError::Internal("Failed to hash password".to_string())
        })?
        .to_string();

    // 2. Create user in the store
    let user = state
        .accounts
        .create_user_with_email(&email, &password_hash)
        .await?;

    // 3. Log them straight in
    let cookie = start_auth_session(&state, user.user_id).await?;
    info!(user_id = %user.user_id, "user signed up");

    let response = AuthResponse {
        user_id: user.user_id,
        email: user.email.unwrap_or_default(),
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Missing, blank or malformed email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let (email, password) = credentials(&body)?;

    // 1. Get user by email
    let user_creds = state
        .accounts
        .get_user_by_email(&email)
        .await
        .map_err(|_| ApiError::InvalidCredentials)?;

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        ApiError::Internal("Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // 3. Start a new auth session
    let cookie = start_auth_session(&state, user_creds.user_id).await?;

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let auth_session_id = session_id_from_headers(&headers).ok_or(ApiError::Unauthorized)?;

    state.accounts.delete_auth_session(auth_session_id).await?;

    Ok((StatusCode::OK, [(header::SET_COOKIE, cleared_cookie())]))
}

/// DELETE /auth/account - Delete the caller's account and everything they own
#[utoipa::path(
    delete,
    path = "/auth/account",
    responses(
        (status = 204, description = "Account and its selections deleted"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn delete_account_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.delete_user(user_id).await?;
    info!(user_id = %user_id, "account deleted");

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, cleared_cookie())],
    ))
}

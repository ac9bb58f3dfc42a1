//! Account endpoints: register, login, profile, role management

use std::str::FromStr;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use catalog_core::domain::newtypes::{Email, UserId};
use catalog_core::domain::user::User;

use crate::auth::{hash_password, verify_password, AdminUser, AuthUser};
use crate::error::ApiError;
use crate::models::{
    LoginRequest, RegisterRequest, RoleUpdateRequest, TokenResponse, UserResponse,
};
use crate::state::AppState;

/// `POST /auth/register` - create a new account
///
/// The role can be supplied in the request (used to bootstrap the first
/// admin); it defaults to `user`.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let email = Email::new(body.email)?;

    if body.password.is_empty() {
        return Err(ApiError::BadRequest("password must not be empty".to_string()));
    }

    if state.users.get_by_email(&email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let password_hash = hash_password(&body.password)?;
    let user = User::new(email, password_hash, body.role.unwrap_or_default());
    state.users.insert(&user).await?;

    tracing::info!(user_id = %user.id(), role = %user.role(), "Registered user");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// `POST /auth/login` - exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    const BAD_CREDENTIALS: &str = "incorrect email or password";

    let email = Email::new(body.email)
        .map_err(|_| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    let user = state
        .users
        .get_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_password(&body.password, user.password_hash())? {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = state.keys.issue(&user)?;

    tracing::debug!(user_id = %user.id(), "Issued access token");

    Ok(Json(TokenResponse::bearer(token)))
}

/// `GET /auth/me` - current account profile
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = UserId::from_str(&claims.sub)
        .map_err(|_| ApiError::Unauthorized("token subject is not a user id".to_string()))?;

    let user = state
        .users
        .get(&user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    Ok(Json(UserResponse::from(&user)))
}

/// `PUT /auth/users/:id/role` - change an account's role (admin only)
pub async fn update_role(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
    Json(body): Json<RoleUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id =
        UserId::from_str(&id).map_err(|_| ApiError::BadRequest(format!("invalid user id: {id}")))?;

    if !state.users.update_role(&user_id, body.role).await? {
        return Err(ApiError::NotFound("user"));
    }

    let user = state
        .users
        .get(&user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    tracing::info!(user_id = %user_id, role = %body.role, "Updated user role");

    Ok(Json(UserResponse::from(&user)))
}

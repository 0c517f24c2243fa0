//! Authentication handlers.

use crate::{
    error::{ApiError, ApiResult},
    middleware::auth::{encode_token, verify_password, Auth, AuthUser, Claims},
    repo,
    state::AppState,
};
use axum::{extract::State, Json};
use cadre_common_core::UserId;
use serde::{Deserialize, Serialize};

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserInfo,
}

/// Caller-visible user context.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub is_super_admin: bool,
}

impl From<&AuthUser> for UserInfo {
    fn from(user: &AuthUser) -> Self {
        let mut permissions: Vec<String> = user.permissions.iter().cloned().collect();
        permissions.sort();
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            roles: user.roles.clone(),
            permissions,
            is_super_admin: user.is_super_admin,
        }
    }
}

/// `POST /auth/login`
///
/// Verifies the password and issues an access token carrying the user's
/// roles and effective permission codes. An unknown email and a wrong
/// password are indistinguishable to the caller.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = repo::users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    verify_password(&req.password, &user.password_hash)?;

    let user_id = UserId::from_uuid(user.id);
    let roles = repo::users::roles_for(&state.pool, user_id).await?;
    let permissions = repo::users::permission_codes_for(&state.pool, user_id).await?;

    let ttl = state.config.auth.access_token_ttl_secs;
    let claims = Claims::new_access(
        user_id,
        &user.email,
        roles.clone(),
        permissions.clone(),
        user.is_super_admin,
        ttl,
    );
    let access_token = encode_token(&claims, &state.config.auth.jwt_secret)?;

    tracing::info!(user_id = %user_id, "User logged in");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: ttl,
        user: UserInfo {
            id: user_id.to_string(),
            email: user.email,
            roles,
            permissions,
            is_super_admin: user.is_super_admin,
        },
    }))
}

/// `GET /auth/me`
pub async fn me(Auth(user): Auth) -> Json<UserInfo> {
    Json(UserInfo::from(&user))
}

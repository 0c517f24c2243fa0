//! User lookup and permission resolution.

use crate::error::ApiResult;
use cadre_common_core::UserId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A user row.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Find a user by email.
pub async fn find_by_email(pool: &PgPool, email: &str) -> ApiResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, is_super_admin, created_at \
         FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Names of the roles assigned to a user.
pub async fn roles_for(pool: &PgPool, user_id: UserId) -> ApiResult<Vec<String>> {
    let roles = sqlx::query_scalar(
        "SELECT r.name FROM roles r \
         JOIN user_roles ur ON ur.role_id = r.id \
         WHERE ur.user_id = $1 ORDER BY r.name",
    )
    .bind(user_id.as_uuid())
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

/// Effective permission codes for a user, resolved through role
/// assignments.
pub async fn permission_codes_for(pool: &PgPool, user_id: UserId) -> ApiResult<Vec<String>> {
    let codes = sqlx::query_scalar(
        "SELECT DISTINCT p.code FROM permissions p \
         JOIN role_permissions rp ON rp.permission_id = p.id \
         JOIN user_roles ur ON ur.role_id = rp.role_id \
         WHERE ur.user_id = $1 ORDER BY p.code",
    )
    .bind(user_id.as_uuid())
    .fetch_all(pool)
    .await?;
    Ok(codes)
}

//! Role and permission administration.

use crate::error::ApiResult;
use crate::middleware::authz::PermissionCode;
use cadre_common_core::{PermissionId, RoleId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

/// A role row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A permission row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: Uuid,
    pub code: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// List all roles.
pub async fn list_roles(pool: &PgPool) -> ApiResult<Vec<Role>> {
    let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(roles)
}

/// Create a role. Role names are unique; duplicates surface as a conflict.
pub async fn create_role(pool: &PgPool, name: &str) -> ApiResult<Role> {
    let role = sqlx::query_as::<_, Role>(
        "INSERT INTO roles (id, name) VALUES ($1, $2) RETURNING *",
    )
    .bind(RoleId::new().as_uuid())
    .bind(name)
    .fetch_one(pool)
    .await?;
    Ok(role)
}

/// Delete a role; assignment rows cascade. `false` if it did not exist.
pub async fn delete_role(pool: &PgPool, id: RoleId) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// List all permissions.
pub async fn list_permissions(pool: &PgPool) -> ApiResult<Vec<Permission>> {
    let permissions = sqlx::query_as::<_, Permission>("SELECT * FROM permissions ORDER BY code")
        .fetch_all(pool)
        .await?;
    Ok(permissions)
}

/// Grant a permission to a role. Re-granting is a no-op.
pub async fn assign_permission(
    pool: &PgPool,
    role_id: RoleId,
    permission_id: PermissionId,
) -> ApiResult<()> {
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2) \
         ON CONFLICT DO NOTHING",
    )
    .bind(role_id.as_uuid())
    .bind(permission_id.as_uuid())
    .execute(pool)
    .await?;
    Ok(())
}

/// Revoke a permission from a role; `false` if it was not assigned.
pub async fn revoke_permission(
    pool: &PgPool,
    role_id: RoleId,
    permission_id: PermissionId,
) -> ApiResult<bool> {
    let result = sqlx::query(
        "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
    )
    .bind(role_id.as_uuid())
    .bind(permission_id.as_uuid())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Synchronize the compiled permission registry into the database.
///
/// Run at startup so every grantable code exists exactly once; existing
/// rows are left untouched.
pub async fn sync_permission_registry(pool: &PgPool) -> ApiResult<()> {
    for code in PermissionCode::ALL {
        sqlx::query(
            "INSERT INTO permissions (id, code) VALUES ($1, $2) \
             ON CONFLICT (code) DO NOTHING",
        )
        .bind(PermissionId::new().as_uuid())
        .bind(code.as_str())
        .execute(pool)
        .await?;
    }
    info!(count = PermissionCode::ALL.len(), "Permission registry synchronized");
    Ok(())
}

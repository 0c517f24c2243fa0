//! Role and permission administration handlers.

use crate::{
    error::{ApiError, ApiResult},
    repo::roles::{self, Permission, Role},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cadre_common_core::{PermissionId, RoleId};
use serde::Deserialize;

fn parse_role_id(raw: &str) -> ApiResult<RoleId> {
    RoleId::parse(raw).map_err(|_| ApiError::BadRequest(format!("invalid role id: {raw}")))
}

fn parse_permission_id(raw: &str) -> ApiResult<PermissionId> {
    PermissionId::parse(raw)
        .map_err(|_| ApiError::BadRequest(format!("invalid permission id: {raw}")))
}

/// `GET /roles`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Role>>> {
    Ok(Json(roles::list_roles(&state.pool).await?))
}

/// Role creation body.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
}

/// `POST /roles`
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("role name must not be empty".into()));
    }
    let role = roles::create_role(&state.pool, req.name.trim()).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

/// `DELETE /roles/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if roles::delete_role(&state.pool, parse_role_id(&id)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Role".into()))
    }
}

/// `GET /permissions`
pub async fn list_permissions(State(state): State<AppState>) -> ApiResult<Json<Vec<Permission>>> {
    Ok(Json(roles::list_permissions(&state.pool).await?))
}

/// Permission grant body.
#[derive(Debug, Deserialize)]
pub struct AssignPermissionRequest {
    pub permission_id: String,
}

/// `POST /roles/:id/permissions`
pub async fn assign_permission(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignPermissionRequest>,
) -> ApiResult<StatusCode> {
    let role_id = parse_role_id(&id)?;
    let permission_id = parse_permission_id(&req.permission_id)?;
    roles::assign_permission(&state.pool, role_id, permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /roles/:id/permissions/:permission_id`
pub async fn revoke_permission(
    State(state): State<AppState>,
    Path((id, permission_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let role_id = parse_role_id(&id)?;
    let permission_id = parse_permission_id(&permission_id)?;
    if roles::revoke_permission(&state.pool, role_id, permission_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Permission assignment".into()))
    }
}

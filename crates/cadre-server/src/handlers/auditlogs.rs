//! Audit log read endpoints.

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use cadre_audit_store::{AuditLogFilter, AuditLogPage, SortOrder};
use cadre_audit_types::AuditAction;
use cadre_common_core::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for `GET /auditlogs`.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub action: Option<String>,
    pub resource: Option<String>,
    pub user_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

impl TryFrom<AuditLogQuery> for AuditLogFilter {
    type Error = ApiError;

    fn try_from(query: AuditLogQuery) -> Result<Self, Self::Error> {
        let action = query
            .action
            .map(|a| {
                a.parse::<AuditAction>()
                    .map_err(|_| ApiError::InvalidQueryParam(format!("action: {a}")))
            })
            .transpose()?;
        let user_id = query
            .user_id
            .map(|u| {
                UserId::parse(&u).map_err(|_| ApiError::InvalidQueryParam(format!("user_id: {u}")))
            })
            .transpose()?;

        Ok(AuditLogFilter {
            action,
            resource: query.resource,
            user_id,
            from: query.from,
            to: query.to,
            search: query.search,
            sort: query.sort,
            page: query.page,
            limit: query.limit,
        })
    }
}

/// `GET /auditlogs` — filtered, paginated listing.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQuery>,
) -> ApiResult<Json<AuditLogPage>> {
    let filter: AuditLogFilter = query.try_into()?;
    let page = state.audit_store.query(&filter).await?;
    Ok(Json(page))
}

/// Distinct action values response.
#[derive(Debug, Serialize)]
pub struct ActionsResponse {
    pub actions: Vec<String>,
}

/// `GET /auditlogs/actions`
pub async fn actions(State(state): State<AppState>) -> ApiResult<Json<ActionsResponse>> {
    let actions = state.audit_store.distinct_actions().await?;
    Ok(Json(ActionsResponse { actions }))
}

/// Distinct resource values response.
#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub resources: Vec<String>,
}

/// `GET /auditlogs/resources`
pub async fn resources(State(state): State<AppState>) -> ApiResult<Json<ResourcesResponse>> {
    let resources = state.audit_store.distinct_resources().await?;
    Ok(Json(ResourcesResponse { resources }))
}

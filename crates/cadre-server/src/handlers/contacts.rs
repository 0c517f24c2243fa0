//! Contact CRUD handlers.

use crate::{
    error::{ApiError, ApiResult},
    repo::contacts::{self, Contact, ContactPayload},
    response::Page,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cadre_common_core::ContactId;
use serde::Deserialize;

/// Query parameters for the contact listing.
#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    pub search: Option<String>,
}

fn parse_id(raw: &str) -> ApiResult<ContactId> {
    ContactId::parse(raw).map_err(|_| ApiError::BadRequest(format!("invalid contact id: {raw}")))
}

/// `GET /contacts`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ContactListQuery>,
) -> ApiResult<Json<Page<Contact>>> {
    let page = query.page.max(1);
    let limit = query.limit.clamp(1, 100);
    let (items, total) =
        contacts::list(&state.pool, page, limit, query.search.as_deref()).await?;
    Ok(Json(Page::new(items, page, limit, total)))
}

/// `GET /contacts/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Contact>> {
    let contact = contacts::find(&state.pool, parse_id(&id)?)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact".into()))?;
    Ok(Json(contact))
}

/// `POST /contacts`
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = contacts::create(&state.pool, &payload).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `PUT /contacts/:id`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContactPayload>,
) -> ApiResult<Json<Contact>> {
    let contact = contacts::update(&state.pool, parse_id(&id)?, &payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact".into()))?;
    Ok(Json(contact))
}

/// `DELETE /contacts/:id`
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    if contacts::delete(&state.pool, parse_id(&id)?).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Contact".into()))
    }
}

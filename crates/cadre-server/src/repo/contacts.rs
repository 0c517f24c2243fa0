//! Contact persistence.

use crate::error::ApiResult;
use cadre_common_core::ContactId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// A contact row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactPayload {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// List contacts, newest first, with optional name search.
pub async fn list(
    pool: &PgPool,
    page: u32,
    limit: u32,
    search: Option<&str>,
) -> ApiResult<(Vec<Contact>, u64)> {
    let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);
    let pattern = search.map(|s| format!("%{}%", s));

    let total: i64 = match &pattern {
        Some(p) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM contacts WHERE name ILIKE $1")
                .bind(p)
                .fetch_one(pool)
                .await?
        }
        None => {
            sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
                .fetch_one(pool)
                .await?
        }
    };

    let items = match &pattern {
        Some(p) => {
            sqlx::query_as::<_, Contact>(
                "SELECT * FROM contacts WHERE name ILIKE $1 \
                 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(p)
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Contact>(
                "SELECT * FROM contacts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            )
            .bind(i64::from(limit))
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok((items, total as u64))
}

/// Fetch one contact.
pub async fn find(pool: &PgPool, id: ContactId) -> ApiResult<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>("SELECT * FROM contacts WHERE id = $1")
        .bind(id.as_uuid())
        .fetch_optional(pool)
        .await?;
    Ok(contact)
}

/// Insert a contact.
pub async fn create(pool: &PgPool, payload: &ContactPayload) -> ApiResult<Contact> {
    let contact = sqlx::query_as::<_, Contact>(
        "INSERT INTO contacts (id, name, email, phone, company, notes) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(ContactId::new().as_uuid())
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(&payload.notes)
    .fetch_one(pool)
    .await?;
    Ok(contact)
}

/// Update a contact; `None` if it does not exist.
pub async fn update(
    pool: &PgPool,
    id: ContactId,
    payload: &ContactPayload,
) -> ApiResult<Option<Contact>> {
    let contact = sqlx::query_as::<_, Contact>(
        "UPDATE contacts SET name = $2, email = $3, phone = $4, company = $5, \
         notes = $6, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(id.as_uuid())
    .bind(&payload.name)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(&payload.company)
    .bind(&payload.notes)
    .fetch_optional(pool)
    .await?;
    Ok(contact)
}

/// Delete a contact; `false` if it did not exist.
pub async fn delete(pool: &PgPool, id: ContactId) -> ApiResult<bool> {
    let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
        .bind(id.as_uuid())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

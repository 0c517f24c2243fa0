//! Postgres-backed audit store.

use crate::{AuditLogFilter, AuditLogPage, AuditStore, AuditStoreResult, SortOrder};
use async_trait::async_trait;
use cadre_audit_types::{AuditActor, AuditDetails, AuditLogEntry, AuditLogId};
use cadre_common_core::UserId;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

/// Audit store persisting entries to the `audit_logs` table.
#[derive(Debug, Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn actor_columns(actor: &AuditActor) -> (&'static str, Option<Uuid>, Option<&str>, Option<&str>) {
    match actor {
        AuditActor::User { user_id, email } => {
            ("user", Some(user_id.as_uuid()), email.as_deref(), None)
        }
        AuditActor::System { component } => ("system", None, None, Some(component.as_str())),
        AuditActor::Anonymous => ("anonymous", None, None, None),
    }
}

fn row_to_entry(row: &PgRow) -> Result<AuditLogEntry, sqlx::Error> {
    let actor_type: String = row.try_get("actor_type")?;
    let user_id: Option<Uuid> = row.try_get("user_id")?;
    let user_email: Option<String> = row.try_get("user_email")?;
    let actor_component: Option<String> = row.try_get("actor_component")?;

    let actor = match (actor_type.as_str(), user_id) {
        ("user", Some(id)) => AuditActor::User {
            user_id: UserId::from_uuid(id),
            email: user_email,
        },
        ("system", _) => AuditActor::System {
            component: actor_component.unwrap_or_default(),
        },
        _ => AuditActor::Anonymous,
    };

    let action: String = row.try_get("action")?;
    let details: serde_json::Value = row.try_get("details")?;
    let details: AuditDetails = serde_json::from_value(details)
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "details".into(),
            source: Box::new(e),
        })?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(AuditLogEntry {
        id: AuditLogId::from_uuid(row.try_get("id")?),
        actor,
        action: action.parse().unwrap_or(cadre_audit_types::AuditAction::Other),
        resource: row.try_get("resource")?,
        resource_id: row.try_get("resource_id")?,
        ip_address: row.try_get("ip_address")?,
        details,
        created_at,
    })
}

/// Append the WHERE clauses for `filter` to `qb`.
fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, filter: &'a AuditLogFilter) {
    qb.push(" WHERE 1=1");

    if let Some(action) = filter.action {
        qb.push(" AND action = ").push_bind(action.to_string());
    }
    if let Some(resource) = &filter.resource {
        qb.push(" AND resource = ").push_bind(resource);
    }
    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id.as_uuid());
    }
    if let Some(from) = filter.from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search);
        qb.push(" AND (resource ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR action ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR details->>'path' ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, entry: AuditLogEntry) -> AuditStoreResult<AuditLogId> {
        let (actor_type, user_id, user_email, actor_component) = actor_columns(&entry.actor);
        let details = serde_json::to_value(&entry.details)?;

        sqlx::query(
            "INSERT INTO audit_logs \
             (id, user_id, user_email, actor_type, actor_component, action, resource, \
              resource_id, ip_address, details, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(entry.id.as_uuid())
        .bind(user_id)
        .bind(user_email)
        .bind(actor_type)
        .bind(actor_component)
        .bind(entry.action.to_string())
        .bind(&entry.resource)
        .bind(&entry.resource_id)
        .bind(&entry.ip_address)
        .bind(details)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry.id)
    }

    async fn query(&self, filter: &AuditLogFilter) -> AuditStoreResult<AuditLogPage> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM audit_logs");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut qb = QueryBuilder::new(
            "SELECT id, user_id, user_email, actor_type, actor_component, action, \
             resource, resource_id, ip_address, details, created_at FROM audit_logs",
        );
        push_filters(&mut qb, filter);
        qb.push(match filter.sort {
            SortOrder::Desc => " ORDER BY created_at DESC",
            SortOrder::Asc => " ORDER BY created_at ASC",
        });
        qb.push(" LIMIT ")
            .push_bind(i64::from(filter.effective_limit()))
            .push(" OFFSET ")
            .push_bind(filter.offset() as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;
        let items = rows
            .iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AuditLogPage::new(
            items,
            filter.effective_page(),
            filter.effective_limit(),
            total as u64,
        ))
    }

    async fn distinct_actions(&self) -> AuditStoreResult<Vec<String>> {
        let actions =
            sqlx::query_scalar("SELECT DISTINCT action FROM audit_logs ORDER BY action")
                .fetch_all(&self.pool)
                .await?;
        Ok(actions)
    }

    async fn distinct_resources(&self) -> AuditStoreResult<Vec<String>> {
        let resources =
            sqlx::query_scalar("SELECT DISTINCT resource FROM audit_logs ORDER BY resource")
                .fetch_all(&self.pool)
                .await?;
        Ok(resources)
    }
}

//! In-memory audit store for tests and development.

use crate::{AuditLogFilter, AuditLogPage, AuditStore, AuditStoreResult, SortOrder};
use async_trait::async_trait;
use cadre_audit_types::{AuditLogEntry, AuditLogId};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Audit store keeping all entries in memory.
///
/// Thread-safe and cheap to clone; every clone shares the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditStore {
    entries: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl MemoryAuditStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored entries, in insertion order.
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries.read().clone()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, entry: AuditLogEntry) -> AuditStoreResult<AuditLogId> {
        let id = entry.id;
        self.entries.write().push(entry);
        Ok(id)
    }

    async fn query(&self, filter: &AuditLogFilter) -> AuditStoreResult<AuditLogPage> {
        let entries = self.entries.read();
        let mut matching: Vec<&AuditLogEntry> =
            entries.iter().filter(|e| filter.matches(e)).collect();

        match filter.sort {
            SortOrder::Desc => matching.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Asc => matching.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        }

        let total = matching.len() as u64;
        let page = filter.effective_page();
        let limit = filter.effective_limit();
        let items = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(AuditLogPage::new(items, page, limit, total))
    }

    async fn distinct_actions(&self) -> AuditStoreResult<Vec<String>> {
        let distinct: BTreeSet<String> = self
            .entries
            .read()
            .iter()
            .map(|e| e.action.to_string())
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn distinct_resources(&self) -> AuditStoreResult<Vec<String>> {
        let distinct: BTreeSet<String> = self
            .entries
            .read()
            .iter()
            .map(|e| e.resource.clone())
            .collect();
        Ok(distinct.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_audit_types::{AuditAction, AuditDetails};
    use chrono::{Duration, Utc};

    fn seeded(n: usize) -> MemoryAuditStore {
        let store = MemoryAuditStore::new();
        let base = Utc::now();
        let mut entries = store.entries.write();
        for i in 0..n {
            let mut entry = AuditLogEntry::builder(AuditAction::Create, "contacts")
                .details(AuditDetails {
                    method: "POST".into(),
                    path: format!("/api/v1/contacts/{i}"),
                    status: 201,
                    ..AuditDetails::default()
                })
                .build();
            // Deterministic, strictly increasing timestamps.
            entry.created_at = base + Duration::seconds(i as i64);
            entries.push(entry);
        }
        drop(entries);
        store
    }

    #[tokio::test]
    async fn pagination_returns_expected_slice() {
        let store = seeded(25);
        let filter = AuditLogFilter::new().page(2, 10);
        let page = store.query(&filter).await.unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 10);
        assert_eq!(page.total, 25);
        assert_eq!(page.total_pages, 3);
        // Default sort is newest first: page 2 holds entries 14..=5.
        assert!(page.items[0].details.path.ends_with("/14"));
        assert!(page.items[9].details.path.ends_with("/5"));
    }

    #[tokio::test]
    async fn short_last_page() {
        let store = seeded(15);
        let page = store
            .query(&AuditLogFilter::new().page(2, 10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total_pages, 2);
    }

    #[tokio::test]
    async fn ascending_sort() {
        let store = seeded(3);
        let page = store
            .query(&AuditLogFilter {
                sort: SortOrder::Asc,
                ..AuditLogFilter::new()
            })
            .await
            .unwrap();
        assert!(page.items[0].details.path.ends_with("/0"));
        assert!(page.items[2].details.path.ends_with("/2"));
    }

    #[tokio::test]
    async fn distinct_values_are_sorted_and_deduped() {
        let store = seeded(2);
        store
            .insert(AuditLogEntry::builder(AuditAction::Delete, "roles").build())
            .await
            .unwrap();

        assert_eq!(store.distinct_actions().await.unwrap(), vec!["create", "delete"]);
        assert_eq!(
            store.distinct_resources().await.unwrap(),
            vec!["contacts", "roles"]
        );
    }

    #[tokio::test]
    async fn insert_returns_entry_id() {
        let store = MemoryAuditStore::new();
        let entry = AuditLogEntry::builder(AuditAction::Read, "contacts").build();
        let id = entry.id;
        assert_eq!(store.insert(entry).await.unwrap(), id);
        assert_eq!(store.len(), 1);
    }
}

//! Query filter and page types for the audit log read API.

use cadre_audit_types::{AuditAction, AuditLogEntry};
use cadre_common_core::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hard cap on page size.
pub const MAX_PAGE_SIZE: u32 = 100;

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Sort order for the audit log listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest entries first (default).
    #[default]
    Desc,
    /// Oldest entries first.
    Asc,
}

/// Filter for the audit log read API.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    /// Only entries with this action.
    pub action: Option<AuditAction>,
    /// Only entries with this resource label.
    pub resource: Option<String>,
    /// Only entries performed by this user.
    pub user_id: Option<UserId>,
    /// Only entries recorded at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only entries recorded at or before this instant.
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive free-text match over resource, action and path.
    pub search: Option<String>,
    /// Sort order over the creation timestamp.
    pub sort: SortOrder,
    /// 1-indexed page number.
    pub page: u32,
    /// Page size, capped at [`MAX_PAGE_SIZE`].
    pub limit: u32,
}

impl AuditLogFilter {
    /// Create an empty filter with default pagination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by action.
    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Filter by resource label.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Filter by acting user.
    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Filter by timestamp range.
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Free-text search.
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Select a page.
    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Effective 1-indexed page.
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Effective page size, defaulted and capped.
    pub fn effective_limit(&self) -> u32 {
        match self.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    /// Row offset for the selected page.
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_limit())
    }

    /// Whether `entry` matches every set criterion.
    ///
    /// This is the reference semantics; the Postgres implementation mirrors
    /// it in SQL.
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(action) = self.action {
            if entry.action != action {
                return false;
            }
        }
        if let Some(resource) = &self.resource {
            if &entry.resource != resource {
                return false;
            }
        }
        if let Some(user_id) = self.user_id {
            if entry.actor.user_id() != Some(user_id) {
                return false;
            }
        }
        if let Some(from) = self.from {
            if entry.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if entry.created_at > to {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystacks = [
                entry.resource.to_lowercase(),
                entry.action.to_string(),
                entry.details.path.to_lowercase(),
            ];
            if !haystacks.iter().any(|h| h.contains(&needle)) {
                return false;
            }
        }
        true
    }
}

/// One page of audit log entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogPage {
    /// Entries on this page.
    pub items: Vec<AuditLogEntry>,
    /// 1-indexed page number.
    pub page: u32,
    /// Page size used.
    pub limit: u32,
    /// Total matching entries across all pages.
    pub total: u64,
    /// Total page count (`ceil(total / limit)`).
    pub total_pages: u32,
}

impl AuditLogPage {
    /// Assemble a page, computing `total_pages`.
    pub fn new(items: Vec<AuditLogEntry>, page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total.div_ceil(u64::from(limit)) as u32
        };
        Self {
            items,
            page,
            limit,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadre_audit_types::{AuditActor, AuditDetails};

    fn entry(action: AuditAction, resource: &str, path: &str) -> AuditLogEntry {
        AuditLogEntry::builder(action, resource)
            .details(AuditDetails {
                method: "GET".into(),
                path: path.into(),
                status: 200,
                ..AuditDetails::default()
            })
            .build()
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = AuditLogFilter::new();
        assert!(filter.matches(&entry(AuditAction::Read, "contacts", "/api/v1/contacts")));
    }

    #[test]
    fn action_and_resource_filters() {
        let filter = AuditLogFilter::new()
            .action(AuditAction::Create)
            .resource("contacts");
        assert!(!filter.matches(&entry(AuditAction::Read, "contacts", "/x")));
        assert!(!filter.matches(&entry(AuditAction::Create, "roles", "/x")));
        assert!(filter.matches(&entry(AuditAction::Create, "contacts", "/x")));
    }

    #[test]
    fn user_filter_ignores_anonymous() {
        let user = UserId::new();
        let filter = AuditLogFilter::new().user(user);
        let anonymous = entry(AuditAction::Read, "contacts", "/x");
        assert!(!filter.matches(&anonymous));

        let mut owned = anonymous.clone();
        owned.actor = AuditActor::user(user, "a@b.c");
        assert!(filter.matches(&owned));
    }

    #[test]
    fn search_is_case_insensitive_over_resource_action_path() {
        let e = entry(AuditAction::Delete, "Contacts", "/api/v1/contacts/9");
        assert!(AuditLogFilter::new().search("CONTACT").matches(&e));
        assert!(AuditLogFilter::new().search("delete").matches(&e));
        assert!(AuditLogFilter::new().search("/api/v1").matches(&e));
        assert!(!AuditLogFilter::new().search("roles").matches(&e));
    }

    #[test]
    fn limit_is_defaulted_and_capped() {
        assert_eq!(AuditLogFilter::new().effective_limit(), 20);
        assert_eq!(AuditLogFilter::new().page(1, 500).effective_limit(), 100);
        assert_eq!(AuditLogFilter::new().page(0, 10).effective_page(), 1);
        assert_eq!(AuditLogFilter::new().page(3, 10).offset(), 20);
    }

    #[test]
    fn page_math() {
        let page = AuditLogPage::new(Vec::new(), 2, 10, 25);
        assert_eq!(page.total_pages, 3);
        let exact = AuditLogPage::new(Vec::new(), 1, 10, 20);
        assert_eq!(exact.total_pages, 2);
        let empty = AuditLogPage::new(Vec::new(), 1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }
}

//! Pagination support for list endpoints.

use serde::{Deserialize, Serialize};

/// Pagination request parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PaginationParams {
    /// The 1-indexed page, floored at 1.
    pub fn page(&self) -> u32 {
        self.page.max(1)
    }

    /// The page size, capped at the maximum.
    pub fn limit(&self) -> u32 {
        self.limit.clamp(1, 100)
    }
}

/// One page of items for list endpoints.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Assemble a page, computing `total_pages`.
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
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

    #[test]
    fn params_are_floored_and_capped() {
        let params = PaginationParams { page: 0, limit: 500 };
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 100);
    }

    #[test]
    fn total_pages_rounds_up() {
        let page: Page<u32> = Page::new(Vec::new(), 2, 10, 25);
        assert_eq!(page.total_pages, 3);
    }
}

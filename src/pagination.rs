//! Page arithmetic shared by the search engine and list endpoints.

use serde::{Deserialize, Serialize};

/// Default number of items returned per page.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Requested page window, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of items skipped before this page.
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Slices `items` to this page; out-of-range pages yield an empty vector.
    pub fn slice<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset())
            .take(self.per_page)
            .collect()
    }

    pub fn info(&self, total: usize) -> PageInfo {
        PageInfo {
            page: self.page,
            limit: self.per_page,
            total,
            total_pages: total.div_ceil(self.per_page),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, DEFAULT_ITEMS_PER_PAGE)
    }
}

/// Pagination block returned alongside a page of results.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Page<T> {
    /// Slices the full, already-ordered result set to `pagination`.
    pub fn from_all(items: Vec<T>, pagination: Pagination) -> Self {
        let total = items.len();
        Self {
            items: pagination.slice(items),
            pagination: pagination.info(total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_through_results() {
        let page = Page::from_all((1..=5).collect::<Vec<_>>(), Pagination::new(2, 2));
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.pagination.total, 5);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty() {
        let page = Page::from_all(vec![1, 2], Pagination::new(9, 2));
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 2);
        assert_eq!(page.pagination.total_pages, 1);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let page = Page::<i32>::from_all(vec![], Pagination::default());
        assert_eq!(page.pagination.total_pages, 0);
    }
}

//! Page-number pagination (`currentPage` / `pageSize`).

use serde::Serialize;

/// Page size when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: i64 = 999;

/// A resolved, clamped page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamp user-provided values: page floors at 1, size to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block of a paged response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = if total == 0 {
            0
        } else {
            (total + request.page_size - 1) / request.page_size
        };
        Self {
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages,
        }
    }
}

/// One page of results with its pagination block.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T: Serialize> {
    pub pagination: PageInfo,
    pub results: Vec<T>,
}

impl<T: Serialize> Paginated<T> {
    pub fn new(request: PageRequest, total: i64, results: Vec<T>) -> Self {
        Self {
            pagination: PageInfo::new(request, total),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_missing() {
        let req = PageRequest::new(None, None);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn values_are_clamped() {
        let req = PageRequest::new(Some(0), Some(5000));
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, MAX_PAGE_SIZE);

        let req = PageRequest::new(Some(-3), Some(0));
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 1);
    }

    #[test]
    fn offset_follows_page() {
        let req = PageRequest::new(Some(3), Some(10));
        assert_eq!(req.limit(), 10);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn total_pages_rounds_up() {
        let req = PageRequest::new(Some(1), Some(20));
        assert_eq!(PageInfo::new(req, 0).total_pages, 0);
        assert_eq!(PageInfo::new(req, 20).total_pages, 1);
        assert_eq!(PageInfo::new(req, 21).total_pages, 2);
    }

    #[test]
    fn page_past_the_end_keeps_requested_number() {
        let req = PageRequest::new(Some(9), Some(20));
        let page: Paginated<i64> = Paginated::new(req, 3, Vec::new());
        assert_eq!(page.pagination.page, 9);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(page.results.is_empty());
    }
}

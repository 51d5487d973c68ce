//! Page window arithmetic shared by every list endpoint.

use serde::{Deserialize, Serialize};

/// A validated (page, page size) pair. Page numbers start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: i64 = 1;
    pub const DEFAULT_PAGE_SIZE: i64 = 10;
    pub const MAX_PAGE_SIZE: i64 = 1000;

    /// Missing or non-positive values fall back to page 1 and size 10.
    /// Larger sizes are clamped to `MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        Self {
            page: page.filter(|p| *p >= 1).unwrap_or(Self::DEFAULT_PAGE),
            page_size: page_size
                .filter(|s| *s >= 1)
                .map_or(Self::DEFAULT_PAGE_SIZE, |s| s.min(Self::MAX_PAGE_SIZE)),
        }
    }

    /// Lenient variant for raw query-string values; unparsable input uses the defaults.
    pub fn parse(page: Option<&str>, page_size: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        Self::new(parse(page), parse(page_size))
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Page metadata returned next to list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_records: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub page_size: i64,
}

impl Pagination {
    pub fn calculate(total_records: i64, request: &PageRequest) -> Self {
        let page_size = request.page_size().max(1);
        let total_records = total_records.max(0);
        Self {
            total_records,
            total_pages: total_records / page_size + i64::from(total_records % page_size != 0),
            current_page: request.page(),
            page_size,
        }
    }
}

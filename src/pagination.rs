//! Page/offset arithmetic for list views

use serde::{Deserialize, Serialize};

/// Rows shown per list page
pub const PAGE_SIZE: i64 = 10;

/// Query string accepted by every list page (`?search=...&page=...`).
///
/// `page` stays a string so that garbage input falls back to page 1 instead
/// of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
}

impl ListQuery {
    pub fn search(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

/// A 1-based page number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageRequest {
    /// Non-positive values are clamped to page 1
    pub fn new(page: i64) -> Self {
        Self { page: page.max(1) }
    }

    /// Missing, non-numeric or non-positive input means page 1
    pub fn parse(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

pub fn total_pages(count: i64) -> i64 {
    if count <= 0 {
        0
    } else {
        (count + PAGE_SIZE - 1) / PAGE_SIZE
    }
}

/// Navigation data handed to list views when there is more than one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub search_query: String,
}

impl PageInfo {
    /// `None` when everything fits on a single page
    pub fn build(count: i64, request: PageRequest, search: &str) -> Option<Self> {
        let total_pages = total_pages(count);
        (total_pages > 1).then(|| PageInfo {
            current_page: request.page(),
            total_pages,
            search_query: search.to_string(),
        })
    }
}

/// One page of rows plus optional navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub pagination: Option<PageInfo>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest, search: &str) -> Self {
        Self {
            items,
            total,
            pagination: PageInfo::build(total, request, search),
        }
    }
}

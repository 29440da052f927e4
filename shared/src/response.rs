//! API Response types
//!
//! List and report envelopes returned by the asset backend

use serde::{Deserialize, Serialize};

/// Paginated list envelope
///
/// All list endpoints answer with:
/// ```json
/// { "items": [ ... ], "total": 42 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Items of the requested page
    pub items: Vec<T>,
    /// Total number of matching items across all pages
    pub total: u64,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Number of pages for the given page size; at least 1
    pub fn total_pages(&self, per_page: u32) -> u32 {
        total_pages(self.total, per_page)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

impl<T> Default for Paged<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Number of pages needed for `total` items; an empty result still has one page
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    if per_page == 0 || total == 0 {
        return 1;
    }
    total.div_ceil(per_page as u64).min(u32::MAX as u64) as u32
}

/// One row of a pre-aggregated report
///
/// Report endpoints name the grouping key `dimension`; charts call it `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    #[serde(alias = "dimension", alias = "subcity", alias = "street")]
    pub category: String,
    pub count: u64,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: u64) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

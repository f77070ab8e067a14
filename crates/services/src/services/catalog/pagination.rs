//! Page slicing shared by the full catalog listing and search results.
//!
//! Out-of-range pages clamp to the nearest valid page instead of erroring:
//! page 0 behaves like page 1 and anything past the end returns the last page.
//! An empty input always yields page 1 with no items and `total_pages == 0`.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}

/// Number of pages needed for `total` items, i.e. `ceil(total / page_size)`.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total_pages(total, page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = ((page - 1) * page_size).min(total);
    let end = (start + page_size).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page,
        page_size,
        total_pages,
    }
}

/// Requested page and size before defaults and limits are applied
#[derive(Debug, Clone, Copy, Default)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl PageRequest {
    /// Resolve to a concrete `(page, page_size)`. Missing values take the defaults,
    /// a zero size becomes 1 and sizes above `max_page_size` are capped.
    pub fn resolve(self, default_page_size: usize, max_page_size: usize) -> (usize, usize) {
        let max_page_size = max_page_size.max(1);
        let page_size = self
            .page_size
            .unwrap_or(default_page_size)
            .clamp(1, max_page_size);
        (self.page.unwrap_or(1).max(1), page_size)
    }
}

//! Page envelope returned by list queries.

use serde::Serialize;

use crate::PageRequest;

/// One page of results plus the counters clients need to navigate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, in store order.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// One-based number of this page.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Number of pages needed to hold `total` items.
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Wrap a slice of results produced for `request`.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        let pages = total.div_ceil(u64::from(request.page_size()));
        Self {
            items,
            total,
            page: request.page(),
            page_size: request.page_size(),
            total_pages: u32::try_from(pages).unwrap_or(u32::MAX),
        }
    }

    /// Transform every item while keeping the counters.
    #[must_use]
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

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(250, 100, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] size: u32, #[case] expected: u32) {
        let request = PageRequest::new(1, size).expect("valid request");
        let page: Page<()> = Page::new(Vec::new(), total, request);
        assert_eq!(page.total_pages, expected);
    }

    #[rstest]
    fn map_preserves_counters() {
        let request = PageRequest::new(3, 2).expect("valid request");
        let page = Page::new(vec![1, 2], 6, request).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.page, 3);
        assert_eq!(page.total_pages, 3);
    }
}

//! Validated page selection.

use serde::{Deserialize, Serialize};

/// Page size applied when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised while validating page parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Pages are numbered from one.
    #[error("page must be at least 1")]
    PageOutOfRange,
    /// The page size falls outside `1..=MAX_PAGE_SIZE`.
    #[error("page_size must be between 1 and {max}, got {requested}")]
    PageSizeOutOfRange {
        /// Size the caller asked for.
        requested: u32,
        /// Upper bound accepted.
        max: u32,
    },
}

/// One-based page number and page size.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageRequest", into = "RawPageRequest")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a page number and size.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is out of range.
    pub const fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::PageOutOfRange);
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange {
                requested: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        Ok(Self { page, page_size })
    }

    /// Build a request from optional query parameters, applying defaults.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is out of range.
    pub fn from_optional(
        page: Option<u32>,
        page_size: Option<u32>,
    ) -> Result<Self, PageRequestError> {
        Self::new(page.unwrap_or(1), page_size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows to skip, suitable for SQL `OFFSET`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Number of rows to fetch, suitable for SQL `LIMIT`.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawPageRequest {
    page: u32,
    page_size: u32,
}

impl TryFrom<RawPageRequest> for PageRequest {
    type Error = PageRequestError;

    fn try_from(value: RawPageRequest) -> Result<Self, Self::Error> {
        Self::new(value.page, value.page_size)
    }
}

impl From<PageRequest> for RawPageRequest {
    fn from(value: PageRequest) -> Self {
        Self {
            page: value.page,
            page_size: value.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 25, 100)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] size: u32, #[case] expected: i64) {
        let request = PageRequest::new(page, size).expect("valid request");
        assert_eq!(request.offset(), expected);
        assert_eq!(request.limit(), i64::from(size));
    }

    #[rstest]
    fn page_zero_is_rejected() {
        assert_eq!(
            PageRequest::new(0, 10),
            Err(PageRequestError::PageOutOfRange)
        );
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_PAGE_SIZE + 1)]
    fn page_size_outside_bounds_is_rejected(#[case] size: u32) {
        assert_eq!(
            PageRequest::new(1, size),
            Err(PageRequestError::PageSizeOutOfRange {
                requested: size,
                max: MAX_PAGE_SIZE,
            })
        );
    }

    #[rstest]
    fn missing_parameters_use_defaults() {
        let request = PageRequest::from_optional(None, None).expect("defaults are valid");
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[rstest]
    fn deserialisation_validates() {
        let result: Result<PageRequest, _> =
            serde_json::from_str(r#"{"page":0,"page_size":10}"#);
        assert!(result.is_err());
    }
}

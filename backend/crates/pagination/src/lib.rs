//! Page-number pagination primitives shared by listing endpoints.
//!
//! Listing endpoints accept an optional `page` (1-based) and `limit` from the
//! query string. [`PageRequest`] normalises those values into a validated
//! window, and [`Page`] carries one window of results together with the total
//! number of matching records so callers can report `numOfPages`.
//!
//! # Examples
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(Some(2), Some(5)).expect("valid window");
//! assert_eq!(request.offset(), 5);
//!
//! let page = Page::new(vec!["a", "b"], 7, request);
//! assert_eq!(page.num_of_pages(), 2);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not provide one.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u32 = 100;

/// Errors raised while normalising a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// The requested page size exceeds [`MAX_LIMIT`].
    #[error("limit must be at most {max}, got {requested}")]
    LimitTooLarge {
        /// Largest accepted page size.
        max: u32,
        /// Page size supplied by the caller.
        requested: u32,
    },
}

/// Validated pagination window.
///
/// `page` is 1-based. Missing or zero values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request from raw query values.
    ///
    /// # Errors
    /// Returns [`PageRequestError::LimitTooLarge`] when `limit` exceeds
    /// [`MAX_LIMIT`].
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.filter(|value| *value > 0).unwrap_or(1);
        let limit = limit.filter(|value| *value > 0).unwrap_or(DEFAULT_LIMIT);
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                max: MAX_LIMIT,
                requested: limit,
            });
        }
        Ok(Self { page, limit })
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of records to skip before this page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)).saturating_mul(u64::from(self.limit))
    }
}

/// One window of results plus the total size of the underlying result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap `items` fetched for `request` out of `total` matches.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// An empty result set for `request`.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), 0, request)
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total number of matching records across all pages.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The window this page was fetched with.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of pages needed to show every match at the current limit.
    #[must_use]
    pub fn num_of_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.limit))
    }

    /// Transform every item while keeping the window metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }

    /// Split the page into its items and total count.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total)
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for window normalisation and page arithmetic.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(0), Some(0), 1, DEFAULT_LIMIT)]
    #[case(Some(3), Some(25), 3, 25)]
    #[case(Some(1), Some(MAX_LIMIT), 1, MAX_LIMIT)]
    fn normalises_raw_values(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::new(page, limit).expect("window within bounds");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[rstest]
    fn rejects_oversized_limit() {
        let err = PageRequest::new(Some(1), Some(MAX_LIMIT + 1)).expect_err("limit too large");
        assert_eq!(
            err,
            PageRequestError::LimitTooLarge {
                max: MAX_LIMIT,
                requested: MAX_LIMIT + 1,
            }
        );
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(5, 3, 12)]
    fn offset_skips_previous_pages(#[case] page: u32, #[case] limit: u32, #[case] expected: u64) {
        let request = PageRequest::new(Some(page), Some(limit)).expect("valid window");
        assert_eq!(request.offset(), expected);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(30, 3)]
    fn num_of_pages_rounds_up(#[case] total: u64, #[case] expected: u64) {
        let page: Page<u8> = Page::new(Vec::new(), total, PageRequest::default());
        assert_eq!(page.num_of_pages(), expected);
    }

    #[rstest]
    fn map_preserves_metadata() {
        let request = PageRequest::new(Some(2), Some(2)).expect("valid window");
        let page = Page::new(vec![1_u8, 2], 4, request).map(|value| value.to_string());
        assert_eq!(page.items(), ["1".to_owned(), "2".to_owned()]);
        assert_eq!(page.total(), 4);
        assert_eq!(page.request(), request);
    }

    #[rstest]
    fn request_serialises_as_plain_fields() {
        let request = PageRequest::new(Some(4), Some(20)).expect("valid window");
        let value = serde_json::to_value(request).expect("serialise request");
        assert_eq!(value, serde_json::json!({ "page": 4, "limit": 20 }));
    }
}

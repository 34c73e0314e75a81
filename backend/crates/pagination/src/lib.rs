//! Page-number pagination primitives shared by list endpoints.
//!
//! A [`PageRequest`] is the validated form of the `page` and `page_size`
//! query parameters. A [`Page`] is the envelope returned to callers once the
//! store has produced one slice of results together with the total count.
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 10)?;
//! assert_eq!(request.offset(), 10);
//!
//! let page = Page::new(vec!["k", "l"], 12, request);
//! assert_eq!(page.total_pages, 2);
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

mod page;
mod request;

pub use page::Page;
pub use request::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PageRequestError};

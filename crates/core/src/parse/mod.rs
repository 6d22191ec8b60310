//! Pure parsers for values embedded in Admin API responses.
//!
//! Both parsers are isolated from HTTP so they can be tested directly:
//! - [`link`] - `page_info` continuation cursor from a `Link` response header
//! - [`staged_upload`] - storage key from a staged upload XML response

pub mod link;
pub mod staged_upload;

pub use link::{LinkHeaderError, PageCursor, next_page_cursor};
pub use staged_upload::{StagedUploadKeyError, staged_upload_key};

//! Cursor-based pagination via the `Link` response header.
//!
//! Shopify's REST Admin API paginates with a header of the form:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=abc>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=def>; rel="next"
//! ```
//!
//! Only the `rel="next"` entry matters; its `page_info` query parameter is
//! the opaque cursor for the following request.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Base used to resolve relative link targets.
const RELATIVE_BASE: &str = "http://localhost/";

/// Errors that can occur when extracting a cursor from a `Link` header.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkHeaderError {
    /// A `<` was not followed by a closing `>`.
    #[error("unterminated link target in Link header")]
    UnterminatedTarget,
    /// The `rel="next"` target is not a valid URL.
    #[error("invalid next link {url}: {reason}")]
    InvalidUrl {
        /// The raw link target.
        url: String,
        /// Why parsing failed.
        reason: String,
    },
    /// The `rel="next"` target has no `page_info` query parameter.
    #[error("next link has no page_info: {0}")]
    MissingPageInfo(String),
}

/// Opaque continuation token for the next page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    /// Wrap a raw `page_info` value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the cursor as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract the next-page cursor from a `Link` header value.
///
/// Returns `Ok(None)` when the header has no `rel="next"` entry, which marks
/// the last page.
///
/// # Errors
///
/// Returns an error if the header is malformed, or if a `rel="next"` entry
/// exists but carries no usable `page_info`.
pub fn next_page_cursor(header: &str) -> Result<Option<PageCursor>, LinkHeaderError> {
    for (target, params) in link_entries(header)? {
        if !params.split(';').any(is_rel_next) {
            continue;
        }

        let url = resolve(target)?;
        let page_info = url
            .query_pairs()
            .find(|(name, _)| name == "page_info")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| LinkHeaderError::MissingPageInfo(target.to_owned()))?;

        return Ok(Some(PageCursor(page_info)));
    }

    Ok(None)
}

/// Split a `Link` header into `(target, params)` pairs.
///
/// Targets are delimited by `<...>` rather than by commas because link
/// targets may themselves contain commas (e.g. `fields=id,variants`).
fn link_entries(header: &str) -> Result<Vec<(&str, &str)>, LinkHeaderError> {
    let mut entries = Vec::new();
    let mut rest = header;

    while let Some(open) = rest.find('<') {
        let after_open = rest.get(open + 1..).unwrap_or_default();
        let close = after_open
            .find('>')
            .ok_or(LinkHeaderError::UnterminatedTarget)?;
        let target = after_open.get(..close).unwrap_or_default();
        let tail = after_open.get(close + 1..).unwrap_or_default();
        let params_end = tail.find('<').unwrap_or(tail.len());
        entries.push((target.trim(), tail.get(..params_end).unwrap_or_default()));
        rest = tail.get(params_end..).unwrap_or_default();
    }

    Ok(entries)
}

fn is_rel_next(param: &str) -> bool {
    let param = param.trim().trim_end_matches(',').trim();
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("rel")
        && value
            .trim()
            .trim_matches('"')
            .split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("next"))
}

fn resolve(target: &str) -> Result<Url, LinkHeaderError> {
    let invalid = |e: url::ParseError| LinkHeaderError::InvalidUrl {
        url: target.to_owned(),
        reason: e.to_string(),
    };

    match Url::parse(target) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(RELATIVE_BASE)
            .and_then(|base| base.join(target))
            .map_err(invalid),
        Err(e) => Err(invalid(e)),
    }
}

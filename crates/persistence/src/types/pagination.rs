//! Pagination types for listing endpoints.
//!
//! Listings use offset paging with `$skip` / `$top` query parameters. A
//! [`PageRequest`] carries the raw caller values; [`Page`] is the envelope
//! handed back, including an absolute link to the next page when more items
//! remain.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ValidationError;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_BATCH_SIZE: u64 = 20;

/// Largest page size a caller may ask for.
pub const MAX_BATCH_SIZE: u64 = 100;

/// Query parameter carrying the number of items to skip.
pub const SKIP_PARAM: &str = "$skip";

/// Query parameter carrying the page size.
pub const TOP_PARAM: &str = "$top";

/// The paging window a caller asked for.
///
/// Values are kept signed so out-of-range input can be reported rather than
/// silently wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of items to skip.
    #[serde(rename = "$skip", default)]
    pub skip: Option<i64>,

    /// Number of items to return.
    #[serde(rename = "$top", default)]
    pub top: Option<i64>,
}

impl PageRequest {
    /// Creates a page request.
    pub fn new(skip: Option<i64>, top: Option<i64>) -> Self {
        Self { skip, top }
    }

    /// Checks that `skip` is non-negative and `top` is within `1..=100`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(skip) = self.skip {
            if skip < 0 {
                return Err(ValidationError::InvalidPagination {
                    parameter: SKIP_PARAM.to_string(),
                    message: format!("must be >= 0, got {skip}"),
                });
            }
        }
        if let Some(top) = self.top {
            if top < 1 || top as u64 > MAX_BATCH_SIZE {
                return Err(ValidationError::InvalidPagination {
                    parameter: TOP_PARAM.to_string(),
                    message: format!("must be between 1 and {MAX_BATCH_SIZE}, got {top}"),
                });
            }
        }
        Ok(())
    }

    /// Number of items to skip, defaulting to zero.
    pub fn skip_value(&self) -> u64 {
        self.skip.map(|s| s.max(0) as u64).unwrap_or(0)
    }

    /// The page size that will actually be used.
    ///
    /// Absent or non-positive values fall back to [`DEFAULT_BATCH_SIZE`];
    /// larger values are clamped to [`MAX_BATCH_SIZE`].
    pub fn batch_size(&self) -> u64 {
        match self.top {
            None => DEFAULT_BATCH_SIZE,
            Some(top) if top < 1 => DEFAULT_BATCH_SIZE,
            Some(top) if top as u64 > MAX_BATCH_SIZE => MAX_BATCH_SIZE,
            Some(top) => top as u64,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items in this page.
    pub items: Vec<T>,

    /// Whether more items follow this page.
    pub has_more_items: bool,

    /// Link to the next page, present only when `has_more_items` is true.
    pub next_link: Option<String>,
}

impl<T> Page<T> {
    /// Creates a page that is the last one.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more_items: false,
            next_link: None,
        }
    }

    /// Creates a page with a link to the next one.
    pub fn with_next(items: Vec<T>, next_link: impl Into<String>) -> Self {
        Self {
            items,
            has_more_items: true,
            next_link: Some(next_link.into()),
        }
    }

    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::last(Vec::new())
    }

    /// Returns true if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Strips any `$skip` / `$top` parameters from an absolute request URI.
///
/// Other query parameters are kept in their original order.
pub fn base_request_uri(uri: &str) -> Result<Url, ValidationError> {
    let mut url = Url::parse(uri).map_err(|_| ValidationError::InvalidUri {
        uri: uri.to_string(),
    })?;

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != SKIP_PARAM && key != TOP_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(retained)
            .finish();
        url.set_query(Some(&query));
    }

    Ok(url)
}

/// Builds the link to a page starting at `skip` with `top` items.
///
/// The parameters are appended literally so `$` stays readable.
pub fn page_link(base: &Url, skip: u64, top: u64) -> String {
    let paging = format!("{SKIP_PARAM}={skip}&{TOP_PARAM}={top}");
    let query = match base.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&{paging}"),
        _ => paging,
    };
    let mut url = base.clone();
    url.set_query(Some(&query));
    url.to_string()
}

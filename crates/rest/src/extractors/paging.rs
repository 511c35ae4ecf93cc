//! Paging extractor.
//!
//! Extracts `$skip`/`$top` and the absolute request URI that next-page links
//! are built from.

use axum::extract::{FromRequestParts, OriginalUri, Query};
use axum::http::request::Parts;
use todo_persistence::types::PageRequest;

use crate::error::RestError;
use crate::state::AppState;

/// Axum extractor for paging parameters.
///
/// Values are not range-checked here; the pagination engine validates them
/// before any storage call.
///
/// # Example
///
/// ```rust,ignore
/// use todo_rest::extractors::Paging;
///
/// async fn list_handler(paging: Paging) {
///     let top = paging.request().top;
///     let uri = paging.request_uri();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Paging {
    request: PageRequest,
    request_uri: String,
}

impl Paging {
    /// Creates a Paging from parts.
    pub fn new(request: PageRequest, request_uri: impl Into<String>) -> Self {
        Self {
            request,
            request_uri: request_uri.into(),
        }
    }

    /// The requested window.
    pub fn request(&self) -> &PageRequest {
        &self.request
    }

    /// Absolute URI of the current request, query included.
    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }
}

impl FromRequestParts<AppState> for Paging {
    type Rejection = RestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Query(request) = Query::<PageRequest>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::BadRequest {
                code: "invalid-pagination",
                message: e.body_text(),
            })?;

        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| uri.path());

        Ok(Paging::new(
            request,
            absolute_uri(state.base_url(), path_and_query),
        ))
    }
}

/// Joins the configured base URL with the request path and query.
fn absolute_uri(base_url: &str, path_and_query: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path_and_query.trim_start_matches('/')
    )
}

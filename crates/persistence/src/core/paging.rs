//! Turning a query into a page of results.

use tracing::debug;

use super::query::{EntityQuery, SortDirection, fields};
use crate::error::StorageResult;
use crate::types::pagination::{base_request_uri, page_link};
use crate::types::{Entity, Page, PageRequest};

/// Runs one page of `query`.
///
/// The total is counted over the query as given, then the query is ordered
/// by `createdDate` ascending (with `id` breaking ties) and windowed by the
/// request. When `skip + returned < total` the page carries a `next_link`:
/// `request_uri` with its `$skip` / `$top` replaced by the next window.
///
/// `request_uri` must be absolute. Invalid paging values and relative URIs
/// are rejected before the backend is touched.
pub async fn paginate<T: Entity>(
    query: EntityQuery<'_, T>,
    request: &PageRequest,
    request_uri: &str,
) -> StorageResult<Page<T>> {
    request.validate()?;
    let base = base_request_uri(request_uri)?;

    let skip = request.skip_value();
    let top = request.batch_size();

    let total = query.count().await?;
    let items = query
        .order_by(fields::CREATED_DATE, SortDirection::Ascending)
        .order_by(fields::ID, SortDirection::Ascending)
        .skip(skip)
        .take(top)
        .fetch()
        .await?;

    let returned = items.len() as u64;
    let has_more = skip + returned < total;

    debug!(
        kind = T::KIND,
        skip,
        top,
        total,
        returned,
        has_more,
        "Paginated query"
    );

    if has_more {
        let next = page_link(&base, skip + returned, top);
        Ok(Page::with_next(items, next))
    } else {
        Ok(Page::last(items))
    }
}

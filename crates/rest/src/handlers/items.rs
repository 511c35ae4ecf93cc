//! Item handlers.
//!
//! Every route is scoped to a list: an item addressed through a list it does
//! not belong to is reported as not found.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use todo_persistence::core::{fields, paginate};
use todo_persistence::types::{Entity, Page, TodoItem, TodoItemState};
use tracing::debug;

use super::lists::load_list;
use crate::dto::CreateUpdateTodoItem;
use crate::error::{RestError, RestResult};
use crate::extractors::Paging;
use crate::state::AppState;

async fn load_item(state: &AppState, list_id: &str, item_id: &str) -> RestResult<TodoItem> {
    match state.items().get(item_id).await? {
        Some(item) if item.list_id == list_id => Ok(item),
        _ => Err(RestError::not_found(TodoItem::KIND, item_id)),
    }
}

/// Moves the list's `updatedDate` to now.
///
/// The list is re-read first so a concurrent rename survives, and a list
/// deleted in the meantime stays deleted.
async fn touch_list(state: &AppState, list_id: &str) -> RestResult<()> {
    match state.lists().get(list_id).await? {
        Some(list) => {
            state.lists().save(list).await?;
        }
        None => debug!(list_id = %list_id, "List removed before touch, skipping"),
    }
    Ok(())
}

/// Handler for listing the items of a list.
///
/// # HTTP Request
///
/// `GET /todo/lists/{list_id}/items?$skip={skip}&$top={top}`
///
/// # Response
///
/// - `200 OK` - A page of items
/// - `400 Bad Request` - Invalid `$skip` or `$top`
/// - `404 Not Found` - No such list
pub async fn list_items_handler(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    paging: Paging,
) -> RestResult<Json<Page<TodoItem>>> {
    debug!(list_id = %list_id, "Processing list items request");

    paging.request().validate()?;
    load_list(&state, &list_id).await?;

    let query = state
        .items()
        .query()
        .filter_eq(fields::LIST_ID, list_id.as_str());
    let page = paginate(query, paging.request(), paging.request_uri()).await?;
    Ok(Json(page))
}

/// Handler for listing the items of a list that are in one state.
///
/// # HTTP Request
///
/// `GET /todo/lists/{list_id}/state/{state}?$skip={skip}&$top={top}`
///
/// Also served at `/todo/lists/{list_id}/items/state/{state}`.
///
/// # Response
///
/// - `200 OK` - A page of items
/// - `400 Bad Request` - Unknown state, or invalid `$skip` or `$top`
/// - `404 Not Found` - No such list
pub async fn list_items_by_state_handler(
    State(state): State<AppState>,
    Path((list_id, item_state)): Path<(String, String)>,
    paging: Paging,
) -> RestResult<Json<Page<TodoItem>>> {
    debug!(list_id = %list_id, state = %item_state, "Processing items by state request");

    let item_state: TodoItemState = item_state.parse()?;
    paging.request().validate()?;
    load_list(&state, &list_id).await?;

    let query = state
        .items()
        .query()
        .filter_eq(fields::LIST_ID, list_id.as_str())
        .filter_eq(fields::STATE, item_state.as_str());
    let page = paginate(query, paging.request(), paging.request_uri()).await?;
    Ok(Json(page))
}

/// Handler for creating an item in a list.
///
/// # HTTP Request
///
/// `POST /todo/lists/{list_id}/items`
///
/// # Response
///
/// - `201 Created` - The stored item, with a `Location` header
/// - `400 Bad Request` - Malformed body, blank name, or unknown state
/// - `404 Not Found` - No such list
pub async fn create_item_handler(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    body: Result<Json<CreateUpdateTodoItem>, JsonRejection>,
) -> RestResult<Response> {
    let Json(body) = body?;
    body.validate()?;
    debug!(list_id = %list_id, name = %body.name, "Processing create item request");

    load_list(&state, &list_id).await?;
    let item = body.into_item(&list_id)?;

    let saved = state.items().save(item).await?;
    touch_list(&state, &list_id).await?;

    let location = format!(
        "{}/todo/lists/{}/items/{}",
        state.base_url(),
        list_id,
        saved.id()
    );
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    )
        .into_response())
}

/// Handler for reading one item.
///
/// # HTTP Request
///
/// `GET /todo/lists/{list_id}/items/{item_id}`
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> RestResult<Json<TodoItem>> {
    debug!(list_id = %list_id, item_id = %item_id, "Processing get item request");
    Ok(Json(load_item(&state, &list_id, &item_id).await?))
}

/// Handler for replacing an item's fields.
///
/// An absent or empty `state` keeps the stored one.
///
/// # HTTP Request
///
/// `PUT /todo/lists/{list_id}/items/{item_id}`
///
/// # Response
///
/// - `200 OK` - The updated item
/// - `400 Bad Request` - Malformed body, blank name, or unknown state
/// - `404 Not Found` - No such list, or the item is not in it
pub async fn replace_item_handler(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(String, String)>,
    body: Result<Json<CreateUpdateTodoItem>, JsonRejection>,
) -> RestResult<Json<TodoItem>> {
    let Json(body) = body?;
    body.validate()?;
    debug!(list_id = %list_id, item_id = %item_id, "Processing replace item request");

    load_list(&state, &list_id).await?;
    let mut item = load_item(&state, &list_id, &item_id).await?;
    body.apply_to(&mut item)?;

    let saved = state.items().save(item).await?;
    touch_list(&state, &list_id).await?;
    Ok(Json(saved))
}

/// Handler for deleting an item.
///
/// # HTTP Request
///
/// `DELETE /todo/lists/{list_id}/items/{item_id}`
///
/// # Response
///
/// - `204 No Content` - Deleted
/// - `404 Not Found` - No such list, or the item is not in it
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> RestResult<StatusCode> {
    debug!(list_id = %list_id, item_id = %item_id, "Processing delete item request");

    load_list(&state, &list_id).await?;
    load_item(&state, &list_id, &item_id).await?;

    if !state.items().delete(&item_id).await? {
        return Err(RestError::not_found(TodoItem::KIND, item_id));
    }
    touch_list(&state, &list_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

//! List handlers.
//!
//! `GET|POST /todo/lists` and `GET|PUT|DELETE /todo/lists/{list_id}`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use todo_persistence::core::{fields, paginate};
use todo_persistence::types::{Entity, Page, TodoList};
use tracing::debug;

use crate::dto::CreateUpdateTodoList;
use crate::error::{RestError, RestResult};
use crate::extractors::Paging;
use crate::state::AppState;

/// Loads a list or fails with 404.
pub(crate) async fn load_list(state: &AppState, list_id: &str) -> RestResult<TodoList> {
    state
        .lists()
        .get(list_id)
        .await?
        .ok_or_else(|| RestError::not_found(TodoList::KIND, list_id))
}

/// Handler for listing all lists, one page at a time.
///
/// # HTTP Request
///
/// `GET /todo/lists?$skip={skip}&$top={top}`
///
/// # Response
///
/// - `200 OK` - A page of lists
/// - `400 Bad Request` - Invalid `$skip` or `$top`
pub async fn list_lists_handler(
    State(state): State<AppState>,
    paging: Paging,
) -> RestResult<Json<Page<TodoList>>> {
    debug!(
        skip = ?paging.request().skip,
        top = ?paging.request().top,
        "Processing list lists request"
    );

    let page = paginate(state.lists().query(), paging.request(), paging.request_uri()).await?;
    Ok(Json(page))
}

/// Handler for creating a list.
///
/// # HTTP Request
///
/// `POST /todo/lists`
///
/// # Response
///
/// - `201 Created` - The stored list, with a `Location` header
/// - `400 Bad Request` - Malformed body or blank name
pub async fn create_list_handler(
    State(state): State<AppState>,
    body: Result<Json<CreateUpdateTodoList>, JsonRejection>,
) -> RestResult<Response> {
    let Json(body) = body?;
    body.validate()?;
    debug!(name = %body.name, "Processing create list request");

    let saved = state.lists().save(body.into_list()).await?;
    let location = format!("{}/todo/lists/{}", state.base_url(), saved.id());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(saved),
    )
        .into_response())
}

/// Handler for reading one list.
///
/// # HTTP Request
///
/// `GET /todo/lists/{list_id}`
pub async fn get_list_handler(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> RestResult<Json<TodoList>> {
    debug!(list_id = %list_id, "Processing get list request");
    Ok(Json(load_list(&state, &list_id).await?))
}

/// Handler for replacing a list's name and description.
///
/// # HTTP Request
///
/// `PUT /todo/lists/{list_id}`
///
/// # Response
///
/// - `200 OK` - The updated list
/// - `400 Bad Request` - Malformed body or blank name
/// - `404 Not Found` - No such list
pub async fn replace_list_handler(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
    body: Result<Json<CreateUpdateTodoList>, JsonRejection>,
) -> RestResult<Json<TodoList>> {
    let Json(body) = body?;
    body.validate()?;
    debug!(list_id = %list_id, "Processing replace list request");

    let mut list = load_list(&state, &list_id).await?;
    body.apply_to(&mut list);
    let saved = state.lists().save(list).await?;
    Ok(Json(saved))
}

/// Handler for deleting a list and its items.
///
/// The list goes first, then each of its items one by one. Nothing spans the
/// individual deletes.
///
/// # HTTP Request
///
/// `DELETE /todo/lists/{list_id}`
///
/// # Response
///
/// - `204 No Content` - Deleted
/// - `404 Not Found` - No such list
pub async fn delete_list_handler(
    State(state): State<AppState>,
    Path(list_id): Path<String>,
) -> RestResult<StatusCode> {
    debug!(list_id = %list_id, "Processing delete list request");

    if !state.lists().delete(&list_id).await? {
        return Err(RestError::not_found(TodoList::KIND, list_id));
    }

    let items = state
        .items()
        .query()
        .filter_eq(fields::LIST_ID, list_id.as_str())
        .fetch()
        .await?;
    let mut removed = 0usize;
    for item in &items {
        if state.items().delete(item.id()).await? {
            removed += 1;
        }
    }
    debug!(list_id = %list_id, removed, "Cascaded item deletes");

    Ok(StatusCode::NO_CONTENT)
}

//! Todo route configuration.

use axum::{
    Router,
    routing::get,
};

use crate::handlers;
use crate::state::AppState;

/// Creates all todo REST API routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET|POST /todo/lists` - Page through or create lists
/// - `GET|PUT|DELETE /todo/lists/{list_id}` - Read, replace, delete a list
/// - `GET|POST /todo/lists/{list_id}/items` - Page through or create items
/// - `GET|PUT|DELETE /todo/lists/{list_id}/items/{item_id}` - Read, replace, delete an item
/// - `GET /todo/lists/{list_id}/state/{state}` - Page through items in one state
///   (also mounted at `/todo/lists/{list_id}/items/state/{state}`)
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route(
            "/todo/lists",
            get(handlers::list_lists_handler).post(handlers::create_list_handler),
        )
        .route(
            "/todo/lists/{list_id}",
            get(handlers::get_list_handler)
                .put(handlers::replace_list_handler)
                .delete(handlers::delete_list_handler),
        )
        .route(
            "/todo/lists/{list_id}/items",
            get(handlers::list_items_handler).post(handlers::create_item_handler),
        )
        .route(
            "/todo/lists/{list_id}/items/{item_id}",
            get(handlers::get_item_handler)
                .put(handlers::replace_item_handler)
                .delete(handlers::delete_item_handler),
        )
        .route(
            "/todo/lists/{list_id}/state/{state}",
            get(handlers::list_items_by_state_handler),
        )
        .route(
            "/todo/lists/{list_id}/items/state/{state}",
            get(handlers::list_items_by_state_handler),
        )
        .with_state(state)
}

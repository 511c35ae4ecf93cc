//! HTTP handlers for the todo endpoints.
//!
//! - [`lists`] - List CRUD and paging
//! - [`items`] - Item CRUD, paging, and the by-state listing
//! - [`health`] - Health check

pub mod health;
pub mod items;
pub mod lists;

pub use health::health_handler;
pub use items::{
    create_item_handler, delete_item_handler, get_item_handler, list_items_by_state_handler,
    list_items_handler, replace_item_handler,
};
pub use lists::{
    create_list_handler, delete_list_handler, get_list_handler, list_lists_handler,
    replace_list_handler,
};

//! Core types for the persistence layer.
//!
//! - [`entity`] - Shared identity/timestamp metadata and the [`Entity`] trait
//! - [`todo_list`] / [`todo_item`] - The two stored entity kinds
//! - [`pagination`] - Page requests and the page envelope

pub mod entity;
pub mod pagination;
pub mod todo_item;
pub mod todo_list;

pub use entity::{Entity, EntityMeta, new_entity_id};
pub use pagination::{DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE, Page, PageRequest};
pub use todo_item::{TodoItem, TodoItemState};
pub use todo_list::TodoList;

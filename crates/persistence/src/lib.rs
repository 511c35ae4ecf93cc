//! Todo Service Persistence Layer
//!
//! This crate stores to-do lists and their items behind a single generic
//! repository contract, with interchangeable backends and an offset-based
//! pagination engine shared by every listing.
//!
//! # Features
//!
//! - **Repository contract**: [`Repository<T>`](core::Repository) with lazy
//!   queries, point lookup, upsert and idempotent delete
//! - **Backends**: a process-local [`MemoryRepository`] and a
//!   [`DocumentRepository`] that keeps each entity kind in its own container
//! - **Pagination**: [`paginate`](core::paginate) turns any query into a
//!   [`Page`] with a ready-made next link
//!
//! # Backend Features
//!
//! - `cosmos` (default) - HTTP client for the Cosmos DB SQL REST API
//!
//! Without `cosmos` the document backend is still available over any
//! [`DocumentClient`](backends::document::DocumentClient) implementation.
//!
//! # Architecture
//!
//! - [`types`] - Entities, item state, page request and page envelope
//! - [`error`] - Error types for all operations
//! - [`core`] - The repository trait, queries and the pagination engine
//! - [`backends`] - Backend implementations
//!
//! # Quick Start
//!
//! ```
//! use todo_persistence::backends::MemoryRepository;
//! use todo_persistence::core::{Repository, fields, paginate};
//! use todo_persistence::types::{Entity, PageRequest, TodoItem, TodoList};
//!
//! # tokio_test::block_on(async {
//! let lists = MemoryRepository::<TodoList>::new();
//! let items = MemoryRepository::<TodoItem>::new();
//!
//! let groceries = lists.save(TodoList::new("Groceries")).await?;
//! items.save(TodoItem::new(groceries.id(), "Milk")).await?;
//!
//! let page = paginate(
//!     items.query().filter_eq(fields::LIST_ID, groceries.id()),
//!     &PageRequest::default(),
//!     "http://localhost:8080/todo/lists",
//! )
//! .await?;
//! assert_eq!(page.items.len(), 1);
//! assert!(!page.has_more_items);
//! # Ok::<(), todo_persistence::StorageError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use backends::{DocumentRepository, DocumentStore, DocumentStoreConfig, MemoryRepository};
pub use error::{BackendError, StorageError, StorageResult, ValidationError};
pub use types::{Entity, Page, PageRequest, TodoItem, TodoItemState, TodoList};

// Re-export core traits
pub use core::{EntityQuery, QuerySource, Repository, paginate};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

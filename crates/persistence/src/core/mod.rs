//! Core storage traits and abstractions.
//!
//! - [`Repository`] - The per-entity-kind storage contract
//! - [`EntityQuery`] / [`QuerySource`] - Lazy, composable queries
//! - [`paginate`] - Offset paging over any query
//!
//! # Example: Implementing a Backend
//!
//! ```ignore
//! use async_trait::async_trait;
//! use todo_persistence::core::{EntityQuery, QuerySource, QuerySpec, Repository};
//!
//! struct MyRepository { /* ... */ }
//!
//! #[async_trait]
//! impl<T: Entity> QuerySource<T> for MyRepository {
//!     async fn fetch(&self, spec: &QuerySpec) -> StorageResult<Vec<T>> { /* ... */ }
//!     async fn count(&self, spec: &QuerySpec) -> StorageResult<u64> { /* ... */ }
//! }
//!
//! #[async_trait]
//! impl<T: Entity> Repository<T> for MyRepository {
//!     fn backend_name(&self) -> &'static str { "mine" }
//!     fn query(&self) -> EntityQuery<'_, T> { EntityQuery::new(self) }
//!     // get, save, delete ...
//! }
//! ```

pub mod paging;
pub mod query;
pub mod repository;

pub use paging::paginate;
pub use query::{
    EntityQuery, FieldFilter, QuerySource, QuerySpec, SortDirection, SortKey, fields,
};
pub use repository::Repository;

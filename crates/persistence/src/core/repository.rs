//! The repository contract every backend implements.

use async_trait::async_trait;

use super::query::EntityQuery;
use crate::error::StorageResult;
use crate::types::Entity;

/// Generic storage for one entity kind.
///
/// Implementations are shared across request handlers, so every method takes
/// `&self` and the trait is object safe; callers usually hold an
/// `Arc<dyn Repository<T>>`.
///
/// # Save semantics
///
/// [`save`](Repository::save) is an upsert. An entity without an id gets a
/// fresh one. If the id is already stored the entity replaces the stored copy
/// but keeps the stored `createdDate`; otherwise `createdDate` is set to the
/// current time. Every save sets `updatedDate` to the current time.
///
/// # Cancellation
///
/// Dropping a returned future abandons the operation. A save whose future is
/// dropped may or may not have taken effect.
///
/// # Example
///
/// ```ignore
/// use todo_persistence::core::Repository;
/// use todo_persistence::types::TodoList;
///
/// async fn example(repo: &dyn Repository<TodoList>) -> StorageResult<()> {
///     let saved = repo.save(TodoList::new("Groceries")).await?;
///     let found = repo.get(saved.id()).await?;
///     assert!(found.is_some());
///     assert!(repo.delete(saved.id()).await?);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Starts a query over every stored entity of this kind.
    ///
    /// The query is not evaluated until it is fetched or counted.
    fn query(&self) -> EntityQuery<'_, T>;

    /// Looks up an entity by id. Returns `None` if it is not stored.
    async fn get(&self, id: &str) -> StorageResult<Option<T>>;

    /// Inserts or replaces an entity and returns the stored form.
    async fn save(&self, entity: T) -> StorageResult<T>;

    /// Removes an entity by id.
    ///
    /// Returns `true` if something was removed and `false` if the id was not
    /// stored.
    async fn delete(&self, id: &str) -> StorageResult<bool>;
}

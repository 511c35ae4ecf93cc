//! Process-local backend for development and tests.
//!
//! Entities live in a single id-keyed map behind a lock. Every save and
//! delete holds the write guard for its whole read-modify-write and nothing
//! else, so there is no await point while the lock is held.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, instrument};

use crate::core::{EntityQuery, QuerySource, QuerySpec, Repository};
use crate::error::StorageResult;
use crate::types::{Entity, new_entity_id};

/// In-memory repository for one entity kind.
///
/// Cloning is cheap and clones share the same contents.
pub struct MemoryRepository<T> {
    contents: Arc<RwLock<HashMap<String, T>>>,
}

impl<T: Entity> MemoryRepository<T> {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self {
            contents: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Returns the number of stored entities.
    pub fn len(&self) -> usize {
        self.contents.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.contents.read().is_empty()
    }

    fn snapshot(&self) -> Vec<T> {
        self.contents.read().values().cloned().collect()
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            contents: Arc::clone(&self.contents),
        }
    }
}

impl<T> fmt::Debug for MemoryRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("len", &self.contents.read().len())
            .finish()
    }
}

#[async_trait]
impl<T: Entity> QuerySource<T> for MemoryRepository<T> {
    async fn fetch(&self, spec: &QuerySpec) -> StorageResult<Vec<T>> {
        spec.apply(self.snapshot())
    }

    async fn count(&self, spec: &QuerySpec) -> StorageResult<u64> {
        spec.count(&self.snapshot())
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn query(&self) -> EntityQuery<'_, T> {
        EntityQuery::new(self)
    }

    async fn get(&self, id: &str) -> StorageResult<Option<T>> {
        Ok(self.contents.read().get(id).cloned())
    }

    #[instrument(skip(self, entity), fields(kind = T::KIND))]
    async fn save(&self, mut entity: T) -> StorageResult<T> {
        let mut contents = self.contents.write();

        if !entity.has_id() {
            let mut id = new_entity_id();
            while contents.contains_key(&id) {
                id = new_entity_id();
            }
            entity.set_id(id);
        }

        let now = Utc::now();
        let created = contents
            .get(entity.id())
            .map(|existing| existing.created_date())
            .unwrap_or(now);
        entity.set_created_date(created);
        entity.set_updated_date(now);

        let replaced = contents
            .insert(entity.id().to_string(), entity.clone())
            .is_some();
        debug!(id = %entity.id(), replaced, "Saved entity");

        Ok(entity)
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, id: &str) -> StorageResult<bool> {
        let removed = self.contents.write().remove(id).is_some();
        debug!(removed, "Deleted entity");
        Ok(removed)
    }
}

//! Application state for the todo REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: one repository per entity kind plus the server
//! configuration.

use std::sync::Arc;

use todo_persistence::core::Repository;
use todo_persistence::types::{TodoItem, TodoList};

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// Repositories are held as trait objects so the same router serves either
/// backend.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use todo_persistence::MemoryRepository;
/// use todo_persistence::types::{TodoItem, TodoList};
/// use todo_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(
///     Arc::new(MemoryRepository::<TodoList>::new()),
///     Arc::new(MemoryRepository::<TodoItem>::new()),
///     ServerConfig::for_testing(),
/// );
/// assert_eq!(state.backend_name(), "memory");
/// ```
pub struct AppState {
    lists: Arc<dyn Repository<TodoList>>,
    items: Arc<dyn Repository<TodoItem>>,
    config: Arc<ServerConfig>,
}

// Manually implement Clone since the repositories are shared trait objects
impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            lists: Arc::clone(&self.lists),
            items: Arc::clone(&self.items),
            config: Arc::clone(&self.config),
        }
    }
}

impl AppState {
    /// Creates a new AppState with the given repositories and configuration.
    pub fn new(
        lists: Arc<dyn Repository<TodoList>>,
        items: Arc<dyn Repository<TodoItem>>,
        config: ServerConfig,
    ) -> Self {
        Self {
            lists,
            items,
            config: Arc::new(config),
        }
    }

    /// Returns the list repository.
    pub fn lists(&self) -> &dyn Repository<TodoList> {
        self.lists.as_ref()
    }

    /// Returns the item repository.
    pub fn items(&self) -> &dyn Repository<TodoItem> {
        self.items.as_ref()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the base URL for the server, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Name of the backend serving the list repository.
    pub fn backend_name(&self) -> &'static str {
        self.lists.backend_name()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend_name())
            .field("base_url", &self.base_url())
            .finish()
    }
}

//! REST API test harness.

use std::sync::Arc;

use axum_test::{TestResponse, TestServer};
use serde_json::Value;
use todo_persistence::MemoryRepository;
use todo_persistence::core::Repository;
use todo_persistence::types::{TodoItem, TodoItemState, TodoList};
use todo_rest::{ServerConfig, create_app_with_config};

/// Test server backed by in-memory repositories the test can also reach
/// directly.
pub struct TestHarness {
    /// The test server instance.
    pub server: TestServer,
    /// The list repository behind the server.
    pub lists: Arc<MemoryRepository<TodoList>>,
    /// The item repository behind the server.
    pub items: Arc<MemoryRepository<TodoItem>>,
    /// Server configuration.
    pub config: ServerConfig,
}

impl TestHarness {
    /// Creates a harness with the testing configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let lists = Arc::new(MemoryRepository::<TodoList>::new());
        let items = Arc::new(MemoryRepository::<TodoItem>::new());
        let app = create_app_with_config(lists.clone(), items.clone(), config.clone());
        let server = TestServer::new(app).expect("Failed to create test server");
        Self {
            server,
            lists,
            items,
            config,
        }
    }

    /// Stores a list directly in the repository.
    pub async fn seed_list(&self, name: &str) -> TodoList {
        self.lists
            .save(TodoList::new(name))
            .await
            .expect("Failed to seed list")
    }

    /// Stores an item directly in the repository.
    pub async fn seed_item(&self, list_id: &str, name: &str, state: TodoItemState) -> TodoItem {
        self.items
            .save(TodoItem::new(list_id, name).with_state(state))
            .await
            .expect("Failed to seed item")
    }

    /// Makes a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.server.get(path).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        self.server.post(path).json(body).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        self.server.put(path).json(body).await
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.server.delete(path).await
    }
}

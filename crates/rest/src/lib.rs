//! # todo-rest - REST API for to-do lists and items
//!
//! This crate exposes the todo repositories over HTTP using axum. Handlers are
//! thin: they validate input, call the [`Repository`](todo_persistence::core::Repository)
//! contract, and page results with [`paginate`](todo_persistence::core::paginate).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use todo_persistence::MemoryRepository;
//! use todo_persistence::types::{TodoItem, TodoList};
//! use todo_rest::{create_app_with_config, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let app = create_app_with_config(
//!         Arc::new(MemoryRepository::<TodoList>::new()),
//!         Arc::new(MemoryRepository::<TodoItem>::new()),
//!         config.clone(),
//!     );
//!
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! | Method | URL Pattern | Description |
//! |--------|-------------|-------------|
//! | GET | `/todo/lists` | Page through lists |
//! | POST | `/todo/lists` | Create a list |
//! | GET | `/todo/lists/{list_id}` | Read a list |
//! | PUT | `/todo/lists/{list_id}` | Replace a list |
//! | DELETE | `/todo/lists/{list_id}` | Delete a list and its items |
//! | GET | `/todo/lists/{list_id}/items` | Page through a list's items |
//! | POST | `/todo/lists/{list_id}/items` | Create an item |
//! | GET | `/todo/lists/{list_id}/items/{item_id}` | Read an item |
//! | PUT | `/todo/lists/{list_id}/items/{item_id}` | Replace an item |
//! | DELETE | `/todo/lists/{list_id}/items/{item_id}` | Delete an item |
//! | GET | `/todo/lists/{list_id}/state/{state}` | Page through items in one state |
//! | GET | `/todo/lists/{list_id}/items/state/{state}` | Same as above |
//! | GET | `/health` | Health check |
//!
//! Paged endpoints accept `$skip` (default 0) and `$top` (default 20, at
//! most 100) and answer with `{ "items", "hasMoreItems", "nextLink" }`.
//!
//! ## Error Handling
//!
//! Errors are returned as `{ "error": { "code", "message" } }`:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Invalid body, paging parameters, or state |
//! | 404 | List or item not found |
//! | 500 | Backend failure |
//! | 503 | Backend unavailable |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their HTTP mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (repositories, configuration)
//! - [`dto`] - Request bodies
//! - [`handlers`] - HTTP request handlers
//! - [`extractors`] - Axum extractors
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::{ServerConfig, StorageBackendMode};
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use todo_persistence::core::Repository;
use todo_persistence::types::{TodoItem, TodoList};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app(
    lists: Arc<dyn Repository<TodoList>>,
    items: Arc<dyn Repository<TodoItem>>,
) -> Router {
    create_app_with_config(lists, items, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// This function sets up all routes plus the tracing, timeout, and (when
/// enabled) CORS layers.
///
/// # Arguments
///
/// * `lists` - Repository for lists
/// * `items` - Repository for items
/// * `config` - Server configuration
pub fn create_app_with_config(
    lists: Arc<dyn Repository<TodoList>>,
    items: Arc<dyn Repository<TodoItem>>,
    config: ServerConfig,
) -> Router {
    create_app_with_state(AppState::new(lists, items, config))
}

/// Creates the Axum application around an existing state.
pub fn create_app_with_state(state: AppState) -> Router {
    let config = state.config().clone();
    info!(
        "Creating REST API server with backend: {}",
        state.backend_name()
    );

    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG` takes
/// precedence over `level` when set.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "todo_rest={level},todo_persistence={level},todo_server={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

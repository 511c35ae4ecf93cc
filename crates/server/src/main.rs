//! To-do list server.
//!
//! Serves the todo REST API over the in-memory or document store backend.

use std::sync::Arc;

use clap::Parser;
use todo_persistence::MemoryRepository;
use todo_persistence::types::{TodoItem, TodoList};
use todo_rest::{AppState, ServerConfig, StorageBackendMode, create_app_with_state, init_logging};
use tracing::info;

/// Starts the Axum HTTP server and runs until ctrl-c or SIGTERM.
async fn serve(state: AppState, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_app_with_state(state);
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    info!(
        port = config.port,
        host = %config.host,
        storage_backend = %backend_mode,
        "Starting todo server"
    );

    match backend_mode {
        StorageBackendMode::Memory => start_memory(config).await,
        StorageBackendMode::Cosmos => start_cosmos(config).await,
    }
}

/// Starts the server with the in-memory backend.
async fn start_memory(config: ServerConfig) -> anyhow::Result<()> {
    info!("Initializing in-memory backend; data is lost on shutdown");
    let state = AppState::new(
        Arc::new(MemoryRepository::<TodoList>::new()),
        Arc::new(MemoryRepository::<TodoItem>::new()),
        config.clone(),
    );
    serve(state, &config).await
}

/// Starts the server with the document store backend.
#[cfg(feature = "cosmos")]
async fn start_cosmos(config: ServerConfig) -> anyhow::Result<()> {
    use todo_persistence::DocumentStore;
    use todo_persistence::core::Repository;

    let store_config = config
        .document_store_config()
        .ok_or_else(|| anyhow::anyhow!("AZURE_COSMOS_ENDPOINT is not set"))?;
    let store = DocumentStore::connect(store_config)?;

    let lists = store.repository::<TodoList>();
    let items = store.repository::<TodoItem>();

    // Startup probe; failures are logged, not fatal.
    for (container, probe) in [
        (lists.container().to_string(), lists.query().count().await),
        (items.container().to_string(), items.query().count().await),
    ] {
        match probe {
            Ok(count) => info!(container = %container, documents = count, "Container reachable"),
            Err(e) => tracing::warn!(container = %container, error = %e, "Container probe failed"),
        }
    }

    let state = AppState::new(Arc::new(lists), Arc::new(items), config.clone());
    serve(state, &config).await
}

/// Fallback when the cosmos feature is not enabled.
#[cfg(not(feature = "cosmos"))]
async fn start_cosmos(_config: ServerConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "The cosmos backend requires the 'cosmos' feature. \
         Build with: cargo build -p todo-server --features cosmos"
    )
}

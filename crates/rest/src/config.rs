//! Server configuration for the todo REST API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `TODO_SERVER_PORT` | 8080 | Server port |
//! | `TODO_SERVER_HOST` | 127.0.0.1 | Host to bind |
//! | `TODO_LOG_LEVEL` | info | Log level |
//! | `TODO_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `TODO_ENABLE_CORS` | true | Enable CORS |
//! | `TODO_CORS_ORIGINS` | * | Allowed origins |
//! | `TODO_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `TODO_CORS_HEADERS` | * | Allowed headers |
//! | `TODO_BASE_URL` | http://localhost:8080 | Base for absolute next-page links |
//! | `TODO_STORAGE_BACKEND` | (derived) | `memory` or `cosmos` |
//! | `AZURE_COSMOS_ENDPOINT` | unset | Document store endpoint |
//! | `TODO_COSMOS_DATABASE` | Todo | Document store database |
//! | `TODO_COSMOS_TOKEN` | unset | Bearer token for the document store |
//!
//! When `TODO_STORAGE_BACKEND` is unset the document store is used if
//! `AZURE_COSMOS_ENDPOINT` is set, and the in-memory backend otherwise.
//!
//! # Example
//!
//! ```rust
//! use todo_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     enable_cors: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use todo_persistence::DocumentStoreConfig;

/// Which repository backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// Process-local maps; data is lost on restart.
    Memory,
    /// Document store reached over HTTP.
    Cosmos,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Memory => write!(f, "memory"),
            StorageBackendMode::Cosmos => write!(f, "cosmos"),
        }
    }
}

impl FromStr for StorageBackendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(StorageBackendMode::Memory),
            "cosmos" | "cosmosdb" | "document" => Ok(StorageBackendMode::Cosmos),
            other => Err(format!(
                "unknown storage backend '{other}' (expected 'memory' or 'cosmos')"
            )),
        }
    }
}

/// Server configuration for the todo REST API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server")]
#[command(about = "To-do list REST API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "TODO_SERVER_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "TODO_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "TODO_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "TODO_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "TODO_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "TODO_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "TODO_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "TODO_CORS_HEADERS", default_value = "*")]
    pub cors_headers: String,

    /// Base URL for the server (used in Location headers and next-page links).
    #[arg(long, env = "TODO_BASE_URL", default_value = "http://localhost:8080")]
    pub base_url: String,

    /// Storage backend: memory or cosmos.
    #[arg(long, env = "TODO_STORAGE_BACKEND")]
    pub storage_backend: Option<String>,

    /// Document store account endpoint.
    #[arg(long, env = "AZURE_COSMOS_ENDPOINT")]
    pub cosmos_endpoint: Option<String>,

    /// Document store database name.
    #[arg(long, env = "TODO_COSMOS_DATABASE", default_value = "Todo")]
    pub cosmos_database: String,

    /// Bearer token for the document store.
    #[arg(long, env = "TODO_COSMOS_TOKEN", hide_env_values = true)]
    pub cosmos_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:8080".to_string(),
            storage_backend: None,
            cosmos_endpoint: None,
            cosmos_database: "Todo".to_string(),
            cosmos_token: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        // Try to parse from environment, falling back to defaults
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Resolves which storage backend to run on.
    ///
    /// An explicit `storage_backend` wins; otherwise the presence of a
    /// document store endpoint selects it.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, String> {
        match &self.storage_backend {
            Some(name) => name.parse(),
            None if self.cosmos_endpoint.is_some() => Ok(StorageBackendMode::Cosmos),
            None => Ok(StorageBackendMode::Memory),
        }
    }

    /// Builds the document store configuration, if an endpoint is set.
    pub fn document_store_config(&self) -> Option<DocumentStoreConfig> {
        let endpoint = self.cosmos_endpoint.as_ref()?;
        let mut config =
            DocumentStoreConfig::new(endpoint.clone()).with_database(self.cosmos_database.clone());
        if let Some(token) = &self.cosmos_token {
            config = config.with_token(token.clone());
        }
        config.request_timeout_secs = self.request_timeout;
        Some(config)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        match url::Url::parse(&self.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => errors.push(format!(
                "Base URL must be an absolute http(s) URL, got '{}'",
                self.base_url
            )),
        }

        match self.storage_backend_mode() {
            Ok(StorageBackendMode::Cosmos) => match self.document_store_config() {
                Some(store) => {
                    if let Err(e) = store.validate() {
                        errors.push(e.to_string());
                    }
                }
                None => errors.push(
                    "The cosmos backend requires AZURE_COSMOS_ENDPOINT to be set".to_string(),
                ),
            },
            Ok(StorageBackendMode::Memory) => {}
            Err(e) => errors.push(e),
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and the in-memory backend.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            base_url: "http://localhost:8080".to_string(),
            storage_backend: Some("memory".to_string()),
            cosmos_endpoint: None,
            cosmos_database: "Todo".to_string(),
            cosmos_token: None,
        }
    }
}

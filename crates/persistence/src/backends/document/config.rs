use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{BackendError, StorageError, StorageResult};

/// Configuration for the document store backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStoreConfig {
    /// Account endpoint, for example `https://myaccount.documents.azure.com:443/`.
    pub endpoint: String,

    /// Database holding one container per entity kind.
    #[serde(default = "default_database")]
    pub database: String,

    /// Bearer token sent with every request.
    ///
    /// When unset, requests are sent unauthenticated (local emulators and
    /// test doubles).
    #[serde(default)]
    pub token: Option<String>,

    /// Container name overrides keyed by entity kind.
    ///
    /// Kinds without an entry use a container named after the kind.
    #[serde(default)]
    pub containers: HashMap<String, String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_database() -> String {
    "Todo".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            database: default_database(),
            token: None,
            containers: HashMap::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl DocumentStoreConfig {
    /// Creates a configuration for an endpoint with default settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Sets the database name.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Sets the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Maps an entity kind to a specific container.
    pub fn with_container(mut self, kind: impl Into<String>, container: impl Into<String>) -> Self {
        self.containers.insert(kind.into(), container.into());
        self
    }

    /// Returns the container used for an entity kind.
    pub fn container_for<'a>(&'a self, kind: &'a str) -> &'a str {
        self.containers.get(kind).map(String::as_str).unwrap_or(kind)
    }

    /// Checks that the configuration is usable.
    pub fn validate(&self) -> StorageResult<()> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| invalid(format!(
            "endpoint '{}' is not a valid URL: {e}",
            self.endpoint
        )))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!(
                "endpoint scheme must be http or https, got '{}'",
                endpoint.scheme()
            )));
        }
        if self.database.trim().is_empty() {
            return Err(invalid("database name must not be empty".to_string()));
        }
        if let Some((kind, _)) = self.containers.iter().find(|(_, c)| c.trim().is_empty()) {
            return Err(invalid(format!("container name for {kind} must not be empty")));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid("request timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }
}

fn invalid(message: String) -> StorageError {
    StorageError::Backend(BackendError::Configuration {
        backend_name: "cosmos".to_string(),
        message,
    })
}

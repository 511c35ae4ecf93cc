//! Document store backend.
//!
//! Each entity kind lives in its own container of one database, and every
//! document uses its id as partition key. The wire protocol sits behind the
//! [`DocumentClient`] trait; [`HttpDocumentClient`] speaks the Cosmos DB SQL
//! REST API and is available with the `cosmos` feature.
//!
//! # Example
//!
//! ```ignore
//! use todo_persistence::backends::document::{DocumentStore, DocumentStoreConfig};
//! use todo_persistence::types::TodoList;
//!
//! let store = DocumentStore::connect(
//!     DocumentStoreConfig::new("https://myaccount.documents.azure.com:443/")
//!         .with_token(token),
//! )?;
//! let lists = store.repository::<TodoList>();
//! ```

pub mod client;
pub mod config;
#[cfg(feature = "cosmos")]
pub mod http;
pub mod repository;
pub mod sql;

use std::fmt;
use std::sync::Arc;

pub use client::{
    DocumentClient, DocumentClientError, DocumentQuery, DocumentResponse, QueryParameter,
};
pub use config::DocumentStoreConfig;
#[cfg(feature = "cosmos")]
pub use http::HttpDocumentClient;
pub use repository::DocumentRepository;

use crate::error::StorageResult;
use crate::types::Entity;

/// A configured connection to a document store database.
///
/// Hands out one repository per entity kind, all sharing the same client.
#[derive(Clone)]
pub struct DocumentStore {
    client: Arc<dyn DocumentClient>,
    config: DocumentStoreConfig,
}

impl DocumentStore {
    /// Wraps an existing client.
    pub fn with_client(client: Arc<dyn DocumentClient>, config: DocumentStoreConfig) -> Self {
        Self { client, config }
    }

    /// Validates the configuration and opens an HTTP client.
    #[cfg(feature = "cosmos")]
    pub fn connect(config: DocumentStoreConfig) -> StorageResult<Self> {
        let client = HttpDocumentClient::from_config(&config)?;
        tracing::info!(
            endpoint = %config.endpoint,
            database = %config.database,
            "Document store client created"
        );
        Ok(Self::with_client(Arc::new(client), config))
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DocumentStoreConfig {
        &self.config
    }

    /// Returns a repository for entity kind `T`.
    pub fn repository<T: Entity>(&self) -> DocumentRepository<T> {
        DocumentRepository::new(
            Arc::clone(&self.client),
            self.config.container_for(T::KIND),
        )
    }
}

impl fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentStore")
            .field("endpoint", &self.config.endpoint)
            .field("database", &self.config.database)
            .finish_non_exhaustive()
    }
}

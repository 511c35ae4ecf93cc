use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::{DocumentClient, DocumentClientError};
use super::sql::{render_count, render_select};
use crate::core::{EntityQuery, QuerySource, QuerySpec, Repository};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Entity, new_entity_id};

const BACKEND_NAME: &str = "cosmos";

/// Repository storing one entity kind in one document store container.
///
/// Each document is its own partition: the partition key is the id.
pub struct DocumentRepository<T> {
    client: Arc<dyn DocumentClient>,
    container: String,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Entity> DocumentRepository<T> {
    /// Creates a repository over a specific container.
    pub fn new(client: Arc<dyn DocumentClient>, container: impl Into<String>) -> Self {
        Self {
            client,
            container: container.into(),
            _kind: PhantomData,
        }
    }

    /// Creates a repository over the container named after `T::KIND`.
    pub fn for_kind(client: Arc<dyn DocumentClient>) -> Self {
        Self::new(client, T::KIND)
    }

    /// Returns the container name.
    pub fn container(&self) -> &str {
        &self.container
    }
}

impl<T> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            container: self.container.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T> fmt::Debug for DocumentRepository<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRepository")
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Entity> QuerySource<T> for DocumentRepository<T> {
    async fn fetch(&self, spec: &QuerySpec) -> StorageResult<Vec<T>> {
        let query = render_select(spec);
        debug!(container = %self.container, query = %query.query, "Running query");
        let documents = self
            .client
            .query_documents(&self.container, &query)
            .await
            .map_err(|e| map_client_error(e, "query"))?;

        documents
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StorageError::from))
            .collect()
    }

    async fn count(&self, spec: &QuerySpec) -> StorageResult<u64> {
        let query = render_count(spec);
        let results = self
            .client
            .query_documents(&self.container, &query)
            .await
            .map_err(|e| map_client_error(e, "count"))?;

        // Cross-partition counts arrive as one partial count per partition range.
        let matching = results
            .iter()
            .map(Value::as_u64)
            .sum::<Option<u64>>()
            .filter(|_| !results.is_empty())
            .ok_or_else(|| {
                StorageError::Backend(BackendError::SerializationError {
                    message: format!("count query returned {results:?}"),
                })
            })?;
        Ok(spec.windowed_len(matching))
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for DocumentRepository<T> {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn query(&self) -> EntityQuery<'_, T> {
        EntityQuery::new(self)
    }

    #[instrument(skip(self), fields(container = %self.container))]
    async fn get(&self, id: &str) -> StorageResult<Option<T>> {
        match self.client.read_document(&self.container, id).await {
            Ok(response) => match response.body {
                Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
                None => Err(StorageError::Backend(BackendError::EmptyResponse {
                    backend_name: BACKEND_NAME.to_string(),
                    operation: "read".to_string(),
                    id: id.to_string(),
                })),
            },
            Err(DocumentClientError::NotFound) => {
                debug!("Document not found");
                Ok(None)
            }
            Err(e) => Err(map_client_error(e, "read")),
        }
    }

    #[instrument(skip(self, entity), fields(container = %self.container))]
    async fn save(&self, mut entity: T) -> StorageResult<T> {
        if !entity.has_id() {
            entity.set_id(new_entity_id());
        }

        let existing: Option<T> = self.get(entity.id()).await?;
        let now = Utc::now();
        entity.set_created_date(existing.map(|e| e.created_date()).unwrap_or(now));
        entity.set_updated_date(now);

        let id = entity.id().to_string();
        let document = serde_json::to_value(&entity)?;
        let response = self
            .client
            .upsert_document(&self.container, &id, document)
            .await
            .map_err(|e| map_client_error(e, "upsert"))?;

        let body = response.body.ok_or_else(|| {
            StorageError::Backend(BackendError::EmptyResponse {
                backend_name: BACKEND_NAME.to_string(),
                operation: "upsert".to_string(),
                id: id.clone(),
            })
        })?;

        debug!(id = %id, status = response.status, "Upserted document");
        Ok(serde_json::from_value(body)?)
    }

    #[instrument(skip(self), fields(container = %self.container))]
    async fn delete(&self, id: &str) -> StorageResult<bool> {
        match self.client.delete_document(&self.container, id).await {
            Ok(response) => Ok(response.is_success()),
            Err(DocumentClientError::NotFound) => Ok(false),
            Err(e) => Err(map_client_error(e, "delete")),
        }
    }
}

fn map_client_error(err: DocumentClientError, operation: &str) -> StorageError {
    let backend_name = BACKEND_NAME.to_string();
    let err = match err {
        DocumentClientError::NotFound => BackendError::UnexpectedStatus {
            backend_name,
            operation: operation.to_string(),
            status: 404,
        },
        DocumentClientError::Throttled(message) | DocumentClientError::Unavailable(message) => {
            BackendError::Unavailable {
                backend_name,
                message: format!("{operation}: {message}"),
            }
        }
        DocumentClientError::InvalidInput(message) | DocumentClientError::Internal(message) => {
            BackendError::Request {
                backend_name,
                message: format!("{operation}: {message}"),
                source: None,
            }
        }
    };
    StorageError::Backend(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_client_error() {
        let err = map_client_error(DocumentClientError::Unavailable("down".into()), "read");
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::Unavailable { ref message, .. }) if message == "read: down"
        ));

        let err = map_client_error(DocumentClientError::NotFound, "query");
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::UnexpectedStatus { status: 404, .. })
        ));
    }
}

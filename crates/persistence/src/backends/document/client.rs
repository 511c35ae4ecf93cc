use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Outcome of a point operation against the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentResponse {
    /// HTTP status the store answered with.
    pub status: u16,
    /// The document, when the store returned one.
    pub body: Option<Value>,
}

impl DocumentResponse {
    /// Creates a response.
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self { status, body }
    }

    /// Returns true for statuses in `200..=299`.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Failure reported by a [`DocumentClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentClientError {
    /// The addressed document or container does not exist.
    NotFound,
    /// The store rejected the request for exceeding its rate limit.
    Throttled(String),
    /// The store could not be reached or failed on its side.
    Unavailable(String),
    /// The store rejected the request as malformed.
    InvalidInput(String),
    /// Anything else, including unreadable responses.
    Internal(String),
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryParameter {
    /// Parameter name including the leading `@`.
    pub name: String,
    /// Bound value.
    pub value: Value,
}

/// A parameterized SQL query in the store's dialect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentQuery {
    /// Query text.
    pub query: String,
    /// Values bound to the parameters named in the text.
    pub parameters: Vec<QueryParameter>,
}

/// Low-level document store operations.
///
/// Every document is addressed by container and id, with the id doubling as
/// its partition key.
#[async_trait]
pub trait DocumentClient: Send + Sync {
    /// Reads a document. A missing document is [`DocumentClientError::NotFound`].
    async fn read_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError>;

    /// Inserts or replaces a document, returning the stored copy when the
    /// store sends one back.
    async fn upsert_document(
        &self,
        container: &str,
        id: &str,
        document: Value,
    ) -> Result<DocumentResponse, DocumentClientError>;

    /// Deletes a document.
    async fn delete_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError>;

    /// Runs a query and returns every result, following continuations.
    async fn query_documents(
        &self,
        container: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Value>, DocumentClientError>;
}

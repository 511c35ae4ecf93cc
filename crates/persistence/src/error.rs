//! Error types for the persistence layer.
//!
//! Absence is never an error here: point lookups return `Ok(None)` and deletes
//! of unknown ids return `Ok(false)`. What remains are two families of failure:
//! caller input that cannot be honoured ([`ValidationError`]) and storage that
//! misbehaved ([`BackendError`]).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all repository and pagination operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Caller supplied input the core refuses to process.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The storage backend failed or answered with something unusable.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if this error was caused by caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, StorageError::Validation(_))
    }

    /// Returns true if this error originated in the storage backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, StorageError::Backend(_))
    }
}

/// Errors caused by invalid caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// `$skip` or `$top` is outside its permitted range.
    #[error("invalid pagination parameter {parameter}: {message}")]
    InvalidPagination { parameter: String, message: String },

    /// A state string did not name a known item state.
    #[error("invalid item state: {value}")]
    InvalidState { value: String },

    /// A required field was absent or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// A request URI could not be parsed.
    #[error("invalid request uri: {uri}")]
    InvalidUri { uri: String },
}

/// Errors originating from a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend could not be reached.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// A request to the backend failed in transport or was rejected.
    #[error("request to {backend_name} failed: {message}")]
    Request {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a status the operation cannot interpret.
    #[error("{backend_name} returned unexpected status {status} during {operation}")]
    UnexpectedStatus {
        backend_name: String,
        operation: String,
        status: u16,
    },

    /// A write was acknowledged but the persisted document was not returned.
    #[error("{backend_name} returned no content from {operation} for id {id}")]
    EmptyResponse {
        backend_name: String,
        operation: String,
        id: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {message}")]
    SerializationError { message: String },

    /// Backend configuration is unusable.
    #[error("invalid {backend_name} configuration: {message}")]
    Configuration {
        backend_name: String,
        message: String,
    },
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::SerializationError {
            message: err.to_string(),
        })
    }
}

#[cfg(feature = "cosmos")]
impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            BackendError::Unavailable {
                backend_name: "cosmos".to_string(),
                message: err.to_string(),
            }
        } else {
            BackendError::Request {
                backend_name: "cosmos".to_string(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        }
    }
}

//! Error types for the todo REST API.
//!
//! This module defines the error type used throughout the REST layer and its
//! conversion into JSON error responses.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status | Code |
//! |--------------|-------------|------|
//! | InvalidPagination | 400 | invalid-pagination |
//! | InvalidState | 400 | invalid-state |
//! | MissingRequiredField | 400 | missing-field |
//! | InvalidUri | 400 | invalid-uri |
//! | (malformed JSON body) | 400 | invalid-body |
//! | Unavailable | 503 | unavailable |
//! | any other BackendError | 500 | exception |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use todo_persistence::error::{BackendError, StorageError, ValidationError};
use tracing::error;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Entity not found, or not part of the addressed list (HTTP 404).
    NotFound {
        /// The entity kind (e.g., "TodoList").
        kind: &'static str,
        /// The requested id.
        id: String,
    },

    /// Bad request (HTTP 400).
    BadRequest {
        /// Machine-readable code.
        code: &'static str,
        /// Error message.
        message: String,
    },

    /// A storage backend could not be reached (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for a 404 on the given kind and id.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        RestError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Shorthand for a 400 with the `invalid` code.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            code: "invalid",
            message: message.into(),
        }
    }

    /// Returns the HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { kind, id } => write!(f, "{} not found: {}", kind, id),
            RestError::BadRequest { message, .. } => write!(f, "Bad request: {}", message),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self {
            RestError::NotFound { kind, id } => {
                ("not-found", format!("{} '{}' was not found", kind, id))
            }
            RestError::BadRequest { code, message } => (*code, message.clone()),
            RestError::ServiceUnavailable { message } => ("unavailable", message.clone()),
            RestError::InternalError { message } => ("exception", message.clone()),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "Request failed");
        }

        let body = create_error_body(code, &message);
        (status, Json(body)).into_response()
    }
}

/// Builds the JSON body returned for every error response.
fn create_error_body(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({
        "error": {
            "code": code,
            "message": message
        }
    })
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        let code = match &err {
            ValidationError::InvalidPagination { .. } => "invalid-pagination",
            ValidationError::InvalidState { .. } => "invalid-state",
            ValidationError::MissingRequiredField { .. } => "missing-field",
            ValidationError::InvalidUri { .. } => "invalid-uri",
        };
        RestError::BadRequest {
            code,
            message: err.to_string(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable { .. } => RestError::ServiceUnavailable {
                message: err.to_string(),
            },
            _ => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<JsonRejection> for RestError {
    fn from(err: JsonRejection) -> Self {
        RestError::BadRequest {
            code: "invalid-body",
            message: err.body_text(),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;

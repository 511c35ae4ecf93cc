//! [`DocumentClient`] over the Cosmos DB SQL REST API.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::client::{DocumentClient, DocumentClientError, DocumentQuery, DocumentResponse};
use super::config::DocumentStoreConfig;
use crate::error::{BackendError, StorageError, StorageResult};

const API_VERSION: &str = "2018-12-31";
const QUERY_CONTENT_TYPE: &str = "application/query+json";
const CONTINUATION_HEADER: &str = "x-ms-continuation";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "Documents", default)]
    documents: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for a single database of a document store account.
#[derive(Debug, Clone)]
pub struct HttpDocumentClient {
    client: reqwest::Client,
    endpoint: Url,
    database: String,
    token: Option<String>,
}

impl HttpDocumentClient {
    /// Builds a client from a validated configuration.
    pub fn from_config(config: &DocumentStoreConfig) -> StorageResult<Self> {
        config.validate()?;

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            StorageError::Backend(BackendError::Configuration {
                backend_name: "cosmos".to_string(),
                message: e.to_string(),
            })
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(BackendError::from)?;

        Ok(Self {
            client,
            endpoint,
            database: config.database.clone(),
            token: config.token.clone(),
        })
    }

    fn docs_url(&self, container: &str, id: Option<&str>) -> Result<Url, DocumentClientError> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                DocumentClientError::InvalidInput(format!(
                    "endpoint {} cannot carry a path",
                    self.endpoint
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(["dbs", self.database.as_str(), "colls", container, "docs"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, partition_key: Option<&str>) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        headers.insert("x-ms-version", HeaderValue::from_static(API_VERSION));

        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        if let Ok(value) = HeaderValue::from_str(&date) {
            headers.insert("x-ms-date", value);
        }

        if let Some(key) = partition_key {
            let key = Value::Array(vec![Value::String(key.to_string())]).to_string();
            if let Ok(value) = HeaderValue::from_str(&key) {
                headers.insert("x-ms-documentdb-partitionkey", value);
            }
        }

        if let Some(token) = &self.token {
            let auth = format!("type=aad&ver=1.0&sig={token}");
            let encoded: String = url::form_urlencoded::byte_serialize(auth.as_bytes()).collect();
            if let Ok(value) = HeaderValue::from_str(&encoded) {
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
        }

        self.client.request(method, url).headers(headers)
    }

    async fn send_point(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        debug!(operation, status = status.as_u16(), "Document store responded");

        if !status.is_success() {
            return Err(map_status_error(status, response).await);
        }

        let bytes = response.bytes().await.map_err(map_transport_error)?;
        let body = if bytes.is_empty() {
            None
        } else {
            Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| DocumentClientError::Internal(e.to_string()))?,
            )
        };

        Ok(DocumentResponse::new(status.as_u16(), body))
    }
}

#[async_trait]
impl DocumentClient for HttpDocumentClient {
    async fn read_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let url = self.docs_url(container, Some(id))?;
        self.send_point("read", self.request(Method::GET, url, Some(id)))
            .await
    }

    async fn upsert_document(
        &self,
        container: &str,
        id: &str,
        document: Value,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let url = self.docs_url(container, None)?;
        let builder = self
            .request(Method::POST, url, Some(id))
            .header("x-ms-documentdb-is-upsert", "True")
            .json(&document);
        self.send_point("upsert", builder).await
    }

    async fn delete_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let url = self.docs_url(container, Some(id))?;
        self.send_point("delete", self.request(Method::DELETE, url, Some(id)))
            .await
    }

    async fn query_documents(
        &self,
        container: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Value>, DocumentClientError> {
        let url = self.docs_url(container, None)?;
        let body = serde_json::to_vec(query)
            .map_err(|e| DocumentClientError::InvalidInput(e.to_string()))?;

        let mut results = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut builder = self
                .request(Method::POST, url.clone(), None)
                .header(reqwest::header::CONTENT_TYPE, QUERY_CONTENT_TYPE)
                .header("x-ms-documentdb-isquery", "True")
                .header("x-ms-documentdb-query-enablecrosspartition", "True")
                .body(body.clone());
            if let Some(token) = &continuation {
                builder = builder.header(CONTINUATION_HEADER, token.as_str());
            }

            let response = builder.send().await.map_err(map_transport_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(map_status_error(status, response).await);
            }

            continuation = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let page: QueryResponse = response.json().await.map_err(map_transport_error)?;
            debug!(
                container,
                returned = page.documents.len(),
                more = continuation.is_some(),
                "Query page received"
            );
            results.extend(page.documents);

            if continuation.is_none() {
                break;
            }
        }

        Ok(results)
    }
}

fn map_transport_error(err: reqwest::Error) -> DocumentClientError {
    if err.is_connect() || err.is_timeout() {
        DocumentClientError::Unavailable(err.to_string())
    } else {
        DocumentClientError::Internal(err.to_string())
    }
}

async fn map_status_error(status: StatusCode, response: Response) -> DocumentClientError {
    let detail = match response.json::<ErrorResponse>().await {
        Ok(ErrorResponse { code, message }) => format!(
            "{}: {}",
            code.unwrap_or_else(|| status.to_string()),
            message.unwrap_or_default()
        ),
        Err(_) => status.to_string(),
    };

    match status {
        StatusCode::NOT_FOUND => DocumentClientError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => DocumentClientError::Throttled(detail),
        StatusCode::BAD_REQUEST => DocumentClientError::InvalidInput(detail),
        s if s.is_server_error() => DocumentClientError::Unavailable(detail),
        _ => {
            warn!(status = status.as_u16(), detail = %detail, "Unexpected document store status");
            DocumentClientError::Internal(detail)
        }
    }
}

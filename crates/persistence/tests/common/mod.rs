//! Test infrastructure for the persistence layer.
//!
//! Provides an in-process [`DocumentClient`] double with failure injection and
//! small fixture helpers shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use todo_persistence::backends::document::{
    DocumentClient, DocumentClientError, DocumentQuery, DocumentResponse,
};
use todo_persistence::core::{FieldFilter, QuerySpec, SortDirection, SortKey};

#[derive(Debug, Default)]
struct MockState {
    containers: HashMap<String, HashMap<String, Value>>,
    reads: u64,
    upserts: u64,
    queries: Vec<DocumentQuery>,
    omit_upsert_body: bool,
    omit_read_body: bool,
    count_partitions: usize,
    delete_status: Option<u16>,
    fail_all: Option<DocumentClientError>,
}

/// A document store held in memory.
///
/// Understands exactly the SQL the document repository renders: equality
/// filters, ordering, `OFFSET`/`LIMIT` and `SELECT VALUE COUNT(1)`.
#[derive(Debug, Clone, Default)]
pub struct MockDocumentClient {
    state: Arc<Mutex<MockState>>,
}

impl MockDocumentClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes upserts succeed without returning the stored document.
    pub fn omit_upsert_body(&self) {
        self.state.lock().unwrap().omit_upsert_body = true;
    }

    /// Makes reads of existing documents succeed without a body.
    pub fn omit_read_body(&self) {
        self.state.lock().unwrap().omit_read_body = true;
    }

    /// Splits count results into `partitions` partial counts.
    pub fn split_counts(&self, partitions: usize) {
        self.state.lock().unwrap().count_partitions = partitions;
    }

    /// Makes deletes of existing documents answer with `status`.
    pub fn set_delete_status(&self, status: u16) {
        self.state.lock().unwrap().delete_status = Some(status);
    }

    /// Makes every call fail with `err`.
    pub fn fail_all(&self, err: DocumentClientError) {
        self.state.lock().unwrap().fail_all = Some(err);
    }

    pub fn document(&self, container: &str, id: &str) -> Option<Value> {
        let state = self.state.lock().unwrap();
        state.containers.get(container)?.get(id).cloned()
    }

    pub fn insert_raw(&self, container: &str, id: &str, doc: Value) {
        let mut state = self.state.lock().unwrap();
        state
            .containers
            .entry(container.to_string())
            .or_default()
            .insert(id.to_string(), doc);
    }

    pub fn container_len(&self, container: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.containers.get(container).map_or(0, HashMap::len)
    }

    pub fn read_count(&self) -> u64 {
        self.state.lock().unwrap().reads
    }

    pub fn upsert_count(&self) -> u64 {
        self.state.lock().unwrap().upserts
    }

    pub fn queries(&self) -> Vec<DocumentQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    fn check_failure(state: &MockState) -> Result<(), DocumentClientError> {
        match &state.fail_all {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentClient for MockDocumentClient {
    async fn read_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.reads += 1;
        let omit_body = state.omit_read_body;
        state
            .containers
            .get(container)
            .and_then(|docs| docs.get(id))
            .cloned()
            .map(|doc| DocumentResponse::new(200, (!omit_body).then_some(doc)))
            .ok_or(DocumentClientError::NotFound)
    }

    async fn upsert_document(
        &self,
        container: &str,
        id: &str,
        document: Value,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.upserts += 1;
        let existed = state
            .containers
            .entry(container.to_string())
            .or_default()
            .insert(id.to_string(), document.clone())
            .is_some();
        let status = if existed { 200 } else { 201 };
        let body = if state.omit_upsert_body {
            None
        } else {
            Some(document)
        };
        Ok(DocumentResponse::new(status, body))
    }

    async fn delete_document(
        &self,
        container: &str,
        id: &str,
    ) -> Result<DocumentResponse, DocumentClientError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        if let Some(status) = state.delete_status {
            return Ok(DocumentResponse::new(status, None));
        }
        let removed = state
            .containers
            .get_mut(container)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            Ok(DocumentResponse::new(204, None))
        } else {
            Err(DocumentClientError::NotFound)
        }
    }

    async fn query_documents(
        &self,
        container: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Value>, DocumentClientError> {
        let mut state = self.state.lock().unwrap();
        Self::check_failure(&state)?;
        state.queries.push(query.clone());

        let spec = parse_query(query)?;
        let docs: Vec<Value> = state
            .containers
            .get(container)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default();

        if query.query.starts_with("SELECT VALUE COUNT(1)") {
            let count = spec
                .count(&docs)
                .map_err(|e| DocumentClientError::Internal(e.to_string()))?;
            let partitions = state.count_partitions.max(1) as u64;
            let mut partials = vec![Value::from(count / partitions + count % partitions)];
            partials.extend((1..partitions).map(|_| Value::from(count / partitions)));
            return Ok(partials);
        }

        spec.apply(docs)
            .map_err(|e| DocumentClientError::Internal(e.to_string()))
    }
}

/// Reads the rendered SQL back into a [`QuerySpec`].
fn parse_query(query: &DocumentQuery) -> Result<QuerySpec, DocumentClientError> {
    let invalid = || DocumentClientError::InvalidInput(query.query.clone());
    let mut spec = QuerySpec::default();
    let text = query.query.as_str();

    let (text, window) = match text.split_once(" OFFSET ") {
        Some((head, window)) => (head, Some(window)),
        None => (text, None),
    };
    if let Some(window) = window {
        let (offset, limit) = window.split_once(" LIMIT ").ok_or_else(invalid)?;
        spec.skip = Some(offset.trim().parse().map_err(|_| invalid())?);
        spec.take = Some(limit.trim().parse().map_err(|_| invalid())?);
    }

    let (text, order) = match text.split_once(" ORDER BY ") {
        Some((head, order)) => (head, Some(order)),
        None => (text, None),
    };
    if let Some(order) = order {
        for key in order.split(", ") {
            let (field, direction) = key.rsplit_once(' ').ok_or_else(invalid)?;
            spec.order.push(SortKey {
                field: field_name(field).ok_or_else(invalid)?,
                direction: if direction == "DESC" {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                },
            });
        }
    }

    if let Some((_, filters)) = text.split_once(" WHERE ") {
        for clause in filters.split(" AND ") {
            let (field, param) = clause.split_once(" = ").ok_or_else(invalid)?;
            let value = query
                .parameters
                .iter()
                .find(|p| p.name == param)
                .map(|p| p.value.clone())
                .ok_or_else(invalid)?;
            spec.filters.push(FieldFilter {
                field: field_name(field).ok_or_else(invalid)?,
                value,
            });
        }
    }

    Ok(spec)
}

fn field_name(accessor: &str) -> Option<String> {
    accessor
        .strip_prefix("c[\"")
        .and_then(|rest| rest.strip_suffix("\"]"))
        .map(str::to_string)
}

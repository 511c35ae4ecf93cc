//! Document store backend integration tests against an in-process client.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use common::MockDocumentClient;
use todo_persistence::backends::document::{
    DocumentClientError, DocumentRepository, DocumentStore, DocumentStoreConfig,
};
use todo_persistence::core::{Repository, fields, paginate};
use todo_persistence::error::{BackendError, StorageError};
use todo_persistence::types::{Entity, PageRequest, TodoItem, TodoItemState, TodoList};

fn create_store() -> (MockDocumentClient, DocumentStore) {
    let client = MockDocumentClient::new();
    let store = DocumentStore::with_client(
        Arc::new(client.clone()),
        DocumentStoreConfig::new("http://localhost:8081"),
    );
    (client, store)
}

// ============================================================================
// Container Mapping Tests
// ============================================================================

#[tokio::test]
async fn test_each_kind_uses_its_own_container() {
    let (client, store) = create_store();
    let lists = store.repository::<TodoList>();
    let items = store.repository::<TodoItem>();

    let list = lists.save(TodoList::new("Groceries")).await.unwrap();
    items.save(TodoItem::new(list.id(), "Milk")).await.unwrap();

    assert_eq!(lists.container(), "TodoList");
    assert_eq!(client.container_len("TodoList"), 1);
    assert_eq!(client.container_len("TodoItem"), 1);
}

#[tokio::test]
async fn test_container_override() {
    let client = MockDocumentClient::new();
    let store = DocumentStore::with_client(
        Arc::new(client.clone()),
        DocumentStoreConfig::new("http://localhost:8081").with_container("TodoList", "lists"),
    );
    let lists = store.repository::<TodoList>();
    lists.save(TodoList::new("Chores")).await.unwrap();
    assert_eq!(client.container_len("lists"), 1);
}

// ============================================================================
// Point Operation Tests
// ============================================================================

#[tokio::test]
async fn test_save_then_get_round_trip() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoItem>();

    let saved = repo
        .save(TodoItem::new("l1", "Milk").with_description("2 litres"))
        .await
        .unwrap();
    let found = repo.get(saved.id()).await.unwrap().unwrap();
    assert_eq!(found, saved);

    let raw = client.document("TodoItem", saved.id()).unwrap();
    assert_eq!(raw["id"], saved.id());
    assert_eq!(raw["state"], "todo");
    assert!(raw["dueDate"].is_null());
}

#[tokio::test]
async fn test_get_missing_translates_not_found() {
    let (_client, store) = create_store();
    let repo = store.repository::<TodoList>();
    assert!(repo.get("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_without_body_is_backend_failure() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoList>();
    let saved = repo.save(TodoList::new("Groceries")).await.unwrap();
    client.omit_read_body();

    let err = repo.get(saved.id()).await.unwrap_err();

    assert!(err.is_backend());
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::EmptyResponse { ref operation, .. }) if operation == "read"
    ));
}

#[tokio::test]
async fn test_save_reads_before_upsert_and_keeps_created_date() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoList>();

    let first = repo.save(TodoList::new("Groceries")).await.unwrap();
    let mut changed = first.clone();
    changed.name = "Food".to_string();
    changed.set_created_date(Utc::now() + Duration::days(3));
    let second = repo.save(changed).await.unwrap();

    assert_eq!(second.created_date(), first.created_date());
    assert_eq!(second.name, "Food");
    assert_eq!(client.read_count(), 2);
    assert_eq!(client.upsert_count(), 2);
}

#[tokio::test]
async fn test_upsert_without_body_is_backend_failure() {
    let (client, store) = create_store();
    client.omit_upsert_body();
    let repo = store.repository::<TodoList>();

    let mut list = TodoList::new("Groceries");
    list.set_id("fixed-id".to_string());
    let err = repo.save(list).await.unwrap_err();

    assert!(err.is_backend());
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::EmptyResponse { ref id, .. }) if id == "fixed-id"
    ));
}

#[tokio::test]
async fn test_delete_semantics() {
    let (_client, store) = create_store();
    let repo = store.repository::<TodoList>();
    let saved = repo.save(TodoList::new("Groceries")).await.unwrap();

    assert!(repo.delete(saved.id()).await.unwrap());
    assert!(!repo.delete(saved.id()).await.unwrap());
}

#[tokio::test]
async fn test_delete_non_success_status_is_false() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoList>();
    let saved = repo.save(TodoList::new("Groceries")).await.unwrap();

    client.set_delete_status(304);
    assert!(!repo.delete(saved.id()).await.unwrap());
}

#[tokio::test]
async fn test_unavailable_store_propagates() {
    let (client, store) = create_store();
    client.fail_all(DocumentClientError::Unavailable("connection refused".into()));
    let repo = store.repository::<TodoList>();

    let err = repo.get("x").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::Unavailable { .. })
    ));
    assert!(repo.delete("x").await.is_err());
    assert!(repo.save(TodoList::new("y")).await.is_err());
    assert!(repo.query().fetch().await.is_err());
}

#[tokio::test]
async fn test_malformed_document_is_serialization_failure() {
    let (client, store) = create_store();
    client.insert_raw("TodoItem", "bad", json!({"id": "bad", "state": "bogus"}));
    let repo = store.repository::<TodoItem>();

    let err = repo.get("bad").await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::Backend(BackendError::SerializationError { .. })
    ));
}

// ============================================================================
// Query Tests
// ============================================================================

#[tokio::test]
async fn test_query_renders_parameterized_sql() {
    let (client, store) = create_store();
    let repo: DocumentRepository<TodoItem> = store.repository();
    repo.save(TodoItem::new("l1", "Milk").with_state(TodoItemState::Done))
        .await
        .unwrap();
    repo.save(TodoItem::new("l1", "Eggs")).await.unwrap();

    let done = repo
        .query()
        .filter_eq(fields::LIST_ID, "l1")
        .filter_eq(fields::STATE, "done")
        .fetch()
        .await
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].name, "Milk");

    let issued = client.queries();
    let last = issued.last().unwrap();
    assert_eq!(
        last.query,
        "SELECT * FROM c WHERE c[\"listId\"] = @p0 AND c[\"state\"] = @p1"
    );
    assert_eq!(last.parameters[1].value, json!("done"));
}

#[tokio::test]
async fn test_paginate_over_document_store() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoList>();
    for i in 0..7 {
        repo.save(TodoList::new(format!("list {i}"))).await.unwrap();
    }

    let page = paginate(
        repo.query(),
        &PageRequest::new(Some(0), Some(5)),
        "http://localhost/todo/lists",
    )
    .await
    .unwrap();
    assert_eq!(page.items.len(), 5);
    assert!(page.has_more_items);
    assert_eq!(
        page.next_link.as_deref(),
        Some("http://localhost/todo/lists?$skip=5&$top=5")
    );

    let issued = client.queries();
    assert!(issued.iter().any(|q| q.query == "SELECT VALUE COUNT(1) FROM c"));
    assert!(issued.iter().any(|q| q.query
        == "SELECT * FROM c ORDER BY c[\"createdDate\"] ASC, c[\"id\"] ASC OFFSET 0 LIMIT 5"));
}

#[tokio::test]
async fn test_count_sums_partial_counts() {
    let (client, store) = create_store();
    let repo = store.repository::<TodoList>();
    for i in 0..7 {
        repo.save(TodoList::new(format!("list {i}"))).await.unwrap();
    }
    client.split_counts(3);

    assert_eq!(repo.query().count().await.unwrap(), 7);
    assert_eq!(repo.query().skip(2).take(4).count().await.unwrap(), 4);

    let page = paginate(
        repo.query(),
        &PageRequest::new(Some(5), Some(5)),
        "http://localhost/todo/lists",
    )
    .await
    .unwrap();
    assert_eq!(page.items.len(), 2);
    assert!(!page.has_more_items);
}

//! Pagination engine integration tests.

mod common;

use std::sync::Arc;

use serde_json::json;

use common::MockDocumentClient;
use todo_persistence::backends::{DocumentStore, DocumentStoreConfig, MemoryRepository};
use todo_persistence::core::{Repository, fields, paginate};
use todo_persistence::error::{StorageError, ValidationError};
use todo_persistence::types::{Entity, PageRequest, TodoItem, TodoList};

const BASE: &str = "http://localhost:8080/todo/lists";

/// Stores `n` lists whose creation order is their index. Ids follow the same
/// order so equal timestamps cannot reorder them.
async fn seed_lists(n: usize) -> MemoryRepository<TodoList> {
    let repo = MemoryRepository::new();
    for i in 0..n {
        let mut list = TodoList::new(format!("list {i:03}"));
        list.set_id(format!("id-{i:03}"));
        repo.save(list).await.unwrap();
    }
    repo
}

fn names(items: &[TodoList]) -> Vec<String> {
    items.iter().map(|l| l.name.clone()).collect()
}

// ============================================================================
// Window Tests
// ============================================================================

#[tokio::test]
async fn test_first_page_of_ten_with_top_five() {
    let repo = seed_lists(10).await;
    let page = paginate(repo.query(), &PageRequest::new(None, Some(5)), BASE)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert!(page.has_more_items);
    assert_eq!(
        page.next_link.as_deref(),
        Some("http://localhost:8080/todo/lists?$skip=5&$top=5")
    );
    assert_eq!(
        names(&page.items),
        vec!["list 000", "list 001", "list 002", "list 003", "list 004"]
    );
}

#[tokio::test]
async fn test_last_page_has_no_next_link() {
    let repo = seed_lists(10).await;
    let page = paginate(repo.query(), &PageRequest::new(Some(5), Some(5)), BASE)
        .await
        .unwrap();

    assert_eq!(page.items.len(), 5);
    assert!(!page.has_more_items);
    assert_eq!(page.next_link, None);
}

#[tokio::test]
async fn test_skip_past_end_is_empty() {
    let repo = seed_lists(3).await;
    let page = paginate(repo.query(), &PageRequest::new(Some(10), None), BASE)
        .await
        .unwrap();
    assert!(page.is_empty());
    assert!(!page.has_more_items);
}

#[tokio::test]
async fn test_default_batch_size_is_twenty() {
    let repo = seed_lists(25).await;
    let page = paginate(repo.query(), &PageRequest::default(), BASE)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 20);
    assert_eq!(
        page.next_link.as_deref(),
        Some("http://localhost:8080/todo/lists?$skip=20&$top=20")
    );
}

#[tokio::test]
async fn test_top_at_maximum() {
    let repo = seed_lists(120).await;
    let page = paginate(repo.query(), &PageRequest::new(None, Some(100)), BASE)
        .await
        .unwrap();
    assert_eq!(page.items.len(), 100);
    assert!(page.has_more_items);
}

#[tokio::test]
async fn test_walking_all_pages_visits_each_item_once() {
    let repo = seed_lists(23).await;
    let mut seen = Vec::new();
    let mut skip = 0;
    loop {
        let page = paginate(repo.query(), &PageRequest::new(Some(skip), Some(7)), BASE)
            .await
            .unwrap();
        seen.extend(names(&page.items));
        if !page.has_more_items {
            break;
        }
        skip += page.items.len() as i64;
    }
    let expected: Vec<String> = (0..23).map(|i| format!("list {i:03}")).collect();
    assert_eq!(seen, expected);
}

// ============================================================================
// Ordering Tests
// ============================================================================

fn raw_list(id: &str, created: &str) -> serde_json::Value {
    json!({
        "id": id,
        "createdDate": created,
        "updatedDate": null,
        "name": format!("list {id}"),
        "description": null
    })
}

#[tokio::test]
async fn test_equal_created_dates_break_ties_by_id() {
    let client = MockDocumentClient::new();
    for id in ["d", "b", "e", "a", "c"] {
        client.insert_raw("TodoList", id, raw_list(id, "2024-01-01T00:00:00.000000000Z"));
    }
    let store = DocumentStore::with_client(
        Arc::new(client),
        DocumentStoreConfig::new("http://localhost:8081"),
    );
    let repo = store.repository::<TodoList>();

    let first = paginate(repo.query(), &PageRequest::new(Some(1), Some(3)), BASE)
        .await
        .unwrap();
    let ids: Vec<&str> = first.items.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["b", "c", "d"]);

    for _ in 0..5 {
        let again = paginate(repo.query(), &PageRequest::new(Some(1), Some(3)), BASE)
            .await
            .unwrap();
        assert_eq!(again.items, first.items);
    }
}

#[tokio::test]
async fn test_orders_by_created_date_not_id() {
    let client = MockDocumentClient::new();
    client.insert_raw("TodoList", "a", raw_list("a", "2024-03-01T00:00:00.000000000Z"));
    client.insert_raw("TodoList", "b", raw_list("b", "2024-01-01T00:00:00.000000000Z"));
    client.insert_raw("TodoList", "c", raw_list("c", "2024-02-01T00:00:00.000000000Z"));
    let store = DocumentStore::with_client(
        Arc::new(client),
        DocumentStoreConfig::new("http://localhost:8081"),
    );
    let repo = store.repository::<TodoList>();

    let page = paginate(repo.query(), &PageRequest::default(), BASE)
        .await
        .unwrap();
    let ids: Vec<&str> = page.items.iter().map(|l| l.id()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_filtered_source_counts_only_matches() {
    let repo = MemoryRepository::<TodoItem>::new();
    for i in 0..6 {
        repo.save(TodoItem::new("l1", format!("a{i}"))).await.unwrap();
    }
    for i in 0..6 {
        repo.save(TodoItem::new("l2", format!("b{i}"))).await.unwrap();
    }

    let page = paginate(
        repo.query().filter_eq(fields::LIST_ID, "l1"),
        &PageRequest::new(Some(3), Some(3)),
        "http://localhost/todo/lists/l1/items",
    )
    .await
    .unwrap();
    assert_eq!(page.items.len(), 3);
    assert!(page.items.iter().all(|i| i.list_id == "l1"));
    assert!(!page.has_more_items);
}

// ============================================================================
// Link and Validation Tests
// ============================================================================

#[tokio::test]
async fn test_next_link_replaces_stale_parameters() {
    let repo = seed_lists(12).await;
    let page = paginate(
        repo.query(),
        &PageRequest::new(Some(5), Some(5)),
        "http://localhost:8080/todo/lists?$skip=5&$top=5&sort=x",
    )
    .await
    .unwrap();
    assert_eq!(
        page.next_link.as_deref(),
        Some("http://localhost:8080/todo/lists?sort=x&$skip=10&$top=5")
    );
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected() {
    let repo = seed_lists(1).await;
    for request in [
        PageRequest::new(Some(-1), None),
        PageRequest::new(None, Some(0)),
        PageRequest::new(None, Some(101)),
    ] {
        let err = paginate(repo.query(), &request, BASE).await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Validation(ValidationError::InvalidPagination { .. })
        ));
    }
}

#[tokio::test]
async fn test_relative_request_uri_is_rejected() {
    let repo = seed_lists(1).await;
    let err = paginate(repo.query(), &PageRequest::default(), "/todo/lists")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::Validation(ValidationError::InvalidUri { .. })
    ));
}

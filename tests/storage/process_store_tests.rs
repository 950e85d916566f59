//! ProcessStore interface tests.
//!
//! These tests verify the contract of the ProcessStore trait.
//! Each storage implementation should run these tests.

use saga_mediator::interfaces::{PersistedProcess, ProcessStore};
use saga_mediator::{CorrelationId, Headers};

/// Create a test record with the given blob and headers.
pub fn make_process(id: CorrelationId, blob: &[u8], headers: &[(&str, &str)]) -> PersistedProcess {
    PersistedProcess {
        correlation_id: id,
        blob: blob.to_vec(),
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Headers>(),
    }
}

// =============================================================================
// ProcessStore::find tests
// =============================================================================

pub async fn test_find_nonexistent<S: ProcessStore>(store: &S) {
    let found = store
        .find(CorrelationId::new())
        .await
        .expect("find should succeed");
    assert!(found.is_none(), "nonexistent process should be None");
}

pub async fn test_find_preserves_blob_and_headers<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();
    let blob = vec![0, 1, 2, 127, 128, 200, 255];
    let process = make_process(id, &blob, &[("source", "web"), ("tenant", "acme")]);

    store.save(&process).await.expect("save should succeed");

    let found = store
        .find(id)
        .await
        .expect("find should succeed")
        .expect("process should exist");

    assert_eq!(found.correlation_id, id);
    assert_eq!(found.blob, blob);
    assert_eq!(found.headers.len(), 2);
    assert_eq!(found.headers.get("source").map(String::as_str), Some("web"));
    assert_eq!(found.headers.get("tenant").map(String::as_str), Some("acme"));
}

pub async fn test_find_isolates_ids<S: ProcessStore>(store: &S) {
    let first = CorrelationId::new();
    let second = CorrelationId::new();

    store
        .save(&make_process(first, b"first", &[("n", "1")]))
        .await
        .unwrap();
    store
        .save(&make_process(second, b"second", &[("n", "2")]))
        .await
        .unwrap();

    let found_first = store.find(first).await.unwrap().unwrap();
    let found_second = store.find(second).await.unwrap().unwrap();

    assert_eq!(found_first.blob, b"first");
    assert_eq!(found_first.headers.get("n").map(String::as_str), Some("1"));
    assert_eq!(found_second.blob, b"second");
    assert_eq!(found_second.headers.get("n").map(String::as_str), Some("2"));
}

// =============================================================================
// ProcessStore::save tests
// =============================================================================

pub async fn test_save_without_headers<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();

    store
        .save(&make_process(id, b"{}", &[]))
        .await
        .expect("save should succeed");

    let found = store.find(id).await.unwrap().unwrap();
    assert!(found.headers.is_empty());
}

pub async fn test_save_updates_existing_blob<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();

    store.save(&make_process(id, b"v1", &[])).await.unwrap();
    store.save(&make_process(id, b"v2", &[])).await.unwrap();
    store.save(&make_process(id, b"v3", &[])).await.unwrap();

    let found = store.find(id).await.unwrap().unwrap();
    assert_eq!(found.blob, b"v3");
}

pub async fn test_save_replaces_headers<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();

    store
        .save(&make_process(id, b"{}", &[("a", "1"), ("b", "2")]))
        .await
        .unwrap();
    store
        .save(&make_process(id, b"{}", &[("b", "3"), ("c", "4")]))
        .await
        .unwrap();

    let found = store.find(id).await.unwrap().unwrap();
    assert_eq!(found.headers.len(), 2, "headers should be replaced, not merged");
    assert!(!found.headers.contains_key("a"));
    assert_eq!(found.headers.get("b").map(String::as_str), Some("3"));
    assert_eq!(found.headers.get("c").map(String::as_str), Some("4"));
}

pub async fn test_save_clears_headers<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();

    store
        .save(&make_process(id, b"{}", &[("a", "1")]))
        .await
        .unwrap();
    store.save(&make_process(id, b"{}", &[])).await.unwrap();

    let found = store.find(id).await.unwrap().unwrap();
    assert!(found.headers.is_empty());
}

// =============================================================================
// ProcessStore::complete tests
// =============================================================================

pub async fn test_complete_existing<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();
    store
        .save(&make_process(id, b"{}", &[("a", "1")]))
        .await
        .unwrap();

    store.complete(id).await.expect("complete should succeed");

    assert!(store.find(id).await.unwrap().is_none());
}

pub async fn test_complete_nonexistent<S: ProcessStore>(store: &S) {
    store
        .complete(CorrelationId::new())
        .await
        .expect("completing an absent process should be a no-op");
}

pub async fn test_complete_then_save_starts_fresh<S: ProcessStore>(store: &S) {
    let id = CorrelationId::new();
    store
        .save(&make_process(id, b"old", &[("stale", "yes")]))
        .await
        .unwrap();
    store.complete(id).await.unwrap();

    store
        .save(&make_process(id, b"new", &[("fresh", "yes")]))
        .await
        .unwrap();

    let found = store.find(id).await.unwrap().unwrap();
    assert_eq!(found.blob, b"new");
    assert!(!found.headers.contains_key("stale"));
}

pub async fn test_complete_leaves_other_processes<S: ProcessStore>(store: &S) {
    let kept = CorrelationId::new();
    let removed = CorrelationId::new();
    store
        .save(&make_process(kept, b"kept", &[("k", "v")]))
        .await
        .unwrap();
    store
        .save(&make_process(removed, b"removed", &[("k", "v")]))
        .await
        .unwrap();

    store.complete(removed).await.unwrap();

    let found = store.find(kept).await.unwrap().unwrap();
    assert_eq!(found.blob, b"kept");
    assert_eq!(found.headers.len(), 1);
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all ProcessStore interface tests against a store implementation.
#[macro_export]
macro_rules! run_process_store_tests {
    ($store:expr) => {
        use $crate::storage::process_store_tests::*;

        // find tests
        test_find_nonexistent($store).await;
        println!("  test_find_nonexistent: PASSED");

        test_find_preserves_blob_and_headers($store).await;
        println!("  test_find_preserves_blob_and_headers: PASSED");

        test_find_isolates_ids($store).await;
        println!("  test_find_isolates_ids: PASSED");

        // save tests
        test_save_without_headers($store).await;
        println!("  test_save_without_headers: PASSED");

        test_save_updates_existing_blob($store).await;
        println!("  test_save_updates_existing_blob: PASSED");

        test_save_replaces_headers($store).await;
        println!("  test_save_replaces_headers: PASSED");

        test_save_clears_headers($store).await;
        println!("  test_save_clears_headers: PASSED");

        // complete tests
        test_complete_existing($store).await;
        println!("  test_complete_existing: PASSED");

        test_complete_nonexistent($store).await;
        println!("  test_complete_nonexistent: PASSED");

        test_complete_then_save_starts_fresh($store).await;
        println!("  test_complete_then_save_starts_fresh: PASSED");

        test_complete_leaves_other_processes($store).await;
        println!("  test_complete_leaves_other_processes: PASSED");
    };
}

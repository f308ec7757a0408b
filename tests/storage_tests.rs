//! Storage Tests
//!
//! Tests verify:
//! - put/get/pop semantics of the in-memory backend
//! - Backend selection by name
//! - Last-writer-wins under concurrent writers

use std::sync::Arc;

use bytes::Bytes;
use raikv::config::StorageConfig;
use raikv::storage::{self, BackendKind, MemoryStore, Storage};
use raikv::KvError;

fn value(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_put_then_get() {
    let store = MemoryStore::new();

    store.put("user1".to_string(), value("alice"));

    assert_eq!(store.get("user1"), Some(value("alice")));
}

#[test]
fn test_get_missing_key() {
    let store = MemoryStore::new();
    assert_eq!(store.get("nobody"), None);
}

#[test]
fn test_put_overwrites_existing() {
    let store = MemoryStore::new();

    store.put("key".to_string(), value("v1"));
    store.put("key".to_string(), value("v2"));

    assert_eq!(store.get("key"), Some(value("v2")));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_pop_removes_key() {
    let store = MemoryStore::new();

    store.put("key".to_string(), value("v"));
    store.pop("key");

    assert_eq!(store.get("key"), None);
    assert!(store.is_empty());
}

#[test]
fn test_pop_missing_key_is_noop() {
    let store = MemoryStore::new();
    store.put("other".to_string(), value("kept"));

    store.pop("never-stored");
    store.pop("never-stored");

    assert_eq!(store.get("never-stored"), None);
    assert_eq!(store.get("other"), Some(value("kept")));
}

#[test]
fn test_values_stored_verbatim() {
    let store = MemoryStore::new();
    let raw = Bytes::from(vec![0x00, 0xFF, 0x80, b'a']);

    store.put("bin".to_string(), raw.clone());

    assert_eq!(store.get("bin"), Some(raw));
}

#[test]
fn test_empty_value_is_found() {
    let store = MemoryStore::new();

    store.put("blank".to_string(), Bytes::new());

    assert_eq!(store.get("blank"), Some(Bytes::new()));
}

// =============================================================================
// Selector Tests
// =============================================================================

#[test]
fn test_backend_kind_names() {
    assert_eq!("map".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    assert_eq!("MAP".parse::<BackendKind>().unwrap(), BackendKind::Memory);
    assert_eq!("lsm".parse::<BackendKind>().unwrap(), BackendKind::Lsm);
}

#[test]
fn test_unknown_backend_carries_name() {
    let err = "rocksdb".parse::<BackendKind>().unwrap_err();
    match err {
        KvError::UnknownBackend(name) => assert_eq!(name, "rocksdb"),
        other => panic!("Expected UnknownBackend, got {:?}", other),
    }
}

#[test]
fn test_select_memory_backend() {
    let backend = storage::select(BackendKind::Memory).unwrap();
    assert_eq!(backend.name(), "map");

    backend.put("k".to_string(), value("v"));
    assert_eq!(backend.get("k"), Some(value("v")));
}

#[test]
fn test_select_lsm_is_unavailable() {
    let result = storage::select(BackendKind::Lsm);
    assert!(matches!(result, Err(KvError::BackendUnavailable(ref name)) if name == "lsm"));
}

#[test]
fn test_open_backend_rejects_unknown_name() {
    let config = StorageConfig {
        backend: "btree".to_string(),
        shards: 4,
    };
    assert!(matches!(
        storage::open_backend(&config),
        Err(KvError::UnknownBackend(_))
    ));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_puts_same_key_last_writer_wins() {
    let store: Arc<dyn Storage> = Arc::new(MemoryStore::with_shards(4));
    let candidates: Vec<String> = (0..16).map(|i| format!("value-{:04}-{}", i, "x".repeat(i * 8))).collect();

    crossbeam::scope(|s| {
        for candidate in &candidates {
            let store = Arc::clone(&store);
            s.spawn(move |_| {
                for _ in 0..200 {
                    store.put("shared".to_string(), Bytes::copy_from_slice(candidate.as_bytes()));
                }
            });
        }
    })
    .unwrap();

    let stored = store.get("shared").unwrap();
    let stored = String::from_utf8(stored.to_vec()).unwrap();
    assert!(candidates.contains(&stored), "mixed value: {}", stored);
}

#[test]
fn test_concurrent_distinct_keys() {
    let store = Arc::new(MemoryStore::with_shards(8));

    crossbeam::scope(|s| {
        for t in 0..8 {
            let store = Arc::clone(&store);
            s.spawn(move |_| {
                for i in 0..250 {
                    let key = format!("t{}-k{}", t, i);
                    store.put(key.clone(), value(&key));
                    if i % 2 == 0 {
                        store.pop(&key);
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(store.len(), 8 * 125);
    assert_eq!(store.get("t3-k1"), Some(value("t3-k1")));
    assert_eq!(store.get("t3-k2"), None);
}

#[test]
fn test_readers_never_see_partial_values() {
    let store = Arc::new(MemoryStore::new());
    let a = "a".repeat(512);
    let b = "b".repeat(512);
    store.put("k".to_string(), value(&a));

    crossbeam::scope(|s| {
        {
            let store = Arc::clone(&store);
            let (a, b) = (a.clone(), b.clone());
            s.spawn(move |_| {
                for i in 0..1000 {
                    let v = if i % 2 == 0 { &b } else { &a };
                    store.put("k".to_string(), value(v));
                }
            });
        }
        for _ in 0..4 {
            let store = Arc::clone(&store);
            let (a, b) = (a.clone(), b.clone());
            s.spawn(move |_| {
                for _ in 0..1000 {
                    let seen = store.get("k").unwrap();
                    assert!(seen == a.as_bytes() || seen == b.as_bytes());
                }
            });
        }
    })
    .unwrap();
}

//! Tests for Engine
//!
//! These tests verify:
//! - put/get/pop dispatch
//! - Soft errors for missing keys and unknown methods
//! - Echo rules for method, key and value
//! - Backend selection at open

use std::sync::Arc;

use bytes::Bytes;
use raikv::config::Config;
use raikv::engine::Engine;
use raikv::protocol::Message;
use raikv::storage::{MemoryStore, Storage};
use raikv::KvError;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_engine() -> Engine {
    Engine::new(Arc::new(MemoryStore::new()))
}

// =============================================================================
// Dispatch Tests
// =============================================================================

#[test]
fn test_put_echoes_request() {
    let engine = setup_engine();

    let response = engine.execute(Message::put("user1", "alice"));

    assert_eq!(response, Message::put("user1", "alice"));
    assert!(!response.is_error());
}

#[test]
fn test_put_then_get() {
    let engine = setup_engine();
    engine.execute(Message::put("user1", "alice"));

    let response = engine.execute(Message::get("user1"));

    assert_eq!(response.method, "get");
    assert_eq!(response.key, "user1");
    assert_eq!(response.value, "alice");
    assert_eq!(response.error_msg, "");
}

#[test]
fn test_get_missing_key_is_soft_error() {
    let engine = setup_engine();

    let response = engine.execute(Message::get("user1"));

    assert_eq!(response.error_msg, "Key user1 not found");
    assert_eq!(response.key, "user1");
    assert!(response.value.is_empty());
}

#[test]
fn test_pop_then_get() {
    let engine = setup_engine();
    engine.execute(Message::put("user1", "alice"));

    let popped = engine.execute(Message::pop("user1"));
    assert!(!popped.is_error());

    let response = engine.execute(Message::get("user1"));
    assert!(response.is_error());
    assert!(response.value.is_empty());
}

#[test]
fn test_pop_never_stored_key() {
    let engine = setup_engine();

    let response = engine.execute(Message::pop("ghost"));

    assert!(!response.is_error());
    assert!(engine.execute(Message::get("ghost")).is_error());
}

#[test]
fn test_unknown_method_is_soft_error() {
    let engine = setup_engine();
    engine.execute(Message::put("user1", "alice"));

    let response = engine.execute(Message::request("delete", "user1", ""));

    assert_eq!(response.method, "delete");
    assert_eq!(response.key, "user1");
    assert!(response.value.is_empty());
    assert!(response.error_msg.contains("Unknown method"));

    // the key is untouched
    assert_eq!(engine.execute(Message::get("user1")).value, "alice");
}

#[test]
fn test_methods_are_case_sensitive() {
    let engine = setup_engine();
    let response = engine.execute(Message::request("PUT", "k", "v"));
    assert!(response.is_error());
}

#[test]
fn test_client_error_msg_is_cleared() {
    let engine = setup_engine();

    let response = engine.execute(Message::put("k", "v").with_error("bogus"));

    assert!(!response.is_error());
}

#[test]
fn test_get_ignores_request_value() {
    let engine = setup_engine();
    engine.execute(Message::put("k", "stored"));

    let response = engine.execute(Message::request("get", "k", "sent"));

    assert_eq!(response.value, "stored");
}

#[test]
fn test_non_utf8_value_is_rendered_lossily() {
    let storage = Arc::new(MemoryStore::new());
    storage.put("raw".to_string(), Bytes::from_static(&[b'o', b'k', 0xFF]));
    let engine = Engine::new(storage);

    let response = engine.execute(Message::get("raw"));

    assert_eq!(response.value, "ok\u{FFFD}");
}

#[test]
fn test_end_to_end_sequence() {
    let engine = setup_engine();

    let r = engine.execute(Message::put("user1", "alice"));
    assert_eq!(r, Message::put("user1", "alice"));

    let r = engine.execute(Message::get("user1"));
    assert_eq!(r, Message::request("get", "user1", "alice"));

    engine.execute(Message::pop("user1"));
    let r = engine.execute(Message::get("user1"));
    assert_eq!(r.error_msg, "Key user1 not found");
    assert_eq!(r.value, "");
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_with_default_config() {
    let engine = Engine::open(&Config::default()).unwrap();
    assert_eq!(engine.storage().name(), "map");
}

#[test]
fn test_open_unknown_backend_fails() {
    let config = Config::builder().backend("cassandra").build();
    assert!(matches!(
        Engine::open(&config),
        Err(KvError::UnknownBackend(ref name)) if name == "cassandra"
    ));
}

#[test]
fn test_open_lsm_backend_fails() {
    let config = Config::builder().backend("lsm").build();
    assert!(matches!(
        Engine::open(&config),
        Err(KvError::BackendUnavailable(_))
    ));
}

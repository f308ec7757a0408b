//! Engine Module
//!
//! Routes decoded requests to the storage backend.
//!
//! ## Responsibilities
//! - Select and own the storage backend chosen at startup
//! - Turn one request message into exactly one response message
//! - Report missing keys and unknown methods inside the response, never as
//!   an `Err`

use std::sync::Arc;

use bytes::Bytes;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Message, Method};
use crate::storage::{self, Storage};

/// The request dispatcher
///
/// ## Concurrency Model
///
/// The engine holds no locks of its own. It is shared as `Arc<Engine>` by
/// every connection thread, and each call goes straight to the backend,
/// which synchronizes per key. Two requests that touch the same key from
/// different connections interleave at backend-operation granularity; a
/// get-then-put sequence across two requests is not atomic.
pub struct Engine {
    storage: Arc<dyn Storage>,
}

impl Engine {
    /// Open an engine with the backend named in `config`
    ///
    /// Unknown or unavailable backends fail here, before any listener is
    /// bound.
    pub fn open(config: &Config) -> Result<Self> {
        let storage = storage::open_backend(&config.storage)?;
        tracing::debug!("Storage backend '{}' ready", storage.name());
        Ok(Self::new(storage))
    }

    /// Wrap an already-built backend
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Execute a request
    ///
    /// `method` and `key` are echoed. `value` is replaced only by a
    /// successful `get`; every other path echoes what the client sent.
    pub fn execute(&self, mut request: Message) -> Message {
        // A request's error_msg carries nothing; only the server fills it in
        request.error_msg.clear();

        let method = match request.parsed_method() {
            Ok(method) => method,
            Err(unknown) => {
                tracing::debug!("Rejecting request for key '{}': {}", request.key, unknown);
                return request.with_error(unknown.to_string());
            }
        };

        match method {
            Method::Put => {
                self.storage
                    .put(request.key.clone(), Bytes::copy_from_slice(request.value.as_bytes()));
                request
            }
            Method::Get => match self.storage.get(&request.key) {
                Some(stored) => Message {
                    value: String::from_utf8_lossy(&stored).into_owned(),
                    ..request
                },
                None => {
                    tracing::debug!("Key {} not found", request.key);
                    let msg = format!("Key {} not found", request.key);
                    request.with_error(msg)
                }
            },
            Method::Pop => {
                self.storage.pop(&request.key);
                request
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The backend this engine dispatches to
    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }
}

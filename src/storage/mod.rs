//! Storage Module
//!
//! Backend-agnostic key/value storage behind the [`Storage`] trait.
//!
//! ## Responsibilities
//! - Upsert, lookup and delete of opaque values keyed by strings
//! - Internal synchronization: callers share one backend across threads
//!   without any locking of their own
//! - Backend selection by name at startup ([`BackendKind`], [`select`])
//!
//! ## Backends
//! - `map` / `memory`: [`MemoryStore`], a sharded in-memory table
//! - `lsm`: reserved for a log-structured engine; recognized by the
//!   selector but not available yet
//!
//! The storage layer knows nothing about the wire protocol. Values are kept
//! exactly as given; turning them into text is the protocol layer's job.

mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bytes::Bytes;

use crate::config::StorageConfig;
use crate::error::{KvError, Result};

pub use memory::MemoryStore;

/// Capability contract every backend implements
///
/// All methods take `&self`; a backend is shared as `Arc<dyn Storage>` by
/// every connection and must do its own synchronization.
pub trait Storage: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: String, value: Bytes);

    /// Current value of `key`, or `None` if it was never stored or has
    /// been popped
    fn get(&self, key: &str) -> Option<Bytes>;

    /// Remove `key`; a missing key is not an error
    fn pop(&self, key: &str);

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

/// The backends the selector knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Sharded in-memory table
    Memory,

    /// Log-structured merge tree (not implemented)
    Lsm,
}

impl BackendKind {
    /// Canonical config name
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "map",
            BackendKind::Lsm => "lsm",
        }
    }
}

impl FromStr for BackendKind {
    type Err = KvError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "map" | "memory" => Ok(BackendKind::Memory),
            "lsm" => Ok(BackendKind::Lsm),
            _ => Err(KvError::UnknownBackend(name.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build a backend of the given kind with default settings
pub fn select(kind: BackendKind) -> Result<Arc<dyn Storage>> {
    select_with(kind, &StorageConfig::default())
}

/// Build a backend of the given kind using `config` for its tuning knobs
pub fn select_with(kind: BackendKind, config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    match kind {
        BackendKind::Memory => Ok(Arc::new(MemoryStore::with_shards(config.shards))),
        BackendKind::Lsm => Err(KvError::BackendUnavailable(kind.as_str().to_string())),
    }
}

/// Parse a backend name and build it; unknown names fail here, at startup
pub fn open_backend(config: &StorageConfig) -> Result<Arc<dyn Storage>> {
    let kind: BackendKind = config.backend.parse()?;
    select_with(kind, config)
}

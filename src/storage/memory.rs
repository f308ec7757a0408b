//! In-memory backend
//!
//! HashMap shards, each behind its own RwLock. A key always maps to the same
//! shard, so every operation on one key is serialized by that shard's lock
//! while unrelated keys proceed in parallel.

use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::hash::BuildHasher;

use bytes::Bytes;
use crossbeam::utils::CachePadded;
use parking_lot::RwLock;

use super::Storage;

/// Default number of shards
pub const DEFAULT_SHARDS: usize = 16;

type Shard = CachePadded<RwLock<HashMap<String, Bytes>>>;

/// Concurrent in-memory key/value table
pub struct MemoryStore {
    shards: Box<[Shard]>,
    hasher: RandomState,
}

impl MemoryStore {
    /// Create an empty store with [`DEFAULT_SHARDS`] shards
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Create an empty store with `count` shards (at least one)
    pub fn with_shards(count: usize) -> Self {
        let shards = (0..count.max(1))
            .map(|_| CachePadded::new(RwLock::new(HashMap::new())))
            .collect();

        Self {
            shards,
            hasher: RandomState::new(),
        }
    }

    /// Number of live keys
    ///
    /// Shards are read one at a time, so the result is approximate while
    /// writers are active.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.read().is_empty())
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, key: &str) -> &Shard {
        let index = (self.hasher.hash_one(key) as usize) % self.shards.len();
        &self.shards[index]
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStore {
    fn put(&self, key: String, value: Bytes) {
        self.shard(&key).write().insert(key, value);
    }

    fn get(&self, key: &str) -> Option<Bytes> {
        // Bytes clones share the buffer; the read lock is released on return
        self.shard(key).read().get(key).cloned()
    }

    fn pop(&self, key: &str) {
        self.shard(key).write().remove(key);
    }

    fn name(&self) -> &'static str {
        "map"
    }
}

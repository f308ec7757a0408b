//! # raikv
//!
//! A networked key-value store with:
//! - A compact, self-delimiting binary wire protocol shared by client and
//!   server
//! - A pluggable storage backend selected by name at startup
//! - A sharded, lock-per-shard in-memory table
//! - One thread per client connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ bytes
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Codec                                    │
//! │           (Message <-> bincode, shared)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Message
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Engine                                   │
//! │              (dispatch on method)                            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ dyn Storage   │
//!               │ (MemoryStore) │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod logging;

pub mod storage;
pub mod protocol;
pub mod engine;
pub mod network;
pub mod client;
pub mod shell;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::Config;
pub use engine::Engine;
pub use client::Client;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of raikv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

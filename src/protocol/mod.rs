//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Symmetric Record)
//!
//! Requests and responses share one schema of four strings:
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────┐
//! │  method  │   key    │  value   │  error_msg  │
//! └──────────┴──────────┴──────────┴─────────────┘
//! ```
//!
//! ### Methods
//! - `put`: store `value` under `key`
//! - `get`: answer with the stored value in `value`
//! - `pop`: remove `key`
//!
//! ### Errors
//! An empty `error_msg` means success. Missing keys and unknown methods are
//! reported through `error_msg` in an otherwise normal response; malformed
//! bytes close the connection.
//!
//! The exchange is strictly one request, then one response, per connection.

mod method;
mod message;
mod codec;

pub use method::{Method, UnknownMethod};
pub use message::Message;
pub use codec::{Codec, MessageReader, DEFAULT_MAX_FRAME_SIZE};

//! Message definitions
//!
//! One record shape serves both directions: a request leaves `error_msg`
//! empty, a response fills it in when something went wrong.

use serde::{Deserialize, Serialize};

use super::method::{Method, UnknownMethod};

/// The wire record
///
/// Field order is part of the schema; reordering fields breaks
/// compatibility with every deployed client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// `put`, `get` or `pop`; anything else is answered with an error
    pub method: String,

    /// Key the operation targets
    pub key: String,

    /// Payload for `put`, result of a successful `get`
    pub value: String,

    /// Empty on success, human-readable failure otherwise
    pub error_msg: String,
}

impl Message {
    /// Create a request with an empty `error_msg`
    pub fn request(method: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            key: key.into(),
            value: value.into(),
            error_msg: String::new(),
        }
    }

    /// A `put key value` request
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::request(Method::Put.as_str(), key, value)
    }

    /// A `get key` request
    pub fn get(key: impl Into<String>) -> Self {
        Self::request(Method::Get.as_str(), key, "")
    }

    /// A `pop key` request
    pub fn pop(key: impl Into<String>) -> Self {
        Self::request(Method::Pop.as_str(), key, "")
    }

    /// Parse the method field
    pub fn parsed_method(&self) -> Result<Method, UnknownMethod> {
        self.method.parse()
    }

    /// Turn this message into a failed response carrying `msg`
    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error_msg = msg.into();
        self
    }

    /// True when `error_msg` is set
    pub fn is_error(&self) -> bool {
        !self.error_msg.is_empty()
    }
}

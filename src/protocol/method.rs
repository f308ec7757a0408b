//! Method definitions
//!
//! The operations a request can name.

use std::fmt;
use std::str::FromStr;

/// Request methods understood by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Store a value under a key
    Put,

    /// Fetch the value of a key
    Get,

    /// Remove a key
    Pop,
}

impl Method {
    /// Wire spelling of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Put => "put",
            Method::Get => "get",
            Method::Pop => "pop",
        }
    }
}

/// Returned when the method string is not one of `put`, `get`, `pop`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl fmt::Display for UnknownMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown method {}", self.0)
    }
}

impl std::error::Error for UnknownMethod {}

impl FromStr for Method {
    type Err = UnknownMethod;

    /// Matching is exact: the wire spelling is lowercase
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "put" => Ok(Method::Put),
            "get" => Ok(Method::Get),
            "pop" => Ok(Method::Pop),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

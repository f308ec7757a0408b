//! Configuration for raikv
//!
//! Centralized configuration with sensible defaults. Values come from a YAML
//! file (`config.yaml`), from the builder, or from both; anything the file
//! leaves out keeps its default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KvError, Result};
use crate::storage::BackendKind;

/// Locations searched by [`Config::discover`], in order
pub const CONFIG_SEARCH_PATHS: [&str; 2] = ["config.yaml", "configs/config.yaml"];

/// Main configuration for a raikv node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP listen address (host:port)
    pub listen_addr: String,

    /// Storage backend selection
    pub storage: StorageConfig,

    /// Per-connection socket settings
    pub network: NetworkConfig,

    /// Logger settings
    pub log: LogConfig,
}

/// Storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend name: `map` (alias `memory`) or `lsm`
    pub backend: String,

    /// Number of lock shards in the in-memory table
    pub shards: usize,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Capacity of the per-connection read buffer; also the largest frame
    /// the codec accepts
    pub read_buffer_size: usize,

    /// Connection read timeout (milliseconds, 0 = block forever)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = block forever)
    pub write_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `raikv=debug`
    pub level: String,

    /// Where log lines go
    pub output: LogOutput,

    /// File sink settings, used when `output` is `file`
    pub file: FileLogConfig,
}

/// Log sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Log file path; parent directories are created on startup
    pub path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:3232".to_string(),
            storage: StorageConfig::default(),
            network: NetworkConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "map".to_string(),
            shards: 16,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Stdout,
            file: FileLogConfig::default(),
        }
    }
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("logs/raikv.log"),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            KvError::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        Self::from_yaml(&raw)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw)
            .map_err(|e| KvError::Config(format!("failed to parse config: {}", e)))
    }

    /// Load the first config file found in [`CONFIG_SEARCH_PATHS`] under
    /// `root`, or the defaults when there is none
    pub fn discover<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        for candidate in CONFIG_SEARCH_PATHS {
            let path = root.join(candidate);
            if path.is_file() {
                return Self::load(path);
            }
        }
        Ok(Self::default())
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.listen_addr.trim().is_empty() {
            return Err(KvError::Config("listen_addr must not be empty".to_string()));
        }
        if self.network.read_buffer_size == 0 {
            return Err(KvError::Config(
                "network.read_buffer_size must be greater than zero".to_string(),
            ));
        }
        self.backend_kind()?;
        Ok(())
    }

    /// Parse the configured backend name
    pub fn backend_kind(&self) -> Result<BackendKind> {
        self.storage.backend.parse()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the storage backend name
    pub fn backend(mut self, name: impl Into<String>) -> Self {
        self.config.storage.backend = name.into();
        self
    }

    /// Set the number of in-memory shards
    pub fn shards(mut self, count: usize) -> Self {
        self.config.storage.shards = count;
        self
    }

    /// Set the per-connection read buffer size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.network.read_buffer_size = size;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.network.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.network.write_timeout_ms = ms;
        self
    }

    /// Set the log filter level
    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.config.log.level = level.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

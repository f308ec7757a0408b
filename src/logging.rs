//! Logger setup
//!
//! Installs the global `tracing` subscriber once at startup. `RUST_LOG`
//! overrides the configured level when it is set.

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogConfig, LogOutput};
use crate::error::{KvError, Result};

/// Install the global subscriber described by `config`
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| KvError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    let installed = match config.output {
        LogOutput::Stdout => builder.with_writer(std::io::stdout).try_init(),
        LogOutput::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogOutput::File => {
            let path = &config.file.path;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Arc::new(file)).try_init()
        }
    };

    installed.map_err(|e| KvError::Config(format!("logger already initialized: {}", e)))
}

//! raikv Server Binary
//!
//! Starts the TCP server for raikv.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use raikv::network::listen_and_serve;
use raikv::{logging, Config, Engine};

/// raikv Server
#[derive(Parser, Debug)]
#[command(name = "raikv-server")]
#[command(about = "Networked key-value store")]
#[command(version)]
struct Args {
    /// Config file (YAML); defaults to ./config.yaml or ./configs/config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (host:port), overrides the config file
    #[arg(short, long)]
    listen: Option<String>,

    /// Storage backend (map, lsm), overrides the config file
    #[arg(short, long)]
    backend: Option<String>,
}

fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize tracing/logging
    if let Err(e) = logging::init(&config.log) {
        eprintln!("Error initializing logger: {}", e);
        std::process::exit(1);
    }

    tracing::info!("raikv Server v{}", raikv::VERSION);
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Storage backend: {}", config.storage.backend);

    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    // Select the storage backend before accepting anything
    let engine = match Engine::open(&config) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open storage backend: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = listen_and_serve(&config, engine) {
        tracing::error!("Failed to listen on tcp: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> raikv::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(".")?,
    };

    if let Some(listen) = &args.listen {
        config.listen_addr = listen.clone();
    }
    if let Some(backend) = &args.backend {
        config.storage.backend = backend.clone();
    }

    Ok(config)
}

//! TCP Server
//!
//! Accepts connections and hands each one to its own thread.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crate::config::Config;
use crate::engine::Engine;
use crate::error::{KvError, Result};
use crate::protocol::Codec;

use super::Connection;

/// TCP server for raikv
pub struct Server {
    listener: TcpListener,
    engine: Arc<Engine>,
    codec: Arc<Codec>,
    read_timeout_ms: u64,
    write_timeout_ms: u64,
    next_conn_id: AtomicU64,
}

impl Server {
    /// Bind the listen address from `config`
    ///
    /// A bind failure is returned to the caller; the process should not
    /// start without its listener.
    pub fn bind(config: &Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).map_err(|source| KvError::Bind {
            addr: config.listen_addr.clone(),
            source,
        })?;

        Ok(Self {
            listener,
            engine,
            codec: Arc::new(Codec::new(config.network.read_buffer_size)),
            read_timeout_ms: config.network.read_timeout_ms,
            write_timeout_ms: config.network.write_timeout_ms,
            next_conn_id: AtomicU64::new(1),
        })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever (blocking)
    ///
    /// Accept errors are logged and the loop keeps going.
    pub fn run(self) -> Result<()> {
        tracing::info!(
            "TCP server started on {} (backend: {})",
            self.local_addr()?,
            self.engine.storage().name()
        );

        loop {
            match self.listener.accept() {
                Ok((stream, peer)) => self.spawn_connection(stream, peer),
                Err(e) => {
                    tracing::warn!("Failed to accept connection: {}", e);
                }
            }
        }
    }

    fn spawn_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let engine = Arc::clone(&self.engine);
        let codec = Arc::clone(&self.codec);
        let (read_ms, write_ms) = (self.read_timeout_ms, self.write_timeout_ms);

        let spawned = thread::Builder::new()
            .name(format!("raikv-conn-{}", id))
            .spawn(move || {
                if let Err(e) = serve(id, stream, engine, codec, read_ms, write_ms) {
                    tracing::warn!("Failed to set up connection {} from {}: {}", id, peer, e);
                }
            });

        // The closure, and the stream with it, is dropped on failure
        if let Err(e) = spawned {
            tracing::error!("Failed to spawn handler for {}: {}", peer, e);
        }
    }
}

/// Set up and drive one connection; only setup failures are returned
fn serve(
    id: u64,
    stream: TcpStream,
    engine: Arc<Engine>,
    codec: Arc<Codec>,
    read_ms: u64,
    write_ms: u64,
) -> Result<()> {
    let mut connection = Connection::new(stream, engine, codec)?;
    connection.set_timeouts(read_ms, write_ms)?;

    if let Err(e) = connection.handle() {
        tracing::warn!(
            "Connection {} from {} closed with error: {}",
            id,
            connection.peer_addr(),
            e
        );
    }
    Ok(())
}

/// Bind and serve until the process is killed
///
/// Only returns on a bind failure or if the listener itself goes away.
pub fn listen_and_serve(config: &Config, engine: Arc<Engine>) -> Result<()> {
    Server::bind(config, engine)?.run()
}

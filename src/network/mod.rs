//! Network Module
//!
//! TCP server and client handling.
//!
//! ## Architecture
//! - Single acceptor loop
//! - One thread per connection
//! - Requests routed through Engine

mod server;
mod connection;

pub use server::{listen_and_serve, Server};
pub use connection::Connection;

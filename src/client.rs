//! Blocking TCP client
//!
//! Speaks the same wire protocol as the server, one request at a time.

use std::io::BufWriter;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;

use crate::error::{KvError, Result};
use crate::protocol::{Codec, Message, MessageReader};

/// Client connection to a raikv server
pub struct Client {
    reader: MessageReader<TcpStream>,
    writer: BufWriter<TcpStream>,
    codec: Arc<Codec>,
}

impl Client {
    /// Connect with the default codec
    pub fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self> {
        Self::connect_with(addr, Codec::default())
    }

    /// Connect using `codec`; its frame size must match the server's
    pub fn connect_with<A: ToSocketAddrs>(addr: A, codec: Codec) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        let codec = Arc::new(codec);
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: MessageReader::new(read_stream, Arc::clone(&codec)),
            writer: BufWriter::new(stream),
            codec,
        })
    }

    /// Send one request and wait for its response
    ///
    /// Soft failures come back as a response with `error_msg` set.
    pub fn request(&mut self, message: &Message) -> Result<Message> {
        self.codec.write_message(&mut self.writer, message)?;

        self.reader
            .read_message()?
            .ok_or_else(|| KvError::Network("server closed the connection".to_string()))
    }

    /// Store `value` under `key`
    pub fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let response = self.request(&Message::put(key, value))?;
        into_result(response).map(|_| ())
    }

    /// Fetch `key`; `None` when the server reports it missing
    pub fn get(&mut self, key: &str) -> Result<Option<String>> {
        let response = self.request(&Message::get(key))?;
        if response.is_error() {
            // the server reports absence as a soft error
            return Ok(None);
        }
        Ok(Some(response.value))
    }

    /// Remove `key`
    pub fn pop(&mut self, key: &str) -> Result<()> {
        let response = self.request(&Message::pop(key))?;
        into_result(response).map(|_| ())
    }
}

fn into_result(response: Message) -> Result<Message> {
    if response.is_error() {
        Err(KvError::Protocol(response.error_msg))
    } else {
        Ok(response)
    }
}

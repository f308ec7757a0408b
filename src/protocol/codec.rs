//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! Every message, request or response, is the same four strings in a fixed
//! order, each written as a varint length followed by UTF-8 bytes:
//! ```text
//! ┌─────────┬────────┬──────┬─────┬────────┬───────┬─────────┬───────────┐
//! │ Len (v) │ method │ Len  │ key │  Len   │ value │  Len    │ error_msg │
//! └─────────┴────────┴──────┴─────┴────────┴───────┴─────────┴───────────┘
//! ```
//! A length below 251 takes one byte. There is no outer length prefix;
//! the string lengths make each message self-delimiting.
//!
//! `max_frame_size` bounds what is read off the wire and doubles as the size
//! of the per-connection read buffer. Encoding is unbounded: a response may
//! legitimately be longer than the request it answers.

use std::io::{self, Read, Write};
use std::sync::Arc;

use bincode::Options;
use bytes::{Buf, BytesMut};

use super::Message;
use crate::error::{KvError, Result};

/// Default frame bound (1 KiB)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 1024;

/// Stateless encoder/decoder for [`Message`]
///
/// Holds only the frame bound, so one instance is shared by every
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    max_frame_size: usize,
}

impl Codec {
    /// Create a codec that accepts frames up to `max_frame_size` bytes
    pub fn new(max_frame_size: usize) -> Self {
        Self {
            max_frame_size: max_frame_size.max(1),
        }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    fn encode_options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_varint_encoding()
            .with_little_endian()
    }

    fn decode_options(&self) -> impl Options {
        Self::encode_options().with_limit(self.max_frame_size as u64)
    }

    // =========================================================================
    // Encoding
    // =========================================================================

    /// Encode a message to bytes
    ///
    /// The frame bound is not applied here; it is the receiver's limit.
    pub fn encode(&self, message: &Message) -> Result<Vec<u8>> {
        Self::encode_options()
            .serialize(message)
            .map_err(|e| KvError::Encode(e.to_string()))
    }

    // =========================================================================
    // Decoding
    // =========================================================================

    /// Decode exactly one message from `bytes`
    ///
    /// Truncated input, invalid UTF-8 and trailing bytes are all errors.
    pub fn decode(&self, bytes: &[u8]) -> Result<Message> {
        if bytes.len() > self.max_frame_size {
            return Err(KvError::FrameTooLarge {
                limit: self.max_frame_size,
            });
        }

        self.decode_options()
            .reject_trailing_bytes()
            .deserialize(bytes)
            .map_err(|e| self.decode_error(*e))
    }

    /// Decode the next message from an accumulating read buffer
    ///
    /// Returns `Ok(None)` when the buffer holds only a prefix of a message
    /// and more bytes are needed. On success the message's bytes are
    /// consumed from `buffer`; anything after them is left for the next
    /// call.
    pub fn decode_frame(&self, buffer: &mut BytesMut) -> Result<Option<Message>> {
        if buffer.is_empty() {
            return Ok(None);
        }

        let mut remaining: &[u8] = &buffer[..];
        let decoded: bincode::Result<Message> = self
            .decode_options()
            .allow_trailing_bytes()
            .deserialize_from(&mut remaining);

        match decoded {
            Ok(message) => {
                let consumed = buffer.len() - remaining.len();
                buffer.advance(consumed);
                Ok(Some(message))
            }
            Err(e) => match *e {
                bincode::ErrorKind::Io(ref io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
                    if buffer.len() >= self.max_frame_size {
                        Err(KvError::FrameTooLarge {
                            limit: self.max_frame_size,
                        })
                    } else {
                        Ok(None)
                    }
                }
                other => Err(self.decode_error(other)),
            },
        }
    }

    fn decode_error(&self, err: bincode::ErrorKind) -> KvError {
        match err {
            bincode::ErrorKind::SizeLimit => KvError::FrameTooLarge {
                limit: self.max_frame_size,
            },
            bincode::ErrorKind::Io(ref io_err) if io_err.kind() == io::ErrorKind::UnexpectedEof => {
                KvError::Decode("truncated message".to_string())
            }
            other => KvError::Decode(other.to_string()),
        }
    }

    // =========================================================================
    // Stream-based I/O helpers
    // =========================================================================

    /// Write a message to a stream and flush it
    pub fn write_message<W: Write>(&self, writer: &mut W, message: &Message) -> Result<()> {
        let bytes = self.encode(message)?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

/// Reads whole messages off a byte stream
///
/// Bytes are read in chunks into a buffer bounded by the codec's frame size
/// until a complete message can be decoded.
pub struct MessageReader<R> {
    inner: R,
    codec: Arc<Codec>,
    buffer: BytesMut,
    chunk: Box<[u8]>,
}

impl<R: Read> MessageReader<R> {
    pub fn new(inner: R, codec: Arc<Codec>) -> Self {
        let capacity = codec.max_frame_size();
        Self {
            inner,
            codec,
            buffer: BytesMut::with_capacity(capacity),
            chunk: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    /// Read the next message
    ///
    /// Blocks until a complete message arrives. Returns `Ok(None)` when the
    /// peer closes the stream between messages; a close in the middle of a
    /// message is an `UnexpectedEof` I/O error.
    pub fn read_message(&mut self) -> Result<Option<Message>> {
        loop {
            if let Some(message) = self.codec.decode_frame(&mut self.buffer)? {
                return Ok(Some(message));
            }

            // decode_frame fails once the buffer is full, so there is room
            let room = self.codec.max_frame_size() - self.buffer.len();
            let n = match self.inner.read(&mut self.chunk[..room]) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Err(KvError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("stream closed with {} bytes of a partial message", self.buffer.len()),
                )));
            }

            self.buffer.extend_from_slice(&self.chunk[..n]);
        }
    }

    /// Bytes received but not yet decoded
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_frame_leaves_following_bytes() {
        let codec = Codec::default();
        let mut buffer = BytesMut::new();
        buffer.extend_from_slice(&codec.encode(&Message::get("a")).unwrap());
        buffer.extend_from_slice(&codec.encode(&Message::pop("b")).unwrap());

        let first = codec.decode_frame(&mut buffer).unwrap().unwrap();
        assert_eq!(first, Message::get("a"));

        let second = codec.decode_frame(&mut buffer).unwrap().unwrap();
        assert_eq!(second, Message::pop("b"));

        assert!(buffer.is_empty());
        assert!(codec.decode_frame(&mut buffer).unwrap().is_none());
    }

    #[test]
    fn test_short_strings_use_one_byte_lengths() {
        let codec = Codec::default();
        let encoded = codec.encode(&Message::put("k", "v")).unwrap();
        // "put", "k", "v", "" plus one length byte each
        assert_eq!(encoded.len(), 3 + 1 + 1 + 0 + 4);
        assert_eq!(encoded[0], 3);
        assert_eq!(&encoded[1..4], b"put");
    }
}

//! Binary websocket frame codec.
//!
//! Only single, unfragmented binary frames with payloads of up to 65535 bytes are supported.
//! Control frames and the 64 bit extended payload length are rejected.
//!
//! ## Examples
//!
//! Wrap a payload on the client (masking) side and reassemble it on the server side, with the
//! frame arriving in two chunks.
//! ```
//! use wsframer::ws::FrameCodec;
//!
//! let mut client = FrameCodec::client();
//! let mut server = FrameCodec::server();
//!
//! let frame = client.wrap(b"Hello, World!").unwrap().to_vec();
//! assert!(server.submit(&frame[..4]).unwrap().is_none());
//! assert_eq!(b"Hello, World!", server.submit(&frame[4..]).unwrap().unwrap());
//! ```
//!
//! Receive every frame delivered by a single read.
//! ```no_run
//! use std::net::TcpStream;
//! use wsframer::ws::FrameCodec;
//!
//! fn consume(codec: &mut FrameCodec, stream: &mut TcpStream) -> Result<(), wsframer::ws::Error> {
//!     codec.read_from(stream)?;
//!     while let Some(payload) = codec.decode_next()? {
//!         println!("{}", String::from_utf8_lossy(payload));
//!     }
//!     Ok(())
//! }
//! ```

use std::io::{Read, Write};

pub use crate::ws::decoder::FrameReceiver;
pub use crate::ws::encoder::{FixedKeySource, FrameWriter, MaskingKeySource, RandomKeySource};
pub use crate::ws::error::Error;
pub use crate::ws::header::FrameHeader;

mod decoder;
mod encoder;
mod error;
pub mod header;
pub mod mask;
pub mod protocol;

/// Side of the connection a codec acts for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    /// Masks every outgoing frame and only accepts unmasked frames (client).
    Masking,
    /// Never masks outgoing frames and only accepts masked frames (server).
    NonMasking,
}

impl Role {
    #[inline]
    pub const fn masks_output(&self) -> bool {
        matches!(self, Role::Masking)
    }

    #[inline]
    pub const fn expects_masked_input(&self) -> bool {
        !self.masks_output()
    }

    /// Role of the other end of the connection.
    #[inline]
    pub const fn peer(&self) -> Role {
        match self {
            Role::Masking => Role::NonMasking,
            Role::NonMasking => Role::Masking,
        }
    }
}

/// Encoder and decoder for one end of a connection.
#[derive(Debug)]
pub struct FrameCodec<K = RandomKeySource> {
    writer: FrameWriter<K>,
    receiver: FrameReceiver,
}

impl FrameCodec {
    pub fn new(role: Role) -> Self {
        Self::with_key_source(role, RandomKeySource)
    }

    pub fn client() -> Self {
        Self::new(Role::Masking)
    }

    pub fn server() -> Self {
        Self::new(Role::NonMasking)
    }
}

impl<K: MaskingKeySource> FrameCodec<K> {
    pub fn with_key_source(role: Role, key_source: K) -> Self {
        Self {
            writer: FrameWriter::with_key_source(role, key_source),
            receiver: FrameReceiver::new(role),
        }
    }

    /// Limit payload size in both directions.
    pub fn with_max_payload_size(self, max_payload_size: usize) -> Self {
        Self {
            writer: self.writer.with_max_payload_size(max_payload_size),
            receiver: self.receiver.with_max_payload_size(max_payload_size),
        }
    }

    #[inline]
    pub const fn role(&self) -> Role {
        self.receiver.role()
    }

    #[inline]
    pub const fn writer(&self) -> &FrameWriter<K> {
        &self.writer
    }

    #[inline]
    pub const fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }

    #[inline]
    pub fn wrap(&mut self, payload: &[u8]) -> Result<&[u8], Error> {
        self.writer.wrap(payload)
    }

    #[inline]
    pub fn send<S: Write>(&mut self, stream: &mut S, payload: &[u8]) -> Result<(), Error> {
        self.writer.send(stream, payload)
    }

    #[inline]
    pub fn submit(&mut self, chunk: &[u8]) -> Result<Option<&[u8]>, Error> {
        self.receiver.submit(chunk)
    }

    #[inline]
    pub fn submit_all<F: FnMut(&[u8])>(&mut self, chunk: &[u8], on_payload: F) -> Result<usize, Error> {
        self.receiver.submit_all(chunk, on_payload)
    }

    #[inline]
    pub fn decode_next(&mut self) -> Result<Option<&[u8]>, Error> {
        self.receiver.decode_next()
    }

    #[inline]
    pub fn read_from<S: Read>(&mut self, stream: &mut S) -> Result<usize, Error> {
        self.receiver.read_from(stream)
    }
}

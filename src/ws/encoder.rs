use std::io::Write;

use log::trace;

use crate::ws::{mask, protocol, Error, Role};

/// Source of masking keys for outgoing frames.
pub trait MaskingKeySource {
    fn next_key(&mut self) -> u32;
}

/// Draws a fresh unpredictable key for every frame.
#[derive(Debug, Default, Copy, Clone)]
pub struct RandomKeySource;

impl MaskingKeySource for RandomKeySource {
    #[inline]
    fn next_key(&mut self) -> u32 {
        rand::random()
    }
}

/// Always returns the same key. Only meant for deterministic tests and replays.
#[derive(Debug, Copy, Clone)]
pub struct FixedKeySource(pub u32);

impl MaskingKeySource for FixedKeySource {
    #[inline]
    fn next_key(&mut self) -> u32 {
        self.0
    }
}

impl<F: FnMut() -> u32> MaskingKeySource for F {
    #[inline]
    fn next_key(&mut self) -> u32 {
        self()
    }
}

/// Serializes payloads into binary frames for one role. The frame is assembled in a buffer owned
/// by the writer and handed out by reference, so it must be copied if it needs to outlive the
/// next call.
#[derive(Debug)]
pub struct FrameWriter<K = RandomKeySource> {
    role: Role,
    key_source: K,
    buffer: Vec<u8>,
    max_payload_size: usize,
    last_masking_key: Option<u32>,
}

impl FrameWriter {
    pub fn new(role: Role) -> Self {
        Self::with_key_source(role, RandomKeySource)
    }
}

impl<K: MaskingKeySource> FrameWriter<K> {
    pub fn with_key_source(role: Role, key_source: K) -> Self {
        Self {
            role,
            key_source,
            buffer: Vec::with_capacity(4096),
            max_payload_size: protocol::MAX_PAYLOAD_LENGTH,
            last_masking_key: None,
        }
    }

    /// Limit the size of payloads this writer accepts.
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    #[inline]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Masking key used for the most recent frame, if that frame was masked.
    #[inline]
    pub const fn last_masking_key(&self) -> Option<u32> {
        self.last_masking_key
    }

    /// Wrap `payload` into a single binary frame and return the complete wire bytes.
    pub fn wrap(&mut self, payload: &[u8]) -> Result<&[u8], Error> {
        let len = payload.len();
        if len > protocol::MAX_PAYLOAD_LENGTH {
            return Err(Error::UnsupportedLengthScheme);
        }
        if len > self.max_payload_size {
            return Err(Error::PayloadTooLarge {
                length: len as u64,
                limit: self.max_payload_size,
            });
        }

        self.buffer.clear();
        self.buffer.reserve(protocol::MAX_HEADER_LEN + len);
        self.buffer.push(protocol::FIN_MASK | protocol::op::BINARY_FRAME);

        let mask_bit = match self.role.masks_output() {
            true => protocol::MASK_MASK,
            false => 0,
        };
        if len <= protocol::MAX_IMMEDIATE_LENGTH {
            self.buffer.push(mask_bit | len as u8);
        } else {
            self.buffer.push(mask_bit | protocol::EXTENDED_LENGTH_16);
            self.buffer.extend_from_slice(&(len as u16).to_be_bytes());
        }

        if self.role.masks_output() {
            let key = self.key_source.next_key();
            self.buffer.extend_from_slice(&key.to_be_bytes());
            let offset = self.buffer.len();
            self.buffer.resize(offset + len, 0u8);
            mask::apply(payload, key, &mut self.buffer[offset..]);
            self.last_masking_key = Some(key);
        } else {
            self.buffer.extend_from_slice(payload);
            self.last_masking_key = None;
        }

        trace!("wrapped {len} byte payload into {} byte frame ({:?})", self.buffer.len(), self.role);
        Ok(self.buffer.as_slice())
    }

    /// Wrap `payload` and write the resulting frame to the stream.
    pub fn send<S: Write>(&mut self, stream: &mut S, payload: &[u8]) -> Result<(), Error> {
        let frame = self.wrap(payload)?;
        stream.write_all(frame)?;
        stream.flush()?;
        Ok(())
    }
}

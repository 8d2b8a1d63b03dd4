use std::io::Read;

use log::{trace, warn};

use crate::buffer::ReassemblyBuffer;
use crate::ws::header::{self, FrameHeader};
use crate::ws::{mask, protocol, Error, Role};

/// Incrementally reassembles binary frames from chunks of arbitrary size and yields their
/// unmasked payloads.
///
/// A receiver belongs to exactly one connection. Once it reports a fatal error it stays failed
/// and every further call returns [`Error::Closed`].
#[derive(Debug)]
pub struct FrameReceiver {
    role: Role,
    buffer: ReassemblyBuffer,
    payload: Vec<u8>,
    decode_state: DecodeState,
    max_payload_size: usize,
    last_payload_length: u64,
    last_masking_key: Option<u32>,
    closed: bool,
}

#[derive(Debug)]
enum DecodeState {
    ReadingHeader,
    ReadingPayload(FrameHeader),
}

impl FrameReceiver {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            buffer: ReassemblyBuffer::new(),
            payload: Vec::with_capacity(4096),
            decode_state: DecodeState::ReadingHeader,
            max_payload_size: protocol::MAX_PAYLOAD_LENGTH,
            last_payload_length: 0,
            last_masking_key: None,
            closed: false,
        }
    }

    /// Reject frames declaring a payload larger than `max_payload_size`.
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    #[inline]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Checks if the receiver has failed. A failed receiver can be dropped.
    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of bytes buffered but not yet part of an extracted frame.
    #[inline]
    pub const fn buffered(&self) -> usize {
        self.buffer.available()
    }

    /// Payload length declared by the most recently parsed header.
    #[inline]
    pub const fn last_payload_length(&self) -> u64 {
        self.last_payload_length
    }

    /// Masking key of the most recently parsed header.
    #[inline]
    pub const fn last_masking_key(&self) -> Option<u32> {
        self.last_masking_key
    }

    /// Append `chunk` and return the payload of the first complete frame, if any. When a chunk
    /// may carry more than one frame keep calling [`FrameReceiver::decode_next`] until it returns
    /// `Ok(None)`, or use [`FrameReceiver::submit_all`].
    #[inline]
    pub fn submit(&mut self, chunk: &[u8]) -> Result<Option<&[u8]>, Error> {
        self.ensure_not_closed()?;
        self.buffer.append(chunk);
        self.decode_next()
    }

    /// Append `chunk` and invoke `on_payload` once for every frame that is now complete.
    /// Returns the number of payloads delivered.
    pub fn submit_all<F>(&mut self, chunk: &[u8], mut on_payload: F) -> Result<usize, Error>
    where
        F: FnMut(&[u8]),
    {
        self.ensure_not_closed()?;
        self.buffer.append(chunk);
        let mut count = 0;
        while let Some(payload) = self.decode_next()? {
            on_payload(payload);
            count += 1;
        }
        Ok(count)
    }

    /// Perform a single read from the stream into the reassembly buffer. Frames are then
    /// extracted with [`FrameReceiver::decode_next`].
    pub fn read_from<S: Read>(&mut self, stream: &mut S) -> Result<usize, Error> {
        self.ensure_not_closed()?;
        match self.buffer.read_from(stream) {
            Ok(read) => Ok(read),
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Extract the next complete frame from already buffered bytes.
    pub fn decode_next(&mut self) -> Result<Option<&[u8]>, Error> {
        self.ensure_not_closed()?;
        loop {
            match self.decode_state {
                DecodeState::ReadingHeader => {
                    let header = match header::parse(self.buffer.view(), self.role) {
                        Ok(Some(header)) => header,
                        Ok(None) => return Ok(None),
                        Err(err) => return Err(self.fail(err)),
                    };
                    self.last_payload_length = header.payload_length;
                    self.last_masking_key = header.masking_key;
                    if header.payload_length > self.max_payload_size as u64 {
                        return Err(self.fail(Error::PayloadTooLarge {
                            length: header.payload_length,
                            limit: self.max_payload_size,
                        }));
                    }
                    self.decode_state = DecodeState::ReadingPayload(header);
                }
                DecodeState::ReadingPayload(header) => {
                    let frame_len = header.frame_len() as usize;
                    if self.buffer.available() < frame_len {
                        return Ok(None);
                    }
                    let payload = &self.buffer.view()[header.header_len..frame_len];
                    self.payload.clear();
                    self.payload.extend_from_slice(payload);
                    if let Some(key) = header.masking_key {
                        mask::apply_in_place(&mut self.payload, key);
                    }
                    self.buffer.consume(frame_len);
                    self.decode_state = DecodeState::ReadingHeader;
                    trace!("decoded {} byte payload ({:?})", self.payload.len(), self.role);
                    return Ok(Some(self.payload.as_slice()));
                }
            }
        }
    }

    #[inline]
    const fn ensure_not_closed(&self) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Closed);
        }
        Ok(())
    }

    #[cold]
    fn fail(&mut self, err: Error) -> Error {
        warn!("frame receiver ({:?}) failed with {} bytes buffered: {err}", self.role, self.buffer.available());
        self.closed = true;
        err
    }
}

use crate::ws::{protocol, Error, Role};

/// Decoded frame header together with the length prefix and the masking key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct FrameHeader {
    pub fin: bool,
    pub opcode: u8,
    pub masked: bool,
    /// Number of bytes occupied by the header, extended length and masking key.
    pub header_len: usize,
    pub payload_length: u64,
    pub masking_key: Option<u32>,
}

impl FrameHeader {
    /// Total number of bytes occupied by the frame on the wire.
    #[inline]
    pub const fn frame_len(&self) -> u64 {
        self.header_len as u64 + self.payload_length
    }
}

/// Try to parse the frame header at the front of `window` for a receiver acting as `role`.
///
/// Returns `Ok(None)` if the window does not yet hold the whole header (including the extended
/// length and masking key). Payload bytes are never inspected.
pub fn parse(window: &[u8], role: Role) -> Result<Option<FrameHeader>, Error> {
    if window.len() < protocol::BASE_HEADER_LEN {
        return Ok(None);
    }

    let b0 = window[0];
    let fin = b0 & protocol::FIN_MASK != 0;
    if !fin {
        return Err(Error::UnsupportedFraming("FIN bit clear, fragmented messages are not supported"));
    }
    let opcode = b0 & protocol::OP_CODE_MASK;
    if opcode != protocol::op::BINARY_FRAME {
        return Err(Error::UnsupportedFraming("opcode other than binary"));
    }

    let b1 = window[1];
    let masked = b1 & protocol::MASK_MASK != 0;
    if masked != role.expects_masked_input() {
        return Err(match masked {
            true => Error::UnsupportedFraming("masking bit set on a frame sent by the non-masking role"),
            false => Error::UnsupportedFraming("masking bit clear on a frame sent by the masking role"),
        });
    }

    let mut header_len = protocol::BASE_HEADER_LEN;
    let payload_length = match b1 & protocol::PAYLOAD_LENGTH_MASK {
        protocol::EXTENDED_LENGTH_16 => {
            if window.len() < header_len + protocol::EXTENDED_LENGTH_16_LEN {
                return Ok(None);
            }
            header_len += protocol::EXTENDED_LENGTH_16_LEN;
            u16::from_be_bytes([window[2], window[3]]) as u64
        }
        protocol::EXTENDED_LENGTH_64 => return Err(Error::UnsupportedLengthScheme),
        len => len as u64,
    };

    let masking_key = if masked {
        if window.len() < header_len + protocol::MASKING_KEY_LEN {
            return Ok(None);
        }
        let key = &window[header_len..header_len + protocol::MASKING_KEY_LEN];
        header_len += protocol::MASKING_KEY_LEN;
        Some(u32::from_be_bytes([key[0], key[1], key[2], key[3]]))
    } else {
        None
    };

    Ok(Some(FrameHeader {
        fin,
        opcode,
        masked,
        header_len,
        payload_length,
        masking_key,
    }))
}

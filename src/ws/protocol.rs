pub const FIN_MASK: u8 = 0b1000_0000;
pub const OP_CODE_MASK: u8 = 0b0000_1111;
pub const MASK_MASK: u8 = 0b1000_0000;
pub const PAYLOAD_LENGTH_MASK: u8 = 0b0111_1111;

/// Largest length that fits in the 7 bit field.
pub const MAX_IMMEDIATE_LENGTH: usize = 125;
/// 7 bit field marker announcing a 16 bit extended length.
pub const EXTENDED_LENGTH_16: u8 = 126;
/// 7 bit field marker announcing a 64 bit extended length (not supported).
pub const EXTENDED_LENGTH_64: u8 = 127;
/// Largest payload expressible without the 64 bit extended length.
pub const MAX_PAYLOAD_LENGTH: usize = u16::MAX as usize;

pub const BASE_HEADER_LEN: usize = 2;
pub const EXTENDED_LENGTH_16_LEN: usize = 2;
pub const MASKING_KEY_LEN: usize = 4;
pub const MAX_HEADER_LEN: usize = BASE_HEADER_LEN + EXTENDED_LENGTH_16_LEN + MASKING_KEY_LEN;

pub mod op {
    pub const BINARY_FRAME: u8 = 0x2;
}

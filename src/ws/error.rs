use std::io;
use std::io::ErrorKind::Other;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Frame uses a feature outside the supported subset (fragmentation, non binary opcode) or
    /// its mask bit does not match the role of the receiving side.
    #[error("unsupported framing: {0}")]
    UnsupportedFraming(&'static str),
    #[error("unsupported payload length scheme: 64 bit extended payload length is not implemented")]
    UnsupportedLengthScheme,
    #[error("payload of {length} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { length: u64, limit: usize },
    #[error("the frame receiver has failed and can be dropped")]
    Closed,
    #[error("IO error: {0}")]
    IO(#[from] io::Error),
}

impl From<Error> for io::Error {
    fn from(value: Error) -> Self {
        match value {
            Error::IO(err) => err,
            other => io::Error::new(Other, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind::{BrokenPipe, Other};

    #[test]
    fn should_unwrap_io_error_when_converting() {
        let err: io::Error = Error::IO(io::Error::from(BrokenPipe)).into();
        assert_eq!(BrokenPipe, err.kind());
    }

    #[test]
    fn should_wrap_protocol_error_when_converting() {
        let err: io::Error = Error::UnsupportedFraming("opcode other than binary").into();
        assert_eq!(Other, err.kind());
        assert_eq!("unsupported framing: opcode other than binary", err.to_string());
    }
}

use std::io;
use std::io::ErrorKind::{UnexpectedEof, WouldBlock};

/// Maps the result of a non-blocking read so that `WouldBlock` means "nothing yet" and a zero
/// length read means the peer has gone away.
pub trait NoBlock {
    type Value;

    fn no_block(self) -> io::Result<Self::Value>;
}

impl NoBlock for io::Result<usize> {
    type Value = usize;

    fn no_block(self) -> io::Result<Self::Value> {
        match self {
            Ok(0) => Err(io::Error::from(UnexpectedEof)),
            Ok(n) => Ok(n),
            Err(err) if err.kind() == WouldBlock => Ok(0),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind::{ConnectionReset, Interrupted};

    #[test]
    fn should_treat_would_block_as_no_data() {
        let res: io::Result<usize> = Err(io::Error::from(WouldBlock));
        assert_eq!(0, res.no_block().unwrap());
    }

    #[test]
    fn should_treat_zero_read_as_eof() {
        let res: io::Result<usize> = Ok(0);
        assert_eq!(UnexpectedEof, res.no_block().unwrap_err().kind());
    }

    #[test]
    fn should_pass_through_everything_else() {
        let res: io::Result<usize> = Ok(17);
        assert_eq!(17, res.no_block().unwrap());

        let res: io::Result<usize> = Err(io::Error::from(ConnectionReset));
        assert_eq!(ConnectionReset, res.no_block().unwrap_err().kind());

        let res: io::Result<usize> = Err(io::Error::from(Interrupted));
        assert_eq!(Interrupted, res.no_block().unwrap_err().kind());
    }
}

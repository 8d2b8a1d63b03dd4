use std::io;
use std::io::Read;

use crate::util::NoBlock;

const DEFAULT_INITIAL_CAPACITY: usize = 4096;
const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Append-only byte accumulator used to reassemble frames that arrive split across any number
/// of deliveries. Bytes are only ever removed from the front, and only after a complete frame
/// has been extracted.
///
/// `CHUNK_SIZE` controls how many bytes [`ReassemblyBuffer::read_from`] asks the stream for at
/// a time. Chunks submitted with [`ReassemblyBuffer::append`] can be of any size.
#[derive(Debug)]
pub struct ReassemblyBuffer<const CHUNK_SIZE: usize = DEFAULT_CHUNK_SIZE> {
    inner: Vec<u8>,
    head: usize,
    tail: usize,
}

impl<const CHUNK_SIZE: usize> Default for ReassemblyBuffer<CHUNK_SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CHUNK_SIZE: usize> ReassemblyBuffer<CHUNK_SIZE> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(CHUNK_SIZE > 0, "CHUNK_SIZE must be greater than zero");
        Self {
            inner: vec![0u8; capacity.max(CHUNK_SIZE)],
            head: 0,
            tail: 0,
        }
    }

    /// Number of bytes buffered and not yet consumed.
    #[inline]
    pub const fn available(&self) -> usize {
        self.tail - self.head
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.available() == 0
    }

    /// Append a chunk to the end of the buffer.
    pub fn append(&mut self, chunk: &[u8]) {
        self.reserve(chunk.len());
        self.inner[self.tail..self.tail + chunk.len()].copy_from_slice(chunk);
        self.tail += chunk.len();
    }

    /// Perform at most one read of up to `CHUNK_SIZE` bytes from the stream and append the result.
    /// Returns the number of bytes read, which is zero if the stream would block.
    pub fn read_from<S: Read>(&mut self, stream: &mut S) -> io::Result<usize> {
        self.reserve(CHUNK_SIZE);
        let read = stream
            .read(&mut self.inner[self.tail..self.tail + CHUNK_SIZE])
            .no_block()?;
        self.tail += read;
        Ok(read)
    }

    /// View of all buffered bytes, front first.
    #[inline]
    pub fn view(&self) -> &[u8] {
        &self.inner[self.head..self.tail]
    }

    /// Remove exactly `len` bytes from the front.
    #[inline]
    pub fn consume(&mut self, len: usize) {
        #[cfg(not(feature = "disable-checks"))]
        #[cold]
        fn bounds_violation(head: usize, tail: usize) -> ! {
            panic!("bounds violation: head[{head}] > tail[{tail}]")
        }

        self.head += len;

        #[cfg(not(feature = "disable-checks"))]
        if self.head > self.tail {
            bounds_violation(self.head, self.tail);
        }
    }

    fn reserve(&mut self, additional: usize) {
        #[cold]
        fn grow(buf: &mut Vec<u8>, required: usize) {
            let mut len = buf.len().max(1);
            while len < required {
                len *= 2;
            }
            buf.resize(len, 0u8);
        }

        // move leftover of a partially consumed frame to the front
        if self.head > 0 {
            if self.is_empty() {
                self.head = 0;
                self.tail = 0;
            } else {
                self.inner.copy_within(self.head..self.tail, 0);
                self.tail -= self.head;
                self.head = 0;
            }
        }

        if self.tail + additional > self.inner.len() {
            grow(&mut self.inner, self.tail + additional);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::io::ErrorKind::{ConnectionReset, UnexpectedEof, WouldBlock};

    use super::*;

    #[test]
    fn should_append_chunks() {
        let mut buf = ReassemblyBuffer::<16>::new();
        assert_eq!(DEFAULT_INITIAL_CAPACITY, buf.inner.len());
        assert!(buf.is_empty());

        buf.append(b"hello");
        buf.append(b" ");
        buf.append(b"world!");
        assert_eq!(b"hello world!", buf.view());
        assert_eq!(12, buf.available());
        assert_eq!(0, buf.head);
        assert_eq!(12, buf.tail);
    }

    #[test]
    fn should_clear_when_fully_consumed() {
        let mut buf = ReassemblyBuffer::<16>::new();
        buf.append(b"hello ");
        buf.consume(6);
        assert_eq!(0, buf.available());
        assert_eq!(b"", buf.view());

        buf.append(b"world ");
        assert_eq!(b"world ", buf.view());
        assert_eq!(0, buf.head);
        assert_eq!(6, buf.tail);
    }

    #[test]
    fn should_compact_if_any_leftover_before_next_append() {
        let mut buf = ReassemblyBuffer::<16>::new();
        buf.append(b"hello ");
        buf.consume(2);
        assert_eq!(4, buf.available());
        assert_eq!(b"llo ", buf.view());

        buf.append(b"world ");
        assert_eq!(10, buf.available());
        assert_eq!(b"llo world ", buf.view());
        assert_eq!(0, buf.head);
        assert_eq!(10, buf.tail);
    }

    #[test]
    fn should_grow_when_appending() {
        let mut buf = ReassemblyBuffer::<4>::with_capacity(8);
        assert_eq!(8, buf.inner.len());
        buf.append(b"hello world!");
        assert_eq!(b"hello world!", buf.view());
        assert_eq!(16, buf.inner.len());

        buf.append(&[7u8; 100]);
        assert_eq!(112, buf.available());
        assert_eq!(128, buf.inner.len());
    }

    #[test]
    fn should_not_grow_when_compaction_frees_enough_room() {
        let mut buf = ReassemblyBuffer::<4>::with_capacity(8);
        buf.append(b"abcdefgh");
        buf.consume(6);
        buf.append(b"ijklmn");
        assert_eq!(b"ghijklmn", buf.view());
        assert_eq!(8, buf.inner.len());
    }

    #[test]
    #[cfg(not(feature = "disable-checks"))]
    #[should_panic(expected = "bounds violation: head[32] > tail[6]")]
    fn should_panic_if_bounds_violated_on_consume() {
        let mut buf = ReassemblyBuffer::<16>::new();
        buf.append(b"hello ");
        buf.consume(32);
    }

    #[test]
    fn should_read_from_stream_in_chunks() {
        let mut buf = ReassemblyBuffer::<6>::new();
        let mut stream = Cursor::new(b"hello world!");

        assert_eq!(6, buf.read_from(&mut stream).unwrap());
        assert_eq!(b"hello ", buf.view());

        buf.consume(2);
        assert_eq!(6, buf.read_from(&mut stream).unwrap());
        assert_eq!(b"llo world!", buf.view());
    }

    #[test]
    fn should_handle_reader_with_no_data() {
        struct StreamWithNoData;

        impl Read for StreamWithNoData {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(WouldBlock, "would block"))
            }
        }

        let mut buf = ReassemblyBuffer::<8>::new();
        assert_eq!(0, buf.read_from(&mut StreamWithNoData).unwrap());
        assert_eq!(b"", buf.view());
    }

    #[test]
    fn should_report_eof() {
        let mut buf = ReassemblyBuffer::<8>::new();
        let mut stream = Cursor::new(b"");
        let err = buf.read_from(&mut stream).expect_err("expected eof error");
        assert_eq!(UnexpectedEof, err.kind());
    }

    #[test]
    fn should_propagate_errors() {
        struct FaultyStream;

        impl Read for FaultyStream {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(ConnectionReset, "reset"))
            }
        }

        let mut buf = ReassemblyBuffer::<8>::new();
        let err = buf.read_from(&mut FaultyStream).expect_err("expected reset error");
        assert_eq!(ConnectionReset, err.kind());
    }
}

//! # Stream Operations
//!
//! The host-supplied capability set the engine pulls bytes through.
//!
//! A [`StreamOps`] implementation stands in for whatever actually backs the
//! data: a memory buffer, a socket, a virtual filesystem the engine has no
//! knowledge of. The session owns the implementation for its whole lifetime
//! and forwards every engine I/O request to it synchronously; the bridge
//! adds no buffering, retry, or timeout policy of its own.

use std::io::{self, Read, Seek, SeekFrom};

use bytes::Bytes;

/// Pull-based stream capability set.
///
/// Semantics follow the standard library's I/O conventions:
///
/// - `read` returning `Ok(0)` means the stream ended; an `Err` is the abort
///   signal, which the engine surfaces as a read failure.
/// - `byte_len` returning `None` means the total size is unknown. This is
///   distinct from `Some(0)`, an empty stream.
/// - `at_end` must be consistent with the result of the most recent read.
///
/// Implementations that cannot seek should override [`is_seekable`] to
/// return `false`; engine seeks then surface as unsupported instead of
/// silently succeeding, and the engine falls back to sequential decoding.
///
/// [`is_seekable`]: StreamOps::is_seekable
pub trait StreamOps: Send + Sync {
    /// Read up to `buf.len()` bytes into `buf`, returning the count read.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Reposition the stream, returning the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Current absolute offset, after the most recent read or seek.
    fn tell(&mut self) -> io::Result<u64>;

    /// Total stream size in bytes, or `None` when unknown.
    fn byte_len(&self) -> Option<u64>;

    /// Whether the stream is exhausted.
    fn at_end(&mut self) -> bool;

    /// Whether [`seek`](StreamOps::seek) is supported at all.
    fn is_seekable(&self) -> bool {
        true
    }
}

/// In-memory stream over a shared byte buffer.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    data: Bytes,
    pos: u64,
}

impl MemoryStream {
    /// Create a stream over shared bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data, pos: 0 }
    }

    /// Create a stream by copying a slice.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Create a stream by taking ownership of a vector.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::new(Bytes::from(data))
    }
}

impl StreamOps for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.data.len() as u64;
        if self.pos >= len {
            return Ok(0);
        }
        let start = self.pos as usize;
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        self.pos += n as u64;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let len = self.data.len() as i64;
        let target = match pos {
            SeekFrom::Start(offset) => offset as i64,
            SeekFrom::Current(delta) => self.pos as i64 + delta,
            SeekFrom::End(delta) => len + delta,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before start of stream",
            ));
        }
        self.pos = target as u64;
        Ok(self.pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn byte_len(&self) -> Option<u64> {
        Some(self.data.len() as u64)
    }

    fn at_end(&mut self) -> bool {
        self.pos >= self.data.len() as u64
    }
}

/// Adapter exposing any `Read + Seek` value as [`StreamOps`].
///
/// The total length is probed once at construction by seeking to the end and
/// restoring the prior position; streams whose end cannot be reached report
/// an unknown length.
#[derive(Debug)]
pub struct IoStream<T> {
    inner: T,
    len: Option<u64>,
    pos: u64,
}

impl<T: Read + Seek> IoStream<T> {
    /// Wrap a reader, probing its length.
    pub fn new(mut inner: T) -> io::Result<Self> {
        let pos = inner.stream_position()?;
        let len = inner.seek(SeekFrom::End(0)).ok();
        inner.seek(SeekFrom::Start(pos))?;
        Ok(Self { inner, len, pos })
    }

    /// Consume the adapter, returning the underlying reader.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + Seek + Send + Sync> StreamOps for IoStream<T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.pos += n as u64;
        Ok(n)
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.pos = self.inner.seek(pos)?;
        Ok(self.pos)
    }

    fn tell(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }

    fn byte_len(&self) -> Option<u64> {
        self.len
    }

    fn at_end(&mut self) -> bool {
        match self.len {
            Some(len) => self.pos >= len,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn memory_stream_reads_sequentially() {
        let mut stream = MemoryStream::from_slice(b"abcdef");
        let mut buf = [0u8; 4];

        assert_eq!(stream.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(stream.tell().unwrap(), 4);
        assert!(!stream.at_end());

        assert_eq!(stream.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert!(stream.at_end());
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn memory_stream_seeks_from_all_origins() {
        let mut stream = MemoryStream::from_slice(b"abcdef");

        assert_eq!(stream.seek(SeekFrom::Start(2)).unwrap(), 2);
        assert_eq!(stream.seek(SeekFrom::Current(2)).unwrap(), 4);
        assert_eq!(stream.seek(SeekFrom::End(-1)).unwrap(), 5);
        assert!(stream.seek(SeekFrom::Current(-10)).is_err());

        assert_eq!(stream.byte_len(), Some(6));
        assert!(stream.is_seekable());
    }

    #[test]
    fn memory_stream_length_is_known_even_when_empty() {
        let mut stream = MemoryStream::from_slice(b"");
        assert_eq!(stream.byte_len(), Some(0));
        assert!(stream.at_end());
    }

    #[test]
    fn io_stream_probes_length_and_restores_position() {
        let mut cursor = Cursor::new(b"abcdef".to_vec());
        cursor.set_position(2);

        let mut stream = IoStream::new(cursor).unwrap();
        assert_eq!(stream.byte_len(), Some(6));
        assert_eq!(stream.tell().unwrap(), 2);

        let mut buf = [0u8; 2];
        assert_eq!(stream.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf, b"cd");
        assert_eq!(stream.tell().unwrap(), 4);
        assert!(!stream.at_end());
    }
}

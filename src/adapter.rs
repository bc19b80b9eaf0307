//! # Stream I/O Adapter
//!
//! Bridges the host capability set into the engine-facing media source
//! contract. Every engine read, seek, and position query lands here and is
//! forwarded synchronously to the host's [`StreamOps`]; only return types
//! are translated, no state is cached.

use std::io::{self, Read, Seek, SeekFrom};

use symphonia::core::io::MediaSource;

use crate::ops::StreamOps;

/// Engine-facing adapter over boxed host stream operations.
///
/// The adapter owns the operations for the lifetime of the engine that
/// reads through it, so the capability set can never dangle while the
/// engine holds the source.
pub(crate) struct OpsSource {
    ops: Box<dyn StreamOps>,
}

impl OpsSource {
    pub(crate) fn new(ops: Box<dyn StreamOps>) -> Self {
        Self { ops }
    }
}

impl Read for OpsSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Short-circuit reads past stream end; the engine polls this to
        // avoid issuing pointless reads against exhausted streams.
        if self.ops.at_end() {
            return Ok(0);
        }
        self.ops.read(buf)
    }
}

impl Seek for OpsSource {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        // A zero-displacement relative seek is a position query, which even
        // unseekable streams can answer.
        if let SeekFrom::Current(0) = pos {
            return self.ops.tell();
        }
        if !self.ops.is_seekable() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stream operations do not support seeking",
            ));
        }
        self.ops.seek(pos)
    }
}

impl MediaSource for OpsSource {
    fn is_seekable(&self) -> bool {
        self.ops.is_seekable()
    }

    fn byte_len(&self) -> Option<u64> {
        self.ops.byte_len()
    }
}

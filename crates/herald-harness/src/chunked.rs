//! A reader that fragments its data into fixed-size chunks.

use std::io::{self, Read};

/// Yields at most `chunk` bytes per `read` call.
///
/// Transports deliver bytes in arbitrary fragments; wrapping a test input
/// in a `ChunkedReader` (then a `BufReader`) reproduces that at any
/// granularity down to one byte per read, which is what the decoder's
/// chunk-invariance contract is tested against.
#[derive(Debug)]
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl ChunkedReader {
    /// Create a reader over `data` yielding `chunk` bytes per read.
    ///
    /// A `chunk` of zero is treated as one.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
        Self { data: data.into(), pos: 0, chunk: chunk.max(1) }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.data.len() {
            return Ok(0);
        }

        let n = self.chunk.min(self.data.len() - self.pos).min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

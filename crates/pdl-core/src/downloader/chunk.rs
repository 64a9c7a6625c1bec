//! Chunked append writer.

use std::io::{self, Write};

/// Buffers incoming body bytes and appends them to the destination one full
/// chunk at a time, flushing after each chunk.
///
/// The trailing partial chunk reaches the file only through [`finish`];
/// [`discard_tail`] drops it, so an aborted transfer leaves whole chunks only.
///
/// [`finish`]: ChunkWriter::finish
/// [`discard_tail`]: ChunkWriter::discard_tail
pub struct ChunkWriter<W: Write> {
    inner: W,
    buf: Vec<u8>,
    chunk_size: usize,
    flushed: u64,
}

impl<W: Write> ChunkWriter<W> {
    pub fn new(inner: W, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            inner,
            buf: Vec::with_capacity(chunk_size.min(8 * 1024 * 1024)),
            chunk_size,
            flushed: 0,
        }
    }

    /// Buffers `data`, writing out every chunk it completes.
    /// Returns how many chunks were flushed.
    pub fn push(&mut self, mut data: &[u8]) -> io::Result<usize> {
        let mut chunks = 0;
        while !data.is_empty() {
            let take = (self.chunk_size - self.buf.len()).min(data.len());
            self.buf.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.buf.len() == self.chunk_size {
                self.write_buffer()?;
                chunks += 1;
            }
        }
        Ok(chunks)
    }

    fn write_buffer(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.buf)?;
        self.inner.flush()?;
        self.flushed += self.buf.len() as u64;
        self.buf.clear();
        Ok(())
    }

    /// Bytes written to the destination so far.
    pub fn flushed(&self) -> u64 {
        self.flushed
    }

    /// Bytes received but not yet written.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Writes the trailing partial chunk. Returns total bytes written.
    pub fn finish(mut self) -> io::Result<u64> {
        if !self.buf.is_empty() {
            self.write_buffer()?;
        }
        Ok(self.flushed)
    }

    /// Drops the trailing partial chunk. Returns total bytes written.
    pub fn discard_tail(self) -> u64 {
        self.flushed
    }
}

//! In-memory sink and source adapters.

use crate::error::{StreamError, StreamResult};
use crate::stream::traits::{Sink, Source};

/// A growable in-memory sink.
///
/// Supports position and seek: writing past the current length appends,
/// seeking back rewrites in place, and seeking past the end zero-fills the
/// gap. Useful for scratch encodes and for fixing up a length written
/// before its payload.
#[derive(Debug, Default)]
pub struct BytesSink {
    bytes: Vec<u8>,
    position: usize,
}

impl BytesSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty sink with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { bytes: Vec::with_capacity(capacity), position: 0 }
    }

    /// The bytes written so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consumes the sink, returning the written bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Clears the contents for reuse, keeping the allocation.
    pub fn reset(&mut self) {
        self.bytes.clear();
        self.position = 0;
    }
}

impl Sink for BytesSink {
    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        if self.position < self.bytes.len() {
            self.bytes[self.position] = byte;
        } else {
            self.bytes.push(byte);
        }
        self.position += 1;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        let end = self.position + bytes.len();
        if end <= self.bytes.len() {
            self.bytes[self.position..end].copy_from_slice(bytes);
        } else {
            let overlap = self.bytes.len() - self.position;
            self.bytes[self.position..].copy_from_slice(&bytes[..overlap]);
            self.bytes.extend_from_slice(&bytes[overlap..]);
        }
        self.position = end;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn position(&mut self) -> StreamResult<u64> {
        Ok(self.position as u64)
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        let position = usize::try_from(position).map_err(|_| {
            StreamError::invalid_argument(format!("seek position {position} exceeds memory range"))
        })?;
        if position > self.bytes.len() {
            self.bytes.resize(position, 0);
        }
        self.position = position;
        Ok(())
    }
}

/// A read cursor over a borrowed byte slice.
///
/// Supports position and seek within the slice; seeking past the end is an
/// end-of-stream error.
#[derive(Debug)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    /// Creates a cursor at the start of `bytes`.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
}

impl Source for SliceSource<'_> {
    fn read_byte(&mut self) -> StreamResult<u8> {
        let byte = *self.bytes.get(self.position).ok_or(StreamError::EndOfStream)?;
        self.position += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        if buf.len() > self.remaining() {
            return Err(StreamError::EndOfStream);
        }
        let end = self.position + buf.len();
        buf.copy_from_slice(&self.bytes[self.position..end]);
        self.position = end;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn position(&mut self) -> StreamResult<u64> {
        Ok(self.position as u64)
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        let position = usize::try_from(position).map_err(|_| StreamError::EndOfStream)?;
        if position > self.bytes.len() {
            return Err(StreamError::EndOfStream);
        }
        self.position = position;
        Ok(())
    }
}

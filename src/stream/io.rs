//! Adapters binding the stream contracts to `std::io` objects.

use std::io::{Read, Write};

use crate::error::{StreamError, StreamResult};
use crate::stream::traits::{Sink, Source};

/// Binds any [`std::io::Write`] as a [`Sink`].
///
/// Position and seek are not supported; wrap a file with
/// [`FileSink`](crate::stream::FileSink) when repositioning is needed.
#[derive(Debug)]
pub struct IoSink<W: Write> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    /// Wraps a writer.
    #[must_use]
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// A reference to the wrapped writer.
    #[must_use]
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwraps, returning the writer. Buffered bytes are not flushed.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        self.inner.write_all(&[byte])?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.inner.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Binds any [`std::io::Read`] as a [`Source`].
///
/// A short read surfaces as [`StreamError::EndOfStream`]; other I/O errors
/// propagate unchanged.
#[derive(Debug)]
pub struct IoSource<R: Read> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    /// Wraps a reader.
    #[must_use]
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// A reference to the wrapped reader.
    #[must_use]
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Unwraps, returning the reader.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Maps `read_exact`'s end-of-file kind to the typed end-of-stream error.
pub(crate) fn map_eof(error: std::io::Error) -> StreamError {
    if error.kind() == std::io::ErrorKind::UnexpectedEof {
        StreamError::EndOfStream
    } else {
        StreamError::Io(error)
    }
}

impl<R: Read> Source for IoSource<R> {
    fn read_byte(&mut self) -> StreamResult<u8> {
        let mut byte = [0u8; 1];
        self.inner.read_exact(&mut byte).map_err(map_eof)?;
        Ok(byte[0])
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        self.inner.read_exact(buf).map_err(map_eof)?;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sink_writes_through() {
        let mut sink = IoSink::new(Vec::new());
        sink.write_byte(1).unwrap();
        sink.write_bytes(&[2, 3]).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn sink_has_no_position() {
        let mut sink = IoSink::new(Vec::new());
        assert!(matches!(sink.position(), Err(StreamError::Unsupported { operation: "position" })));
        assert!(matches!(sink.seek(0), Err(StreamError::Unsupported { operation: "seek" })));
    }

    #[test]
    fn source_reads_and_maps_eof() {
        let data: &[u8] = &[9, 8];
        let mut source = IoSource::new(data);
        assert_eq!(source.read_byte().unwrap(), 9);
        assert_eq!(source.read_byte().unwrap(), 8);
        assert!(matches!(source.read_byte(), Err(StreamError::EndOfStream)));
    }
}

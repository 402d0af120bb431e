//! Transport contracts for byte sinks and sources.
//!
//! These traits are the narrow waist between the codec and whatever carries
//! the bytes: a growable buffer, a file, a socket. The codec layers every
//! wire format on top of the handful of required operations here; an
//! adapter never needs to know what the bytes mean.

use crate::error::{StreamError, StreamResult};

/// An append-only destination for encoded bytes.
///
/// Implementations must either accept every byte handed to them or fail the
/// call; there is no partial-write surface. Position and seek are optional
/// capabilities: adapters that cannot support them inherit the provided
/// methods, which fail explicitly rather than silently doing nothing.
///
/// # Example
///
/// ```
/// use wirestream::{BytesSink, Sink};
///
/// let mut sink = BytesSink::new();
/// sink.write_byte(0x2A)?;
/// sink.write_bytes(b"ok")?;
/// assert_eq!(sink.as_slice(), &[0x2A, b'o', b'k']);
/// # Ok::<(), wirestream::StreamError>(())
/// ```
pub trait Sink {
    /// Writes a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the underlying transport fails.
    fn write_byte(&mut self, byte: u8) -> StreamResult<()>;

    /// Writes an exact span of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the underlying transport fails.
    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()>;

    /// Forces any buffered output down to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the flush fails.
    fn flush(&mut self) -> StreamResult<()>;

    /// Closes this sink to further operations, flushing buffered output.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if flushing or releasing fails.
    fn close(&mut self) -> StreamResult<()>;

    /// Current write position in bytes, for sinks that track one.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] unless the adapter overrides it.
    fn position(&mut self) -> StreamResult<u64> {
        Err(StreamError::unsupported("position"))
    }

    /// Moves the write position, for sinks that support repositioning.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] unless the adapter overrides it.
    fn seek(&mut self, position: u64) -> StreamResult<()> {
        let _ = position;
        Err(StreamError::unsupported("seek"))
    }
}

/// A cursor-advancing origin of encoded bytes.
///
/// Reads consume; a read past the available bytes fails with
/// [`StreamError::EndOfStream`] and must not hand back a short buffer.
pub trait Source {
    /// Reads a single byte, advancing the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::EndOfStream`] when no byte is available and
    /// [`StreamError::Io`] on transport failure.
    fn read_byte(&mut self) -> StreamResult<u8>;

    /// Fills `buf` exactly, advancing the cursor by its length.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::EndOfStream`] if fewer bytes remain than
    /// `buf` holds and [`StreamError::Io`] on transport failure.
    fn read_bytes(&mut self, buf: &mut [u8]) -> StreamResult<()>;

    /// Closes this source to further operations.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if releasing fails.
    fn close(&mut self) -> StreamResult<()>;

    /// Current read position in bytes, for sources that track one.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] unless the adapter overrides it.
    fn position(&mut self) -> StreamResult<u64> {
        Err(StreamError::unsupported("position"))
    }

    /// Moves the read position, for sources that support repositioning.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] unless the adapter overrides it.
    fn seek(&mut self, position: u64) -> StreamResult<()> {
        let _ = position;
        Err(StreamError::unsupported("seek"))
    }
}

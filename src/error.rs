//! Error types for stream encoding and decoding.

use thiserror::Error;

/// Result type for all stream operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Errors that can occur while encoding to or decoding from a stream.
///
/// Decode failures never leave a partial value in the caller's hands: every
/// read operation either returns a complete value or one of these errors.
#[derive(Debug, Error)]
pub enum StreamError {
    /// An I/O error from the underlying sink or source, propagated unchanged.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A read ran past the end of the available bytes.
    #[error("unexpected end of stream")]
    EndOfStream,

    /// The input bytes do not form a valid encoding.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A generic value tag that is not in the dispatch registry.
    ///
    /// The tag byte has been consumed; no further bytes have been read.
    #[error("unknown generic value tag: {0}")]
    UnknownTag(i8),

    /// An invalid argument to a pure function, reported before any bytes
    /// are written.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An optional capability the underlying stream does not provide.
    #[error("{operation} is not supported by this stream")]
    Unsupported {
        /// The operation that was attempted.
        operation: &'static str,
    },
}

impl StreamError {
    /// Creates a malformed-input error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Creates an invalid-argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates an unsupported-capability error for the named operation.
    #[must_use]
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Returns `true` if this error indicates corrupt or truncated input
    /// rather than a caller or environment problem.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::EndOfStream | Self::Malformed(_) | Self::UnknownTag(_))
    }
}

//! `wirestream`
//!
//! A compact, self-describing binary stream serialization codec: a paired
//! encoder and decoder turning structured in-memory values into byte
//! streams and back, for interchange where message size and encode/decode
//! cost matter.
//!
//! # Overview
//!
//! The crate is organized leaf to root:
//!
//! - **Primitive codecs**: fixed-width big-endian integers, 1-to-5/10-byte
//!   varints, zig-zag signed varints, booleans, IEEE-754 floats, raw spans
//! - **Compact strings**: a 1-to-3-byte-per-code-unit encoding staged
//!   through a reusable, grow-only scratch buffer
//! - **Generic values**: [`GenericValue`], a closed tagged union an
//!   untyped value travels as, dispatched without the caller naming a type
//! - **Combinators**: optionals, arrays, caller-chosen collections,
//!   maps, enum ordinals
//! - **Stream adapters**: [`Sink`]/[`Source`] contracts with in-memory,
//!   `std::io`, and file bindings
//!
//! Encoding flows value → combinators → dispatcher or primitive codec →
//! adapter → sink; decoding mirrors it over a source. Everything is
//! synchronous and single-threaded per call: each operation fully completes
//! or fails before returning.
//!
//! # Example
//!
//! ```
//! use wirestream::{BytesSink, SliceSource, StreamInput, StreamOutput};
//!
//! // Encode a record to bytes
//! let mut out = StreamOutput::new(BytesSink::new());
//! out.write_int(1)?;
//! out.write_string("this is my name")?;
//! out.write_short(20)?;
//! out.write_double_array(&[0.1, 0.2, 0.3])?;
//! let bytes = out.into_inner().into_bytes();
//!
//! // Decode it back
//! let mut input = StreamInput::new(SliceSource::new(&bytes));
//! assert_eq!(input.read_int()?, 1);
//! assert_eq!(input.read_string()?, "this is my name");
//! assert_eq!(input.read_short()?, 20);
//! assert_eq!(input.read_double_array()?, vec![0.1, 0.2, 0.3]);
//! # Ok::<(), wirestream::StreamError>(())
//! ```
//!
//! # Modules
//!
//! - [`buffer`] - adaptive growth sizing and the scratch buffer
//! - [`error`] - error types ([`StreamError`])
//! - [`stream`] - sink/source contracts and adapters
//! - [`value`] - the generic tagged value registry

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

pub mod buffer;
pub mod error;
mod input;
mod output;
pub mod stream;
mod streamable;
pub mod value;


pub use buffer::{oversize, ScratchBuffer, MAX_BUFFER_LENGTH};
pub use error::{StreamError, StreamResult};
pub use input::StreamInput;
pub use output::StreamOutput;
pub use stream::{BytesSink, FileSink, FileSource, IoSink, IoSource, Sink, SliceSource, Source};
pub use streamable::Streamable;
pub use value::GenericValue;

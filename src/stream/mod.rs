//! Stream adapters: binding codec operations to concrete transports.
//!
//! The codec core speaks to the outside world through two narrow traits:
//!
//! - [`Sink`] - append-only destination for encoded bytes
//! - [`Source`] - cursor-advancing origin of bytes to decode
//!
//! Both declare position/seek as optional capabilities that fail explicitly
//! on adapters that cannot support them, never silently no-op.
//!
//! # Adapters
//!
//! - [`BytesSink`] / [`SliceSource`] - in-memory buffers
//! - [`IoSink`] / [`IoSource`] - any `std::io` writer/reader
//! - [`FileSink`] / [`FileSource`] - buffered files with real offsets

mod bytes;
mod file;
mod io;
mod traits;

pub use bytes::{BytesSink, SliceSource};
pub use file::{FileSink, FileSource};
pub use io::{IoSink, IoSource};
pub use traits::{Sink, Source};

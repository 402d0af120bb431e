//! The domain-object boundary.

use crate::error::StreamResult;
use crate::input::StreamInput;
use crate::output::StreamOutput;
use crate::stream::{Sink, Source};

/// A type that can populate itself from a decode cursor and write itself to
/// an encode cursor.
///
/// The two methods must be exact inverses: whatever `write_to` puts on the
/// wire, `read_from` consumes completely and reproduces, field for field.
/// Implementations use only the cursor operations, so a streamable type is
/// oblivious to what transport carries its bytes.
///
/// The read helpers on [`StreamInput`] construct via [`Default`] before
/// populating, so collection elements need `Streamable + Default`.
///
/// # Example
///
/// ```
/// use wirestream::{
///     BytesSink, Sink, SliceSource, Source, StreamInput, StreamOutput, StreamResult, Streamable,
/// };
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Streamable for Point {
///     fn read_from<S: Source>(&mut self, input: &mut StreamInput<S>) -> StreamResult<()> {
///         self.x = input.read_int()?;
///         self.y = input.read_int()?;
///         Ok(())
///     }
///
///     fn write_to<S: Sink>(&self, output: &mut StreamOutput<S>) -> StreamResult<()> {
///         output.write_int(self.x)?;
///         output.write_int(self.y)
///     }
/// }
///
/// let point = Point { x: 3, y: -4 };
/// let mut out = StreamOutput::new(BytesSink::new());
/// point.write_to(&mut out)?;
/// let bytes = out.into_inner().into_bytes();
///
/// let mut input = StreamInput::new(SliceSource::new(&bytes));
/// let decoded: Point = input.read_streamable()?;
/// assert_eq!(decoded, point);
/// # Ok::<(), wirestream::StreamError>(())
/// ```
pub trait Streamable {
    /// Populates this object's fields from a decode cursor.
    ///
    /// # Errors
    ///
    /// Returns any decode error from the cursor; the object's state is
    /// unspecified after a failure and must not be treated as decoded.
    fn read_from<S: Source>(&mut self, input: &mut StreamInput<S>) -> StreamResult<()>;

    /// Writes this object's fields to an encode cursor.
    ///
    /// # Errors
    ///
    /// Returns any encode or I/O error from the cursor.
    fn write_to<S: Sink>(&self, output: &mut StreamOutput<S>) -> StreamResult<()>;
}

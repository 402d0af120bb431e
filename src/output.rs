//! The stream encoder.
//!
//! [`StreamOutput`] layers every wire format on top of a [`Sink`]: fixed and
//! variable-width integers, zig-zag signed integers, the compact string
//! encoding, optionals, containers, and the generic tagged-value dispatch.
//! Data flows one direction per call; every write fully completes or fails
//! before returning, and the encoder never retains a reference to the sink's
//! bytes beyond the call.
//!
//! # Example
//!
//! ```
//! use wirestream::{BytesSink, StreamOutput};
//!
//! let mut out = StreamOutput::new(BytesSink::new());
//! out.write_vint(300)?;
//! out.write_string("hello")?;
//! let bytes = out.into_inner().into_bytes();
//! assert_eq!(bytes, [0xAC, 0x02, 0x05, b'h', b'e', b'l', b'l', b'o']);
//! # Ok::<(), wirestream::StreamError>(())
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::buffer::ScratchBuffer;
use crate::error::{StreamError, StreamResult};
use crate::stream::Sink;
use crate::streamable::Streamable;
use crate::value::{tags, GenericValue};

/// Encoder writing wire formats to a [`Sink`].
///
/// Owns the scratch buffer the string encoder stages bytes in, so repeated
/// string writes amortize their allocation. Not for concurrent use; `&mut`
/// receivers enforce single-threaded access per instance.
#[derive(Debug)]
pub struct StreamOutput<S: Sink> {
    sink: S,
    scratch: ScratchBuffer,
}

impl<S: Sink> StreamOutput<S> {
    /// Wraps a sink.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self { sink, scratch: ScratchBuffer::new() }
    }

    /// A reference to the underlying sink.
    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    /// A mutable reference to the underlying sink.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Unwraps, returning the sink.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.sink
    }

    /// Forces any buffered output down to the transport.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if the flush fails.
    pub fn flush(&mut self) -> StreamResult<()> {
        self.sink.flush()
    }

    /// Closes the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if flushing or releasing fails.
    pub fn close(&mut self) -> StreamResult<()> {
        self.sink.close()
    }

    /// Current write position, where the sink supports one.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] on sinks without offsets.
    pub fn position(&mut self) -> StreamResult<u64> {
        self.sink.position()
    }

    /// Moves the write position, where the sink supports it.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] on sinks without offsets.
    pub fn seek(&mut self, position: u64) -> StreamResult<()> {
        self.sink.seek(position)
    }

    /// Writes a single byte.
    pub fn write_byte(&mut self, value: u8) -> StreamResult<()> {
        self.sink.write_byte(value)
    }

    /// Writes an exact span of raw bytes. The length is caller context and
    /// does not travel on the wire.
    pub fn write_bytes(&mut self, values: &[u8]) -> StreamResult<()> {
        self.sink.write_bytes(values)
    }

    /// Writes a varint length prefix followed by the raw bytes.
    pub fn write_byte_array(&mut self, values: &[u8]) -> StreamResult<()> {
        self.write_length(values.len())?;
        self.write_bytes(values)
    }

    /// Writes a short as two bytes, big-endian.
    pub fn write_short(&mut self, value: i16) -> StreamResult<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    /// Writes an int as four bytes, big-endian.
    pub fn write_int(&mut self, value: i32) -> StreamResult<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    /// Writes a long as eight bytes, big-endian.
    pub fn write_long(&mut self, value: i64) -> StreamResult<()> {
        self.sink.write_bytes(&value.to_be_bytes())
    }

    /// Writes an int in variable-length format: one to five bytes, seven
    /// payload bits per byte, high bit flagging continuation. Smaller
    /// magnitudes take fewer bytes; negative values always take all five,
    /// so they serialize better via [`StreamOutput::write_int`].
    pub fn write_vint(&mut self, value: i32) -> StreamResult<()> {
        let mut v = value as u32;
        while (v & !0x7F) != 0 {
            self.sink.write_byte(((v & 0x7F) | 0x80) as u8)?;
            v >>= 7;
        }
        self.sink.write_byte(v as u8)
    }

    /// Writes an unsigned long in variable-length format, one to ten bytes.
    /// For signed values use [`StreamOutput::write_long`] or
    /// [`StreamOutput::write_zlong`].
    pub fn write_vlong(&mut self, value: u64) -> StreamResult<()> {
        let mut v = value;
        while (v & !0x7F) != 0 {
            self.sink.write_byte(((v & 0x7F) | 0x80) as u8)?;
            v >>= 7;
        }
        self.sink.write_byte(v as u8)
    }

    /// Writes a signed long in variable-length zig-zag format: the sign bit
    /// slides into the least significant position before varint encoding
    /// (0 → 0, -1 → 1, 1 → 2, ...), so small magnitudes of either sign stay
    /// compact.
    pub fn write_zlong(&mut self, value: i64) -> StreamResult<()> {
        let zigzag = ((value << 1) ^ (value >> 63)) as u64;
        self.write_vlong(zigzag)
    }

    /// Writes a boolean as one byte, 0 or 1.
    pub fn write_bool(&mut self, value: bool) -> StreamResult<()> {
        self.sink.write_byte(u8::from(value))
    }

    /// Writes a float's IEEE-754 bits as a big-endian int.
    pub fn write_float(&mut self, value: f32) -> StreamResult<()> {
        self.write_int(value.to_bits() as i32)
    }

    /// Writes a double's IEEE-754 bits as a big-endian long.
    pub fn write_double(&mut self, value: f64) -> StreamResult<()> {
        self.write_long(value.to_bits() as i64)
    }

    /// Writes a string as a varint count of UTF-16 code units followed by a
    /// compact one-to-three-byte encoding of each unit.
    ///
    /// This is not UTF-8: the encoding operates on 16-bit code units, so
    /// characters outside the basic plane travel as two independently
    /// encoded surrogate halves. The decoder reverses this bit-for-bit.
    pub fn write_string(&mut self, value: &str) -> StreamResult<()> {
        let char_count = value.encode_utf16().count();
        self.write_length(char_count)?;
        if char_count == 0 {
            return Ok(());
        }

        // at most 3 bytes per code unit are needed here
        let buffer_size = (3 * char_count).min(1024);
        self.scratch.ensure_capacity(buffer_size)?;

        let mut offset = 0;
        for unit in value.encode_utf16() {
            let c = u32::from(unit);
            let buffer = self.scratch.as_mut_slice();
            if c <= 0x7F {
                buffer[offset] = c as u8;
                offset += 1;
            } else if c > 0x7FF {
                buffer[offset] = (0xE0 | ((c >> 12) & 0x0F)) as u8;
                buffer[offset + 1] = (0x80 | ((c >> 6) & 0x3F)) as u8;
                buffer[offset + 2] = (0x80 | (c & 0x3F)) as u8;
                offset += 3;
            } else {
                buffer[offset] = (0xC0 | ((c >> 6) & 0x1F)) as u8;
                buffer[offset + 1] = (0x80 | (c & 0x3F)) as u8;
                offset += 2;
            }
            // the next unit may need 3 bytes; flush before it could not fit
            if offset > buffer.len() - 3 {
                self.sink.write_bytes(&self.scratch.as_slice()[..offset])?;
                offset = 0;
            }
        }
        self.sink.write_bytes(&self.scratch.as_slice()[..offset])
    }

    /// Writes a presence byte, then the value if present.
    pub fn write_optional<T: ?Sized, F>(
        &mut self,
        value: Option<&T>,
        mut writer: F,
    ) -> StreamResult<()>
    where
        F: FnMut(&mut Self, &T) -> StreamResult<()>,
    {
        match value {
            Some(v) => {
                self.write_bool(true)?;
                writer(self, v)
            }
            None => self.write_bool(false),
        }
    }

    /// Writes an optional string.
    pub fn write_optional_string(&mut self, value: Option<&str>) -> StreamResult<()> {
        self.write_optional(value, |out, v| out.write_string(v))
    }

    /// Writes an optional fixed-width int.
    pub fn write_optional_int(&mut self, value: Option<i32>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_int(*v))
    }

    /// Writes an optional variable-length int.
    pub fn write_optional_vint(&mut self, value: Option<i32>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_vint(*v))
    }

    /// Writes an optional fixed-width long.
    pub fn write_optional_long(&mut self, value: Option<i64>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_long(*v))
    }

    /// Writes an optional float.
    pub fn write_optional_float(&mut self, value: Option<f32>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_float(*v))
    }

    /// Writes an optional double.
    pub fn write_optional_double(&mut self, value: Option<f64>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_double(*v))
    }

    /// Writes an optional boolean in a single byte: 2 for absent, otherwise
    /// the standard boolean encoding. One byte cheaper than
    /// [`StreamOutput::write_optional`] over a boolean.
    pub fn write_optional_bool(&mut self, value: Option<bool>) -> StreamResult<()> {
        match value {
            Some(v) => self.write_bool(v),
            None => self.write_byte(2),
        }
    }

    /// Writes an instant as fixed-width epoch seconds and subsecond nanos.
    pub fn write_instant(&mut self, value: DateTime<Utc>) -> StreamResult<()> {
        self.write_long(value.timestamp())?;
        self.write_int(value.timestamp_subsec_nanos() as i32)
    }

    /// Writes an optional instant.
    pub fn write_optional_instant(&mut self, value: Option<DateTime<Utc>>) -> StreamResult<()> {
        self.write_optional(value.as_ref(), |out, v| out.write_instant(*v))
    }

    /// Writes a varint length then each element via the supplied writer.
    pub fn write_array<T, F>(&mut self, mut writer: F, values: &[T]) -> StreamResult<()>
    where
        F: FnMut(&mut Self, &T) -> StreamResult<()>,
    {
        self.write_length(values.len())?;
        for value in values {
            writer(self, value)?;
        }
        Ok(())
    }

    /// Writes an optional array: a presence byte, then the array if present.
    pub fn write_optional_array<T, F>(
        &mut self,
        writer: F,
        values: Option<&[T]>,
    ) -> StreamResult<()>
    where
        F: FnMut(&mut Self, &T) -> StreamResult<()>,
    {
        match values {
            Some(v) => {
                self.write_bool(true)?;
                self.write_array(writer, v)
            }
            None => self.write_bool(false),
        }
    }

    /// Writes any sized collection: a varint length then each element via
    /// the supplied writer. Same wire shape as
    /// [`StreamOutput::write_array`].
    pub fn write_collection<I, F>(&mut self, values: I, mut writer: F) -> StreamResult<()>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(&mut Self, I::Item) -> StreamResult<()>,
    {
        let iter = values.into_iter();
        self.write_length(iter.len())?;
        for value in iter {
            writer(self, value)?;
        }
        Ok(())
    }

    /// Writes a collection of strings.
    pub fn write_string_collection<I>(&mut self, values: I) -> StreamResult<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        I::IntoIter: ExactSizeIterator,
    {
        self.write_collection(values, |out, v| out.write_string(v.as_ref()))
    }

    /// Writes a string array.
    pub fn write_string_array<T: AsRef<str>>(&mut self, values: &[T]) -> StreamResult<()> {
        self.write_string_collection(values)
    }

    /// Writes a varint entry count then key,value pairs in source iteration
    /// order. No implicit sorting; see
    /// [`StreamOutput::write_map_with_consistent_order`] for a
    /// deterministic layout.
    pub fn write_map<I, K, V, KF, VF>(
        &mut self,
        entries: I,
        mut key_writer: KF,
        mut value_writer: VF,
    ) -> StreamResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        I::IntoIter: ExactSizeIterator,
        KF: FnMut(&mut Self, K) -> StreamResult<()>,
        VF: FnMut(&mut Self, V) -> StreamResult<()>,
    {
        let iter = entries.into_iter();
        self.write_length(iter.len())?;
        for (key, value) in iter {
            key_writer(self, key)?;
            value_writer(self, value)?;
        }
        Ok(())
    }

    /// Writes an array of fixed-width ints.
    pub fn write_int_array(&mut self, values: &[i32]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_int(*value)?;
        }
        Ok(())
    }

    /// Writes an array of variable-length ints.
    pub fn write_vint_array(&mut self, values: &[i32]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_vint(*value)?;
        }
        Ok(())
    }

    /// Writes an array of fixed-width longs.
    pub fn write_long_array(&mut self, values: &[i64]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_long(*value)?;
        }
        Ok(())
    }

    /// Writes an array of variable-length unsigned longs.
    pub fn write_vlong_array(&mut self, values: &[u64]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_vlong(*value)?;
        }
        Ok(())
    }

    /// Writes an array of floats.
    pub fn write_float_array(&mut self, values: &[f32]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_float(*value)?;
        }
        Ok(())
    }

    /// Writes an array of doubles.
    pub fn write_double_array(&mut self, values: &[f64]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            self.write_double(*value)?;
        }
        Ok(())
    }

    /// Writes an enum as the varint of its ordinal value.
    pub fn write_enum<E: Into<u32>>(&mut self, value: E) -> StreamResult<()> {
        let ordinal: u32 = value.into();
        self.write_vint(ordinal as i32)
    }

    /// Writes a list of streamable objects.
    pub fn write_streamable_list<T: Streamable>(&mut self, values: &[T]) -> StreamResult<()> {
        self.write_length(values.len())?;
        for value in values {
            value.write_to(self)?;
        }
        Ok(())
    }

    /// Writes a presence byte, then the object if present.
    pub fn write_optional_streamable<T: Streamable>(
        &mut self,
        value: Option<&T>,
    ) -> StreamResult<()> {
        self.write_optional(value, |out, v| v.write_to(out))
    }

    /// Writes a tagged generic value: the shape's tag byte, then its
    /// payload. [`GenericValue::Null`] short-circuits after the tag with no
    /// further bytes. Nested elements recurse through this dispatcher.
    ///
    /// Two encodings of an equal [`GenericValue::Map`] are not guaranteed
    /// byte-identical, because entries travel in iteration order; use
    /// [`StreamOutput::write_map_with_consistent_order`] when that matters.
    pub fn write_generic(&mut self, value: &GenericValue) -> StreamResult<()> {
        self.write_byte(value.tag() as u8)?;
        match value {
            GenericValue::Null => Ok(()),
            GenericValue::String(s) => self.write_string(s),
            GenericValue::Int(i) => self.write_int(*i),
            GenericValue::Long(l) => self.write_long(*l),
            GenericValue::Float(f) => self.write_float(*f),
            GenericValue::Double(d) => self.write_double(*d),
            GenericValue::Bool(b) => self.write_bool(*b),
            GenericValue::Bytes(b) => self.write_byte_array(b),
            GenericValue::List(items) | GenericValue::Array(items) => {
                self.write_length(items.len())?;
                for item in items {
                    self.write_generic(item)?;
                }
                Ok(())
            }
            GenericValue::OrderedMap(entries) => {
                self.write_length(entries.len())?;
                for (key, item) in entries {
                    self.write_string(key)?;
                    self.write_generic(item)?;
                }
                Ok(())
            }
            GenericValue::Map(map) => {
                self.write_length(map.len())?;
                for (key, item) in map {
                    self.write_string(key)?;
                    self.write_generic(item)?;
                }
                Ok(())
            }
            GenericValue::SignedByte(b) => self.write_byte(*b as u8),
            GenericValue::Date(millis) => self.write_long(*millis),
            GenericValue::Short(s) => self.write_short(*s),
            GenericValue::IntArray(values) => self.write_int_array(values),
            GenericValue::LongArray(values) => self.write_long_array(values),
            GenericValue::FloatArray(values) => self.write_float_array(values),
            GenericValue::DoubleArray(values) => self.write_double_array(values),
            GenericValue::ZonedTimestamp { zone_id, epoch_millis } => {
                self.write_string(zone_id)?;
                self.write_long(*epoch_millis)
            }
        }
    }

    /// Writes a map in a consistent order: entries sorted by key, always
    /// under the unordered-map tag, so two encodings of equal maps are
    /// byte-identical. Suited to content-addressed or diff-friendly output.
    ///
    /// Only the top-level keys are ordered; maps nested inside the values
    /// travel through the regular dispatcher. An order-preserving map
    /// cannot be passed here: its insertion order is already its encoding.
    pub fn write_map_with_consistent_order(
        &mut self,
        map: Option<&HashMap<String, GenericValue>>,
    ) -> StreamResult<()> {
        let Some(map) = map else {
            return self.write_byte(tags::NULL as u8);
        };
        self.write_byte(tags::MAP as u8)?;
        self.write_length(map.len())?;
        let mut entries: Vec<(&String, &GenericValue)> = map.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        for (key, value) in entries {
            self.write_string(key)?;
            self.write_generic(value)?;
        }
        Ok(())
    }

    /// Writes a length as a varint, rejecting lengths beyond the 32-bit
    /// wire range.
    fn write_length(&mut self, len: usize) -> StreamResult<()> {
        let len = i32::try_from(len).map_err(|_| {
            StreamError::invalid_argument(format!("length {len} exceeds the 32-bit wire range"))
        })?;
        self.write_vint(len)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::stream::BytesSink;

    fn encode(f: impl FnOnce(&mut StreamOutput<BytesSink>) -> StreamResult<()>) -> Vec<u8> {
        let mut out = StreamOutput::new(BytesSink::new());
        f(&mut out).unwrap();
        out.into_inner().into_bytes()
    }

    #[test]
    fn vint_byte_patterns() {
        assert_eq!(encode(|o| o.write_vint(0)), [0x00]);
        assert_eq!(encode(|o| o.write_vint(127)), [0x7F]);
        assert_eq!(encode(|o| o.write_vint(128)), [0x80, 0x01]);
        assert_eq!(encode(|o| o.write_vint(300)), [0xAC, 0x02]);
        assert_eq!(encode(|o| o.write_vint(i32::MAX)).len(), 5);
    }

    #[test]
    fn negative_vint_takes_five_bytes() {
        assert_eq!(encode(|o| o.write_vint(-1)), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(encode(|o| o.write_vint(i32::MIN)).len(), 5);
    }

    #[test]
    fn vlong_byte_patterns() {
        assert_eq!(encode(|o| o.write_vlong(0)), [0x00]);
        assert_eq!(encode(|o| o.write_vlong(u64::MAX)).len(), 10);
    }

    #[test]
    fn zigzag_remaps_small_magnitudes() {
        assert_eq!(encode(|o| o.write_zlong(0)), [0x00]);
        assert_eq!(encode(|o| o.write_zlong(-1)), [0x01]);
        assert_eq!(encode(|o| o.write_zlong(1)), [0x02]);
        assert_eq!(encode(|o| o.write_zlong(-2)), [0x03]);
        // extremes map to the maximal unsigned patterns
        assert_eq!(encode(|o| o.write_zlong(i64::MIN)).len(), 10);
        assert_eq!(encode(|o| o.write_zlong(i64::MAX)).len(), 10);
    }

    #[test]
    fn fixed_width_is_big_endian() {
        assert_eq!(encode(|o| o.write_short(0x0102)), [0x01, 0x02]);
        assert_eq!(encode(|o| o.write_int(0x01020304)), [0x01, 0x02, 0x03, 0x04]);
        assert_eq!(
            encode(|o| o.write_long(0x0102030405060708)),
            [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]
        );
    }

    #[test]
    fn empty_string_is_one_zero_byte() {
        assert_eq!(encode(|o| o.write_string("")), [0x00]);
    }

    #[test]
    fn ascii_string_is_length_plus_bytes() {
        assert_eq!(encode(|o| o.write_string("abc")), [0x03, b'a', b'b', b'c']);
    }

    #[test]
    fn two_and_three_byte_string_forms() {
        // U+00E9 takes the 2-byte form
        assert_eq!(encode(|o| o.write_string("\u{E9}")), [0x01, 0xC3, 0xA9]);
        // U+4E2D takes the 3-byte form
        assert_eq!(encode(|o| o.write_string("\u{4E2D}")), [0x01, 0xE4, 0xB8, 0xAD]);
    }

    #[test]
    fn supplementary_chars_travel_as_surrogate_halves() {
        // U+1F600 is two UTF-16 units, each 3-byte encoded
        let bytes = encode(|o| o.write_string("\u{1F600}"));
        assert_eq!(bytes, [0x02, 0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]);
    }

    #[test]
    fn long_multibyte_string_flushes_without_splitting_units() {
        // 1000 three-byte units against a 1024-byte scratch forces several
        // flushes; the output must still be count + contiguous triplets
        let text: String = std::iter::repeat('\u{4E2D}').take(1000).collect();
        let bytes = encode(|o| o.write_string(&text));
        assert_eq!(bytes.len(), 2 + 3 * 1000);
        assert_eq!(&bytes[..2], &[0xE8, 0x07]);
        for chunk in bytes[2..].chunks(3) {
            assert_eq!(chunk, [0xE4, 0xB8, 0xAD]);
        }
    }

    #[test]
    fn scratch_allocation_is_reused() {
        let mut out = StreamOutput::new(BytesSink::new());
        out.write_string("hello world").unwrap();
        let first = out.scratch.len();
        out.write_string("ok").unwrap();
        assert_eq!(out.scratch.len(), first);
    }

    #[test]
    fn optional_bool_is_tristate() {
        assert_eq!(encode(|o| o.write_optional_bool(None)), [2]);
        assert_eq!(encode(|o| o.write_optional_bool(Some(true))), [1]);
        assert_eq!(encode(|o| o.write_optional_bool(Some(false))), [0]);
    }

    #[test]
    fn optional_values_cost_one_presence_byte() {
        assert_eq!(encode(|o| o.write_optional_string(None)), [0]);
        assert_eq!(encode(|o| o.write_optional_string(Some("a"))), [1, 0x01, b'a']);
        assert_eq!(encode(|o| o.write_optional_int(Some(1))), [1, 0, 0, 0, 1]);
    }

    #[test]
    fn generic_null_is_single_tag_byte() {
        assert_eq!(encode(|o| o.write_generic(&GenericValue::Null)), [0xFF]);
    }

    #[test]
    fn generic_values_lead_with_their_tag() {
        assert_eq!(encode(|o| o.write_generic(&GenericValue::Int(1)))[0], 1);
        assert_eq!(encode(|o| o.write_generic(&GenericValue::Bool(true))), [5, 1]);
        assert_eq!(
            encode(|o| o.write_generic(&GenericValue::from("hi"))),
            [0, 0x02, b'h', b'i']
        );
    }

    #[test]
    fn consistent_order_map_sorts_keys_under_map_tag() {
        let mut forward = HashMap::new();
        forward.insert("alpha".to_owned(), GenericValue::Int(1));
        forward.insert("beta".to_owned(), GenericValue::Int(2));
        forward.insert("gamma".to_owned(), GenericValue::Int(3));

        let mut reversed = HashMap::new();
        reversed.insert("gamma".to_owned(), GenericValue::Int(3));
        reversed.insert("beta".to_owned(), GenericValue::Int(2));
        reversed.insert("alpha".to_owned(), GenericValue::Int(1));

        let a = encode(|o| o.write_map_with_consistent_order(Some(&forward)));
        let b = encode(|o| o.write_map_with_consistent_order(Some(&reversed)));
        assert_eq!(a, b);
        // shares the unordered-map tag on the wire
        assert_eq!(a[0], tags::MAP as u8);

        assert_eq!(encode(|o| o.write_map_with_consistent_order(None)), [0xFF]);
    }

    #[test]
    fn typed_arrays_carry_varint_lengths() {
        assert_eq!(
            encode(|o| o.write_int_array(&[1, 2])),
            [0x02, 0, 0, 0, 1, 0, 0, 0, 2]
        );
        assert_eq!(encode(|o| o.write_double_array(&[])), [0x00]);
        assert_eq!(encode(|o| o.write_vint_array(&[300])), [0x01, 0xAC, 0x02]);
    }

    #[test]
    fn enums_write_their_ordinal() {
        #[derive(Clone, Copy)]
        enum Mode {
            Fast = 2,
        }
        impl From<Mode> for u32 {
            fn from(mode: Mode) -> Self {
                mode as u32
            }
        }
        assert_eq!(encode(|o| o.write_enum(Mode::Fast)), [0x02]);
    }
}

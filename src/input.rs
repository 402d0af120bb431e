//! The stream decoder.
//!
//! [`StreamInput`] mirrors every [`StreamOutput`](crate::StreamOutput)
//! operation over a [`Source`]. Decoding is strict: truncated input, invalid
//! lead bytes, over-long varints, and unknown generic tags all fail with a
//! typed error, and a failed read never hands back a partial value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{StreamError, StreamResult};
use crate::stream::Source;
use crate::streamable::Streamable;
use crate::value::{tags, GenericValue};

/// Upper bound on speculative allocation while decoding.
///
/// Length prefixes are attacker-controlled; collections grow with the data
/// actually read instead of trusting the advertised size.
const MAX_PREALLOCATION: usize = 4096;

/// Decoder reading wire formats from a [`Source`].
#[derive(Debug)]
pub struct StreamInput<S: Source> {
    source: S,
}

impl<S: Source> StreamInput<S> {
    /// Wraps a source.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// A reference to the underlying source.
    #[must_use]
    pub fn get_ref(&self) -> &S {
        &self.source
    }

    /// A mutable reference to the underlying source.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Unwraps, returning the source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Closes the underlying source.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] if releasing fails.
    pub fn close(&mut self) -> StreamResult<()> {
        self.source.close()
    }

    /// Current read position, where the source supports one.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] on sources without offsets.
    pub fn position(&mut self) -> StreamResult<u64> {
        self.source.position()
    }

    /// Moves the read position, where the source supports it.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Unsupported`] on sources without offsets.
    pub fn seek(&mut self, position: u64) -> StreamResult<()> {
        self.source.seek(position)
    }

    /// Reads a single byte.
    pub fn read_byte(&mut self) -> StreamResult<u8> {
        self.source.read_byte()
    }

    /// Fills `buf` exactly with raw bytes.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        self.source.read_bytes(buf)
    }

    /// Reads a varint length prefix then that many raw bytes.
    pub fn read_byte_array(&mut self) -> StreamResult<Vec<u8>> {
        let len = self.read_length()?;
        let mut bytes = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        while bytes.len() < len {
            let chunk = (len - bytes.len()).min(MAX_PREALLOCATION);
            let start = bytes.len();
            bytes.resize(start + chunk, 0);
            self.source.read_bytes(&mut bytes[start..])?;
        }
        Ok(bytes)
    }

    /// Reads a big-endian short.
    pub fn read_short(&mut self) -> StreamResult<i16> {
        let mut buf = [0u8; 2];
        self.source.read_bytes(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    /// Reads a big-endian int.
    pub fn read_int(&mut self) -> StreamResult<i32> {
        let mut buf = [0u8; 4];
        self.source.read_bytes(&mut buf)?;
        Ok(i32::from_be_bytes(buf))
    }

    /// Reads a big-endian long.
    pub fn read_long(&mut self) -> StreamResult<i64> {
        let mut buf = [0u8; 8];
        self.source.read_bytes(&mut buf)?;
        Ok(i64::from_be_bytes(buf))
    }

    /// Reads a variable-length int: up to five bytes, seven payload bits
    /// each, high bit flagging continuation.
    pub fn read_vint(&mut self) -> StreamResult<i32> {
        let mut value = 0u32;
        for shift in (0..28).step_by(7) {
            let b = self.source.read_byte()?;
            value |= u32::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(value as i32);
            }
        }
        // byte five may only carry the value's top four bits
        let b = self.source.read_byte()?;
        if b & 0xF0 != 0 {
            return Err(StreamError::malformed(format!(
                "invalid varint: fifth byte {b:#04x} overflows 32 bits"
            )));
        }
        value |= u32::from(b) << 28;
        Ok(value as i32)
    }

    /// Reads a variable-length unsigned long: at most ten bytes; a
    /// continuation bit or excess payload on the tenth is malformed.
    pub fn read_vlong(&mut self) -> StreamResult<u64> {
        let mut value = 0u64;
        for shift in (0..63).step_by(7) {
            let b = self.source.read_byte()?;
            value |= u64::from(b & 0x7F) << shift;
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        // byte ten may only carry bit 63
        let b = self.source.read_byte()?;
        if b & 0xFE != 0 {
            return Err(StreamError::malformed(format!(
                "invalid varint: tenth byte {b:#04x} overflows 64 bits"
            )));
        }
        value |= u64::from(b) << 63;
        Ok(value)
    }

    /// Reads a zig-zag encoded signed long.
    pub fn read_zlong(&mut self) -> StreamResult<i64> {
        let encoded = self.read_vlong()?;
        Ok(((encoded >> 1) as i64) ^ -((encoded & 1) as i64))
    }

    /// Reads a boolean; any byte other than 0 or 1 is malformed.
    pub fn read_bool(&mut self) -> StreamResult<bool> {
        match self.source.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(StreamError::malformed(format!("invalid boolean byte {other:#04x}"))),
        }
    }

    /// Reads a float from its big-endian IEEE-754 bits.
    pub fn read_float(&mut self) -> StreamResult<f32> {
        Ok(f32::from_bits(self.read_int()? as u32))
    }

    /// Reads a double from its big-endian IEEE-754 bits.
    pub fn read_double(&mut self) -> StreamResult<f64> {
        Ok(f64::from_bits(self.read_long()? as u64))
    }

    /// Reads a compact string: a varint count of UTF-16 code units, then a
    /// one-to-three-byte form per unit selected by the lead byte.
    pub fn read_string(&mut self) -> StreamResult<String> {
        let char_count = self.read_length()?;
        let mut units: Vec<u16> = Vec::with_capacity(char_count.min(MAX_PREALLOCATION));
        for _ in 0..char_count {
            let b = self.source.read_byte()?;
            let unit = match b >> 4 {
                0..=7 => u16::from(b),
                0xC | 0xD => {
                    let b2 = self.source.read_byte()?;
                    (u16::from(b & 0x1F) << 6) | u16::from(b2 & 0x3F)
                }
                0xE => {
                    let b2 = self.source.read_byte()?;
                    let b3 = self.source.read_byte()?;
                    (u16::from(b & 0x0F) << 12)
                        | (u16::from(b2 & 0x3F) << 6)
                        | u16::from(b3 & 0x3F)
                }
                _ => {
                    return Err(StreamError::malformed(format!(
                        "invalid string lead byte {b:#04x}"
                    )))
                }
            };
            units.push(unit);
        }
        String::from_utf16(&units)
            .map_err(|_| StreamError::malformed("string contains unpaired surrogate halves"))
    }

    /// Reads a presence byte, then the value via `reader` if present.
    /// Exactly one byte is consumed on absence.
    pub fn read_optional<T, F>(&mut self, mut reader: F) -> StreamResult<Option<T>>
    where
        F: FnMut(&mut Self) -> StreamResult<T>,
    {
        if self.read_bool()? {
            Ok(Some(reader(self)?))
        } else {
            Ok(None)
        }
    }

    /// Reads an optional string.
    pub fn read_optional_string(&mut self) -> StreamResult<Option<String>> {
        self.read_optional(Self::read_string)
    }

    /// Reads an optional fixed-width int.
    pub fn read_optional_int(&mut self) -> StreamResult<Option<i32>> {
        self.read_optional(Self::read_int)
    }

    /// Reads an optional variable-length int.
    pub fn read_optional_vint(&mut self) -> StreamResult<Option<i32>> {
        self.read_optional(Self::read_vint)
    }

    /// Reads an optional fixed-width long.
    pub fn read_optional_long(&mut self) -> StreamResult<Option<i64>> {
        self.read_optional(Self::read_long)
    }

    /// Reads an optional float.
    pub fn read_optional_float(&mut self) -> StreamResult<Option<f32>> {
        self.read_optional(Self::read_float)
    }

    /// Reads an optional double.
    pub fn read_optional_double(&mut self) -> StreamResult<Option<f64>> {
        self.read_optional(Self::read_double)
    }

    /// Reads a tri-state optional boolean: 2 for absent, otherwise the
    /// standard boolean encoding.
    pub fn read_optional_bool(&mut self) -> StreamResult<Option<bool>> {
        match self.source.read_byte()? {
            0 => Ok(Some(false)),
            1 => Ok(Some(true)),
            2 => Ok(None),
            other => {
                Err(StreamError::malformed(format!("invalid optional boolean byte {other:#04x}")))
            }
        }
    }

    /// Reads an instant from epoch seconds and subsecond nanos.
    pub fn read_instant(&mut self) -> StreamResult<DateTime<Utc>> {
        let seconds = self.read_long()?;
        let nanos = self.read_int()?;
        let nanos = u32::try_from(nanos)
            .map_err(|_| StreamError::malformed(format!("negative subsecond nanos {nanos}")))?;
        DateTime::from_timestamp(seconds, nanos).ok_or_else(|| {
            StreamError::malformed(format!("instant {seconds}s {nanos}ns out of range"))
        })
    }

    /// Reads an optional instant.
    pub fn read_optional_instant(&mut self) -> StreamResult<Option<DateTime<Utc>>> {
        self.read_optional(Self::read_instant)
    }

    /// Reads a varint length then that many elements via `reader`.
    pub fn read_array<T, F>(&mut self, mut reader: F) -> StreamResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> StreamResult<T>,
    {
        let len = self.read_length()?;
        let mut values = Vec::with_capacity(len.min(MAX_PREALLOCATION));
        for _ in 0..len {
            values.push(reader(self)?);
        }
        Ok(values)
    }

    /// Reads an optional array: a presence byte, then the array if present.
    pub fn read_optional_array<T, F>(&mut self, reader: F) -> StreamResult<Option<Vec<T>>>
    where
        F: FnMut(&mut Self) -> StreamResult<T>,
    {
        if self.read_bool()? {
            Ok(Some(self.read_array(reader)?))
        } else {
            Ok(None)
        }
    }

    /// Reads a length-prefixed sequence into a caller-chosen container.
    /// Same wire shape as [`StreamInput::read_array`].
    pub fn read_collection<T, C, F>(&mut self, mut reader: F) -> StreamResult<C>
    where
        C: FromIterator<T>,
        F: FnMut(&mut Self) -> StreamResult<T>,
    {
        let len = self.read_length()?;
        (0..len).map(|_| reader(self)).collect()
    }

    /// Reads a collection of strings into a caller-chosen container.
    pub fn read_string_collection<C: FromIterator<String>>(&mut self) -> StreamResult<C> {
        self.read_collection(Self::read_string)
    }

    /// Reads a string array.
    pub fn read_string_array(&mut self) -> StreamResult<Vec<String>> {
        self.read_array(Self::read_string)
    }

    /// Reads a varint entry count then key,value pairs, reconstructing into
    /// a caller-chosen map container in wire order.
    pub fn read_map<K, V, M, KF, VF>(
        &mut self,
        mut key_reader: KF,
        mut value_reader: VF,
    ) -> StreamResult<M>
    where
        M: FromIterator<(K, V)>,
        KF: FnMut(&mut Self) -> StreamResult<K>,
        VF: FnMut(&mut Self) -> StreamResult<V>,
    {
        let len = self.read_length()?;
        (0..len)
            .map(|_| {
                let key = key_reader(self)?;
                let value = value_reader(self)?;
                Ok((key, value))
            })
            .collect()
    }

    /// Reads an array of fixed-width ints.
    pub fn read_int_array(&mut self) -> StreamResult<Vec<i32>> {
        self.read_array(Self::read_int)
    }

    /// Reads an array of variable-length ints.
    pub fn read_vint_array(&mut self) -> StreamResult<Vec<i32>> {
        self.read_array(Self::read_vint)
    }

    /// Reads an array of fixed-width longs.
    pub fn read_long_array(&mut self) -> StreamResult<Vec<i64>> {
        self.read_array(Self::read_long)
    }

    /// Reads an array of variable-length unsigned longs.
    pub fn read_vlong_array(&mut self) -> StreamResult<Vec<u64>> {
        self.read_array(Self::read_vlong)
    }

    /// Reads an array of floats.
    pub fn read_float_array(&mut self) -> StreamResult<Vec<f32>> {
        self.read_array(Self::read_float)
    }

    /// Reads an array of doubles.
    pub fn read_double_array(&mut self) -> StreamResult<Vec<f64>> {
        self.read_array(Self::read_double)
    }

    /// Reads an enum from its varint ordinal, validating against the enum's
    /// declared values via its `TryFrom` conversion.
    pub fn read_enum<E: TryFrom<u32>>(&mut self) -> StreamResult<E> {
        let ordinal = self.read_vint()?;
        let ordinal = u32::try_from(ordinal)
            .map_err(|_| StreamError::malformed(format!("negative enum ordinal {ordinal}")))?;
        E::try_from(ordinal)
            .map_err(|_| StreamError::malformed(format!("enum ordinal {ordinal} out of range")))
    }

    /// Reads a streamable object by populating a default-constructed value.
    pub fn read_streamable<T: Streamable + Default>(&mut self) -> StreamResult<T> {
        let mut value = T::default();
        value.read_from(self)?;
        Ok(value)
    }

    /// Reads a list of streamable objects.
    pub fn read_streamable_list<T: Streamable + Default>(&mut self) -> StreamResult<Vec<T>> {
        self.read_array(Self::read_streamable)
    }

    /// Reads a presence byte, then the streamable object if present.
    pub fn read_optional_streamable<T: Streamable + Default>(
        &mut self,
    ) -> StreamResult<Option<T>> {
        self.read_optional(Self::read_streamable)
    }

    /// Reads a tagged generic value.
    ///
    /// The null tag consumes exactly one byte. An unregistered tag fails
    /// with [`StreamError::UnknownTag`] without consuming further bytes.
    /// Every registered routine consumes exactly its own format, recursing
    /// through this dispatcher for nested elements.
    pub fn read_generic(&mut self) -> StreamResult<GenericValue> {
        let tag = self.source.read_byte()? as i8;
        match tag {
            tags::NULL => Ok(GenericValue::Null),
            tags::STRING => Ok(GenericValue::String(self.read_string()?)),
            tags::INT => Ok(GenericValue::Int(self.read_int()?)),
            tags::LONG => Ok(GenericValue::Long(self.read_long()?)),
            tags::FLOAT => Ok(GenericValue::Float(self.read_float()?)),
            tags::DOUBLE => Ok(GenericValue::Double(self.read_double()?)),
            tags::BOOL => Ok(GenericValue::Bool(self.read_bool()?)),
            tags::BYTES => Ok(GenericValue::Bytes(self.read_byte_array()?)),
            tags::LIST => Ok(GenericValue::List(self.read_array(Self::read_generic)?)),
            tags::ARRAY => Ok(GenericValue::Array(self.read_array(Self::read_generic)?)),
            tags::ORDERED_MAP => {
                let entries =
                    self.read_map(Self::read_string, Self::read_generic)?;
                Ok(GenericValue::OrderedMap(entries))
            }
            tags::MAP => {
                let entries: HashMap<String, GenericValue> =
                    self.read_map(Self::read_string, Self::read_generic)?;
                Ok(GenericValue::Map(entries))
            }
            tags::SIGNED_BYTE => Ok(GenericValue::SignedByte(self.source.read_byte()? as i8)),
            tags::DATE => Ok(GenericValue::Date(self.read_long()?)),
            tags::SHORT => Ok(GenericValue::Short(self.read_short()?)),
            tags::INT_ARRAY => Ok(GenericValue::IntArray(self.read_int_array()?)),
            tags::LONG_ARRAY => Ok(GenericValue::LongArray(self.read_long_array()?)),
            tags::FLOAT_ARRAY => Ok(GenericValue::FloatArray(self.read_float_array()?)),
            tags::DOUBLE_ARRAY => Ok(GenericValue::DoubleArray(self.read_double_array()?)),
            tags::ZONED_TIMESTAMP => {
                let zone_id = self.read_string()?;
                let epoch_millis = self.read_long()?;
                Ok(GenericValue::ZonedTimestamp { zone_id, epoch_millis })
            }
            other => Err(StreamError::UnknownTag(other)),
        }
    }

    /// Reads a varint length prefix, rejecting negative values.
    fn read_length(&mut self) -> StreamResult<usize> {
        let len = self.read_vint()?;
        usize::try_from(len)
            .map_err(|_| StreamError::malformed(format!("negative length {len}")))
    }
}

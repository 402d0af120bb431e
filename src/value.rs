//! Generic tagged values for dynamically-shaped content.
//!
//! This module provides the [`GenericValue`] enum, the closed registry of
//! shapes the generic dispatcher can put on the wire without the caller
//! naming a type. Each variant maps to a single-byte tag
//! ([`tags`]); the tag travels first, so a decoder can reconstruct the value
//! with no schema in hand.
//!
//! # Example
//!
//! ```
//! use wirestream::GenericValue;
//!
//! let name: GenericValue = "Alice".into();
//! let age: GenericValue = 30i32.into();
//! let score: GenericValue = 95.5f64.into();
//!
//! assert_eq!(name.as_str(), Some("Alice"));
//! assert_eq!(age.as_int(), Some(30));
//! assert_eq!(score.as_double(), Some(95.5));
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Wire tags for generic values.
///
/// Tag bytes must match across any wire-compatible pair of implementations;
/// the numbering has gaps where retired shapes used to live.
pub mod tags {
    /// Absent value; short-circuits with no payload.
    pub const NULL: i8 = -1;
    /// Compact string.
    pub const STRING: i8 = 0;
    /// Fixed 32-bit integer.
    pub const INT: i8 = 1;
    /// Fixed 64-bit integer.
    pub const LONG: i8 = 2;
    /// IEEE-754 single precision.
    pub const FLOAT: i8 = 3;
    /// IEEE-754 double precision.
    pub const DOUBLE: i8 = 4;
    /// Boolean.
    pub const BOOL: i8 = 5;
    /// Length-prefixed raw bytes.
    pub const BYTES: i8 = 6;
    /// Ordered sequence of generic values.
    pub const LIST: i8 = 7;
    /// Fixed array of generic values.
    pub const ARRAY: i8 = 8;
    /// Map whose caller-visible order persists on the wire.
    pub const ORDERED_MAP: i8 = 9;
    /// Map with no order guarantee (also used by sorted writes).
    pub const MAP: i8 = 10;
    /// Signed byte.
    pub const SIGNED_BYTE: i8 = 11;
    /// Legacy date: fixed 64-bit epoch milliseconds.
    pub const DATE: i8 = 12;
    /// Fixed 16-bit integer.
    pub const SHORT: i8 = 16;
    /// Length-prefixed fixed 32-bit integers.
    pub const INT_ARRAY: i8 = 17;
    /// Length-prefixed fixed 64-bit integers.
    pub const LONG_ARRAY: i8 = 18;
    /// Length-prefixed single-precision floats.
    pub const FLOAT_ARRAY: i8 = 19;
    /// Length-prefixed double-precision floats.
    pub const DOUBLE_ARRAY: i8 = 20;
    /// Zone id string plus fixed 64-bit epoch milliseconds.
    pub const ZONED_TIMESTAMP: i8 = 23;
}

/// A dynamically-shaped value the generic dispatcher can encode and decode.
///
/// The registry is closed: encoding dispatches by exhaustive match, so an
/// unsupported shape is a compile-time impossibility for statically
/// expressed values. Decoding retains the runtime error path for tags this
/// registry does not know.
///
/// # Supported Shapes
///
/// | Variant | Tag | Payload |
/// |---------|-----|---------|
/// | `Null` | -1 | none |
/// | `String` | 0 | compact string |
/// | `Int` | 1 | fixed32 |
/// | `Long` | 2 | fixed64 |
/// | `Float` | 3 | fixed32 bits |
/// | `Double` | 4 | fixed64 bits |
/// | `Bool` | 5 | one byte |
/// | `Bytes` | 6 | varint length + raw bytes |
/// | `List` | 7 | varint length + elements |
/// | `Array` | 8 | varint length + elements |
/// | `OrderedMap` | 9 | varint length + pairs, insertion order kept |
/// | `Map` | 10 | varint length + pairs, iteration order |
/// | `SignedByte` | 11 | one byte |
/// | `Date` | 12 | fixed64 epoch millis |
/// | `Short` | 16 | fixed16 |
/// | `IntArray` | 17 | varint length + fixed32s |
/// | `LongArray` | 18 | varint length + fixed64s |
/// | `FloatArray` | 19 | varint length + fixed32 bit patterns |
/// | `DoubleArray` | 20 | varint length + fixed64 bit patterns |
/// | `ZonedTimestamp` | 23 | zone id string + fixed64 epoch millis |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GenericValue {
    /// Absent value.
    Null,
    /// UTF-16-unit-counted compact string.
    String(String),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// Single-precision float.
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Boolean.
    Bool(bool),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Ordered sequence; elements may themselves be any generic value.
    List(Vec<GenericValue>),
    /// Fixed array of generic values.
    Array(Vec<GenericValue>),
    /// Map whose insertion order is caller-visible and persists on the wire.
    OrderedMap(Vec<(String, GenericValue)>),
    /// Map with no order guarantee.
    Map(HashMap<String, GenericValue>),
    /// Signed byte.
    SignedByte(i8),
    /// Legacy date as milliseconds since the epoch.
    Date(i64),
    /// 16-bit signed integer.
    Short(i16),
    /// Array of 32-bit integers.
    IntArray(Vec<i32>),
    /// Array of 64-bit integers.
    LongArray(Vec<i64>),
    /// Array of single-precision floats.
    FloatArray(Vec<f32>),
    /// Array of double-precision floats.
    DoubleArray(Vec<f64>),
    /// Timestamp carrying its zone id.
    ZonedTimestamp {
        /// Zone identifier, e.g. `"UTC"` or `"Asia/Shanghai"`.
        zone_id: String,
        /// Milliseconds since the epoch.
        epoch_millis: i64,
    },
}

impl GenericValue {
    /// The wire tag this value encodes under.
    #[must_use]
    pub fn tag(&self) -> i8 {
        match self {
            Self::Null => tags::NULL,
            Self::String(_) => tags::STRING,
            Self::Int(_) => tags::INT,
            Self::Long(_) => tags::LONG,
            Self::Float(_) => tags::FLOAT,
            Self::Double(_) => tags::DOUBLE,
            Self::Bool(_) => tags::BOOL,
            Self::Bytes(_) => tags::BYTES,
            Self::List(_) => tags::LIST,
            Self::Array(_) => tags::ARRAY,
            Self::OrderedMap(_) => tags::ORDERED_MAP,
            Self::Map(_) => tags::MAP,
            Self::SignedByte(_) => tags::SIGNED_BYTE,
            Self::Date(_) => tags::DATE,
            Self::Short(_) => tags::SHORT,
            Self::IntArray(_) => tags::INT_ARRAY,
            Self::LongArray(_) => tags::LONG_ARRAY,
            Self::FloatArray(_) => tags::FLOAT_ARRAY,
            Self::DoubleArray(_) => tags::DOUBLE_ARRAY,
            Self::ZonedTimestamp { .. } => tags::ZONED_TIMESTAMP,
        }
    }

    /// A short name for the shape, for diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Bool(_) => "bool",
            Self::Bytes(_) => "bytes",
            Self::List(_) => "list",
            Self::Array(_) => "array",
            Self::OrderedMap(_) => "ordered map",
            Self::Map(_) => "map",
            Self::SignedByte(_) => "signed byte",
            Self::Date(_) => "date",
            Self::Short(_) => "short",
            Self::IntArray(_) => "int array",
            Self::LongArray(_) => "long array",
            Self::FloatArray(_) => "float array",
            Self::DoubleArray(_) => "double array",
            Self::ZonedTimestamp { .. } => "zoned timestamp",
        }
    }

    /// Returns `true` for [`GenericValue::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The string contents, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The integer contents, if this is a 32-bit integer.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The integer contents, if this is a 64-bit integer.
    #[must_use]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// The float contents, if this is a double-precision float.
    #[must_use]
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// The boolean contents, if this is a boolean.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The raw bytes, if this is a byte sequence.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl From<&str> for GenericValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for GenericValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i32> for GenericValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for GenericValue {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<f32> for GenericValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<f64> for GenericValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for GenericValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for GenericValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<Vec<GenericValue>> for GenericValue {
    fn from(value: Vec<GenericValue>) -> Self {
        Self::List(value)
    }
}

impl From<HashMap<String, GenericValue>> for GenericValue {
    fn from(value: HashMap<String, GenericValue>) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tags_match_registry() {
        assert_eq!(GenericValue::Null.tag(), -1);
        assert_eq!(GenericValue::from("x").tag(), 0);
        assert_eq!(GenericValue::from(1i32).tag(), 1);
        assert_eq!(GenericValue::from(1i64).tag(), 2);
        assert_eq!(GenericValue::Map(HashMap::new()).tag(), 10);
        assert_eq!(GenericValue::OrderedMap(Vec::new()).tag(), 9);
        assert_eq!(GenericValue::Short(0).tag(), 16);
        assert_eq!(
            GenericValue::ZonedTimestamp { zone_id: "UTC".to_owned(), epoch_millis: 0 }.tag(),
            23
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(GenericValue::from("hi").as_str(), Some("hi"));
        assert_eq!(GenericValue::from(7i32).as_int(), Some(7));
        assert_eq!(GenericValue::from(7i64).as_long(), Some(7));
        assert_eq!(GenericValue::from(true).as_bool(), Some(true));
        assert_eq!(GenericValue::from(1.5f64).as_double(), Some(1.5));
        assert!(GenericValue::Null.is_null());
        assert_eq!(GenericValue::Null.as_str(), None);
    }
}

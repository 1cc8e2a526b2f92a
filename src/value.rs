//! The dynamic value model exchanged with the host.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A dynamic value that can cross the codec boundary in either direction.
///
/// This is a closed set: anything a host runtime cannot express through one
/// of these variants must be mapped at the boundary before it reaches the
/// codec (unsupported host shapes conventionally become [`Value::Null`],
/// mirroring the format's "unknown becomes null" leniency).
///
/// Values are plain trees. Reference cycles cannot be represented, and the
/// codec makes no attempt to detect shared substructure.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// PHP `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed 64-bit integer.
    Int(i64),
    /// A double, including NaN and the infinities.
    Float(f64),
    /// A UTF-8 string. The wire format counts its length in bytes, not
    /// characters; see [`byte_length`](crate::byte_length).
    Str(String),
    /// A dense sequential array with implicit index keys `0..n-1`.
    List(Vec<Value>),
    /// An insertion-ordered set of key/value pairs with unique keys, used
    /// for both the associative-array and the plain-object grammar forms.
    Map(Vec<(MapKey, Value)>),
}

/// A key of a [`Value::Map`] pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapKey {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(String),
}

/// One past `i64::MAX`, exactly representable as an `f64` (2^63).
const I64_RANGE_END: f64 = 9_223_372_036_854_775_808.0;

impl Value {
    /// Converts a host number into the variant PHP would see.
    ///
    /// Finite, integral numbers inside `i64` range become [`Value::Int`];
    /// everything else, including integral values too large for `i64` (which
    /// would print in exponential notation and therefore must travel as
    /// doubles), becomes [`Value::Float`].
    pub fn from_f64(n: f64) -> Value {
        if n.is_finite() && n.fract() == 0.0 && n >= -I64_RANGE_END && n < I64_RANGE_END {
            Value::Int(n as i64)
        } else {
            Value::Float(n)
        }
    }

    /// Returns `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the boolean if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the double if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string if this is a [`Value::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the pairs if this is a [`Value::Map`].
    pub fn as_map(&self) -> Option<&[(MapKey, Value)]> {
        match self {
            Value::Map(pairs) => Some(pairs),
            _ => None,
        }
    }

    /// Looks up a string key in a [`Value::Map`].
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs.iter().find_map(|(k, v)| match k {
                MapKey::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Looks up an integer key in a [`Value::Map`].
    pub fn get_int(&self, key: i64) -> Option<&Value> {
        match self {
            Value::Map(pairs) => pairs
                .iter()
                .find_map(|(k, v)| (*k == MapKey::Int(key)).then_some(v)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<(MapKey, Value)>> for Value {
    fn from(pairs: Vec<(MapKey, Value)>) -> Self {
        Value::Map(pairs)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> Self {
        MapKey::Int(n)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.into())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> Self {
        MapKey::Str(s)
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Int(n) => write!(f, "{n}"),
            MapKey::Str(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_f64_splits_ints_and_doubles() {
        assert_eq!(Value::from_f64(5.0), Value::Int(5));
        assert_eq!(Value::from_f64(-3.0), Value::Int(-3));
        assert_eq!(Value::from_f64(1.5), Value::Float(1.5));
        // integral but outside i64 range: stays a double
        assert_eq!(Value::from_f64(1e21), Value::Float(1e21));
        assert!(matches!(Value::from_f64(f64::NAN), Value::Float(f) if f.is_nan()));
        assert_eq!(Value::from_f64(f64::INFINITY), Value::Float(f64::INFINITY));
    }

    #[test]
    fn accessors() {
        assert!(Value::Null.is_null());
        assert!(!Value::Bool(false).is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Int(7).as_float(), None);
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::from("x").as_str(), Some("x"));

        let list = Value::from(vec![Value::Int(1)]);
        assert_eq!(list.as_list().map(<[Value]>::len), Some(1));
        assert_eq!(list.as_map(), None);

        let map = Value::from(vec![(MapKey::from("k"), Value::from(true))]);
        assert_eq!(map.get("k").and_then(Value::as_bool), Some(true));
        assert_eq!(map.get("missing"), None);
        assert_eq!(MapKey::from(3).to_string(), "3");
        assert_eq!(MapKey::from("k").to_string(), "k");
    }

    #[test]
    fn from_f64_at_the_i64_boundary() {
        // 2^63 is not representable as i64, 2^63 - 1024 is
        assert_eq!(
            Value::from_f64(9_223_372_036_854_775_808.0),
            Value::Float(9_223_372_036_854_775_808.0)
        );
        assert_eq!(Value::from_f64(i64::MIN as f64), Value::Int(i64::MIN));
    }
}

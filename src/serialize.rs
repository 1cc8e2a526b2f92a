//! Serialization of a [`Value`] tree into the wire grammar.

use alloc::string::String;
use log::trace;

use crate::bytelen::byte_length;
use crate::value::{MapKey, Value};

/// Options for serialization.
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
    /// Encode [`Value::Map`] with the associative-array tag `a:` instead of
    /// the generic-object tag `O:8:"stdClass":` (default: false).
    pub assoc: bool,
    /// Hint for host bindings that build a [`Value::Map`] from a live host
    /// object: include properties that would normally be excluded from
    /// enumeration (default: false).
    ///
    /// The key set of a `Value::Map` is fixed by the time it reaches the
    /// serializer, so this flag does not alter the encoding of an
    /// already-built value; it exists so bindings can thread the choice
    /// through one options struct.
    pub include_non_enumerable: bool,
}

impl SerializeOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode maps as associative arrays (`a:`) rather than `stdClass`
    /// objects.
    pub fn assoc(mut self) -> Self {
        self.assoc = true;
        self
    }

    /// Ask host bindings to include non-enumerable properties when they
    /// build the value tree.
    pub fn include_non_enumerable(mut self) -> Self {
        self.include_non_enumerable = true;
        self
    }
}

/// Serializes a value into the wire grammar.
///
/// Serialization is total: every [`Value`] has an encoding, so no `Result`
/// is involved. Host shapes the value model cannot express (native handles
/// and the like) are expected to have been mapped to [`Value::Null`] at the
/// boundary, the format's "unknown becomes null" leniency.
///
/// Recursion depth is bounded only by the call stack; a pathologically deep
/// value tree can exhaust it. This is a known, accepted limitation.
pub fn to_string(value: &Value) -> String {
    to_string_with_options(value, &SerializeOptions::default())
}

/// Serializes a value into the wire grammar with custom options.
///
/// # Example
///
/// ```
/// use phpser::{to_string_with_options, MapKey, SerializeOptions, Value};
///
/// let map = Value::Map(vec![(MapKey::Str("a".into()), Value::Int(1))]);
///
/// let obj = to_string_with_options(&map, &SerializeOptions::default());
/// assert_eq!(obj, r#"O:8:"stdClass":1:{s:1:"a";i:1;}"#);
///
/// let arr = to_string_with_options(&map, &SerializeOptions::new().assoc());
/// assert_eq!(arr, r#"a:1:{s:1:"a";i:1;}"#);
/// ```
pub fn to_string_with_options(value: &Value, options: &SerializeOptions) -> String {
    let mut out = String::new();
    write_value(&mut out, value, options);
    out
}

fn write_value(out: &mut String, value: &Value, options: &SerializeOptions) {
    match value {
        Value::Null => out.push_str("N;"),
        Value::Bool(b) => out.push_str(if *b { "b:1;" } else { "b:0;" }),
        Value::Int(n) => {
            out.push_str("i:");
            out.push_str(itoa::Buffer::new().format(*n));
            out.push(';');
        }
        Value::Float(f) => write_float(out, *f),
        Value::Str(s) => write_str(out, s),
        Value::List(items) => {
            trace!("serializing list of {} elements", items.len());
            out.push_str("a:");
            out.push_str(itoa::Buffer::new().format(items.len()));
            out.push_str(":{");
            for (index, item) in items.iter().enumerate() {
                out.push_str("i:");
                out.push_str(itoa::Buffer::new().format(index));
                out.push(';');
                write_value(out, item, options);
            }
            out.push('}');
        }
        Value::Map(pairs) => {
            trace!(
                "serializing map of {} pairs (assoc={})",
                pairs.len(),
                options.assoc
            );
            out.push_str(if options.assoc { "a:" } else { "O:8:\"stdClass\":" });
            out.push_str(itoa::Buffer::new().format(pairs.len()));
            out.push_str(":{");
            for (key, value) in pairs {
                match key {
                    MapKey::Int(n) => {
                        out.push_str("i:");
                        out.push_str(itoa::Buffer::new().format(*n));
                        out.push(';');
                    }
                    MapKey::Str(s) => write_str(out, s),
                }
                write_value(out, value, options);
            }
            out.push('}');
        }
    }
}

fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("d:NAN;");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "d:INF;" } else { "d:-INF;" });
    } else {
        // ryu's shortest representation never emits "e+", so the output
        // always stays inside the grammar's decimal production
        out.push_str("d:");
        out.push_str(ryu::Buffer::new().format_finite(f));
        out.push(';');
    }
}

fn write_str(out: &mut String, s: &str) {
    // the byte-count prefix delimits the payload, so no escaping happens
    out.push_str("s:");
    out.push_str(itoa::Buffer::new().format(byte_length(s)));
    out.push_str(":\"");
    out.push_str(s);
    out.push_str("\";");
}

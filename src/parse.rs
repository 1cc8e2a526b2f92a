//! Recursive-descent parsing of the wire grammar back into a [`Value`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use lexical_parse_float::FromLexical as _;
use lexical_parse_integer::FromLexical as _;
use log::trace;

use crate::error::{ParseError, ParseErrorKind};
use crate::value::{MapKey, Value};

/// Parses one serialized value from the start of `input`.
///
/// Trailing bytes after a complete value are ignored, matching the reference
/// behavior: the wire format is self-delimiting, so the top level has no use
/// for the consumed-byte count.
///
/// Fails with a [`ParseError`] carrying the byte offset at which the grammar
/// stopped matching, and the total input length for diagnostics.
///
/// Recursion depth tracks container nesting and is bounded only by the call
/// stack; a maliciously deep input can exhaust it. This is a known, accepted
/// limitation.
///
/// # Example
///
/// ```
/// use phpser::{from_str, Value};
///
/// let value = from_str(r#"a:3:{i:0;s:1:"x";i:1;s:1:"y";i:2;s:1:"z";}"#).unwrap();
/// assert_eq!(
///     value,
///     Value::List(vec!["x".into(), "y".into(), "z".into()])
/// );
/// ```
pub fn from_str(input: &str) -> Result<Value, ParseError> {
    trace!("parsing {} bytes of input", input.len());
    match parse_at(input) {
        Ok((value, _consumed)) => Ok(value),
        Err(e) => Err(e.with_total(input.len())),
    }
}

/// Parses one value from the start of `input`, returning it together with
/// the number of bytes consumed, which recursive callers use to advance
/// through a container body.
fn parse_at(input: &str) -> Result<(Value, usize), ParseError> {
    match input.as_bytes().first() {
        Some(b'N') => parse_null(input),
        Some(b'b') => parse_bool(input.as_bytes()),
        Some(b'i') => parse_int(input.as_bytes()),
        Some(b'd') => parse_float(input),
        Some(b's') => parse_str(input),
        Some(b'a') | Some(b'O') => parse_container(input),
        other => Err(ParseError::new(
            ParseErrorKind::UnrecognizedTag {
                found: other.map(|b| *b as char),
            },
            0,
        )),
    }
}

fn parse_null(input: &str) -> Result<(Value, usize), ParseError> {
    if input.starts_with("N;") {
        Ok((Value::Null, 2))
    } else {
        Err(payload_error('N', 0))
    }
}

fn parse_bool(bytes: &[u8]) -> Result<(Value, usize), ParseError> {
    match bytes {
        [b'b', b':', v @ (b'0' | b'1'), b';', ..] => Ok((Value::Bool(*v == b'1'), 4)),
        _ => Err(payload_error('b', 0)),
    }
}

fn parse_int(bytes: &[u8]) -> Result<(Value, usize), ParseError> {
    if bytes.get(1) != Some(&b':') {
        return Err(payload_error('i', 0));
    }
    let mut pos = 2;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }
    let digits = count_digits(&bytes[pos..]);
    pos += digits;
    if digits == 0 || bytes.get(pos) != Some(&b';') {
        return Err(payload_error('i', 0));
    }
    // a digit run outside i64 range is rejected rather than rounded
    let n = i64::from_lexical(&bytes[2..pos]).map_err(|_| payload_error('i', 0))?;
    Ok((Value::Int(n), pos + 1))
}

fn parse_float(input: &str) -> Result<(Value, usize), ParseError> {
    // the special payloads take priority over the generic decimal form
    if input.starts_with("d:NAN;") {
        return Ok((Value::Float(f64::NAN), 6));
    }
    if input.starts_with("d:INF;") {
        return Ok((Value::Float(f64::INFINITY), 6));
    }
    if input.starts_with("d:-INF;") {
        return Ok((Value::Float(f64::NEG_INFINITY), 7));
    }
    let bytes = input.as_bytes();
    if bytes.get(1) != Some(&b':') {
        return Err(payload_error('d', 0));
    }
    let end = 2 + match_decimal(&bytes[2..]).ok_or_else(|| payload_error('d', 0))?;
    if bytes.get(end) != Some(&b';') {
        return Err(payload_error('d', 0));
    }
    let f = f64::from_lexical(&bytes[2..end]).map_err(|_| payload_error('d', 0))?;
    Ok((Value::Float(f), end + 1))
}

/// Matches the grammar's decimal production at the start of `bytes`,
/// returning the matched length:
///
/// ```text
/// "-"? ( digit+ "."? digit* | digit* "."? digit+ ) ( ("e"|"E") "-"? digit+ )?
/// ```
///
/// Note the exponent sign may only be `-`; a `+` is outside the grammar.
fn match_decimal(bytes: &[u8]) -> Option<usize> {
    let mut pos = 0;
    if bytes.first() == Some(&b'-') {
        pos += 1;
    }
    let int_digits = count_digits(&bytes[pos..]);
    pos += int_digits;
    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = count_digits(&bytes[pos + 1..]);
        pos += 1 + frac_digits;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(pos), Some(&(b'e' | b'E'))) {
        let mut exp_pos = pos + 1;
        if bytes.get(exp_pos) == Some(&b'-') {
            exp_pos += 1;
        }
        let exp_digits = count_digits(&bytes[exp_pos..]);
        // a bare exponent marker is not part of the match
        if exp_digits > 0 {
            pos = exp_pos + exp_digits;
        }
    }
    Some(pos)
}

fn parse_str(input: &str) -> Result<(Value, usize), ParseError> {
    let bytes = input.as_bytes();
    if bytes.get(1) != Some(&b':') {
        return Err(payload_error('s', 0));
    }
    let digits = count_digits(&bytes[2..]);
    if digits == 0 {
        return Err(payload_error('s', 0));
    }
    let declared =
        usize::from_lexical(&bytes[2..2 + digits]).map_err(|_| payload_error('s', 0))?;
    let mut pos = 2 + digits;
    if bytes.get(pos) != Some(&b':') || bytes.get(pos + 1) != Some(&b'"') {
        return Err(payload_error('s', 0));
    }
    pos += 2;

    // Consume one character at a time until the declared byte count is
    // covered exactly. A premature quote is payload like any other byte, so
    // an understated prefix runs past it and fails on the count instead.
    let start = pos;
    let mut consumed = 0usize;
    let mut chars = input[start..].chars();
    while consumed < declared {
        let Some(ch) = chars.next() else { break };
        consumed += ch.len_utf8();
    }
    let end = start + consumed;
    if consumed != declared {
        return Err(ParseError::new(
            ParseErrorKind::StringLength { declared, consumed },
            end,
        ));
    }
    if bytes.get(end) != Some(&b'"') {
        return Err(ParseError::new(ParseErrorKind::MissingQuote, end));
    }
    let value = input[start..end].to_string();
    let mut total = end + 1;
    // absorb the optional trailing delimiter inside a parent container
    if matches!(bytes.get(total), Some(&(b';' | b'}'))) {
        total += 1;
    }
    Ok((Value::Str(value), total))
}

fn parse_container(input: &str) -> Result<(Value, usize), ParseError> {
    let bytes = input.as_bytes();
    let is_array = bytes[0] == b'a';
    let tag = if is_array { 'a' } else { 'O' };
    let mut pos = 1;

    if !is_array {
        // O:<digits>:"<name>" — the declared name length is not validated
        // against the actual name, matching the reference's lazy match
        if bytes.get(pos) != Some(&b':') {
            return Err(payload_error(tag, 0));
        }
        pos += 1;
        let digits = count_digits(&bytes[pos..]);
        pos += digits;
        if digits == 0 || bytes.get(pos) != Some(&b':') || bytes.get(pos + 1) != Some(&b'"') {
            return Err(payload_error(tag, 0));
        }
        pos += 2;
        let name_start = pos;
        while bytes.get(pos).is_some_and(|&b| b != b'"') {
            pos += 1;
        }
        if pos == name_start || bytes.get(pos) != Some(&b'"') {
            return Err(payload_error(tag, 0));
        }
        pos += 1;
    }

    // common tail: :<n>:{
    if bytes.get(pos) != Some(&b':') {
        return Err(payload_error(tag, 0));
    }
    pos += 1;
    let digits = count_digits(&bytes[pos..]);
    if digits == 0 {
        return Err(payload_error(tag, 0));
    }
    let declared =
        usize::from_lexical(&bytes[pos..pos + digits]).map_err(|_| payload_error(tag, 0))?;
    pos += digits;
    if bytes.get(pos) != Some(&b':') || bytes.get(pos + 1) != Some(&b'{') {
        return Err(payload_error(tag, 0));
    }
    pos += 2;

    trace!("parsing container with {declared} declared pairs (tag {tag:?})");

    // A container opened with the array tag stays a list candidate as long
    // as every key is the integer index the next element would get; the
    // first key that breaks the sequence demotes it to a map for good.
    let mut is_list = is_array;
    let mut pairs: Vec<(MapKey, Value)> = Vec::new();
    for _ in 0..declared {
        let key = parse_child(input, &mut pos)?;
        let value = parse_child(input, &mut pos)?;
        if is_list && !matches!(key, Value::Int(k) if k >= 0 && k as usize == pairs.len()) {
            is_list = false;
        }
        insert_pair(&mut pairs, to_map_key(key), value);
    }

    if bytes.get(pos) != Some(&b'}') {
        return Err(ParseError::new(
            ParseErrorKind::UnterminatedContainer { declared },
            pos,
        ));
    }
    pos += 1;

    let value = if is_list {
        Value::List(pairs.into_iter().map(|(_, v)| v).collect())
    } else {
        Value::Map(pairs)
    };
    Ok((value, pos))
}

/// Parses one container element at `*pos`, advancing it by the bytes
/// consumed and checking the element ended on a `;` or `}` boundary. A
/// nested failure propagates with its offset shifted to be absolute.
fn parse_child(input: &str, pos: &mut usize) -> Result<Value, ParseError> {
    let (child, used) = parse_at(&input[*pos..]).map_err(|e| e.shift(*pos))?;
    *pos += used;
    if !matches!(input.as_bytes().get(*pos - 1), Some(&(b';' | b'}'))) {
        return Err(ParseError::new(ParseErrorKind::MissingDelimiter, *pos));
    }
    Ok(child)
}

/// Inserts a pair, overwriting the value of an existing key in place so the
/// earlier key keeps its position, the way writing into a live object would.
fn insert_pair(pairs: &mut Vec<(MapKey, Value)>, key: MapKey, value: Value) {
    if let Some(slot) = pairs.iter_mut().find(|(k, _)| *k == key) {
        slot.1 = value;
    } else {
        pairs.push((key, value));
    }
}

/// Coerces a parsed key to a map key. Integer and string keys keep their
/// kind; anything else the grammar smuggled into key position is normalized
/// to its textual form.
fn to_map_key(key: Value) -> MapKey {
    match key {
        Value::Int(n) => MapKey::Int(n),
        Value::Str(s) => MapKey::Str(strip_visibility_marker(s)),
        Value::Bool(b) => MapKey::Str(if b { "true" } else { "false" }.to_string()),
        Value::Null => MapKey::Str("null".to_string()),
        Value::Float(f) => MapKey::Str(float_key(f)),
        Value::List(_) | Value::Map(_) => MapKey::Str("Array".to_string()),
    }
}

fn float_key(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        ryu::Buffer::new().format_finite(f).to_string()
    }
}

/// Strips the visibility marker from a property name: private and protected
/// properties serialize as `"\0<name>\0<property>"`, and the whole prefix up
/// to the last NUL goes, leaving the bare property name. The marker is not
/// reconstructable on re-serialize.
fn strip_visibility_marker(key: String) -> String {
    if key.starts_with('\0') {
        if let Some(end) = key.rfind('\0') {
            // at least one byte between the sentinels
            if end >= 2 {
                return key[end + 1..].to_string();
            }
        }
    }
    key
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn payload_error(tag: char, offset: usize) -> ParseError {
    ParseError::new(ParseErrorKind::InvalidPayload { tag }, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_matching() {
        assert_eq!(match_decimal(b"1.5;"), Some(3));
        assert_eq!(match_decimal(b"-0.25;"), Some(5));
        assert_eq!(match_decimal(b"1.;"), Some(2));
        assert_eq!(match_decimal(b".5;"), Some(2));
        assert_eq!(match_decimal(b"1e21;"), Some(4));
        assert_eq!(match_decimal(b"1.5e-7;"), Some(6));
        // a bare exponent marker stays outside the match
        assert_eq!(match_decimal(b"1e;"), Some(1));
        assert_eq!(match_decimal(b"1e+21;"), Some(1));
        assert_eq!(match_decimal(b".;"), None);
        assert_eq!(match_decimal(b"-;"), None);
        assert_eq!(match_decimal(b";"), None);
    }

    #[test]
    fn visibility_marker_stripping() {
        assert_eq!(
            strip_visibility_marker("\0ClassName\0prop".to_string()),
            "prop"
        );
        assert_eq!(strip_visibility_marker("\0*\0prop".to_string()), "prop");
        // greedy: strips through the last NUL
        assert_eq!(strip_visibility_marker("\0A\0\0B\0x".to_string()), "x");
        // no room between sentinels: left alone
        assert_eq!(strip_visibility_marker("\0\0x".to_string()), "\0\0x");
        assert_eq!(strip_visibility_marker("plain".to_string()), "plain");
    }
}

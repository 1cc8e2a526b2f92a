//! Byte-length accounting for the grammar's string length prefixes.

/// Returns the number of bytes `s` occupies under UTF-8 encoding, the way
/// PHP's `strlen()` counts a string.
///
/// The grammar prefixes every string payload with this count, so a string
/// containing multi-byte characters carries a length prefix greater than its
/// character count. Code points at or below `0x7F` contribute 1 byte, at or
/// below `0x7FF` 2 bytes, at or below `0xFFFF` 3 bytes, and supplementary
/// plane characters contribute 4 bytes each (counted once, never as a
/// surrogate pair).
pub fn byte_length(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0..=0x7f => 1,
            0x80..=0x7ff => 2,
            0x800..=0xffff => 3,
            _ => 4,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_encoded_width() {
        assert_eq!(byte_length(""), 0);
        assert_eq!(byte_length("a"), 1);
        assert_eq!(byte_length("é"), 2);
        assert_eq!(byte_length("中"), 3);
        assert_eq!(byte_length("😀"), 4);
    }

    #[test]
    fn mixed_width_strings() {
        assert_eq!(byte_length("abc"), 3);
        assert_eq!(byte_length("héllo"), 6);
        assert_eq!(byte_length("中文"), 6);
        assert_eq!(byte_length("a中😀"), 8);
    }
}

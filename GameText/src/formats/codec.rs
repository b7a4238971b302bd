//! Character codecs shared by the string file formats
//!
//! - Legacy `.str` text is single-byte: every byte maps to the code point of
//!   the same value, and backslash escapes are translated into control
//!   characters.
//! - Compiled `.csf` text is UTF-16LE with every unit bit-inverted. This is
//!   an obfuscation only; it must be reproduced bit-for-bit for compatibility.

/// Translate backslash escapes in a legacy string into display text.
///
/// Recognized escapes are `\\`, `\'`, `\"`, `\?`, `\t` and `\n`. Any other
/// escaped byte is emitted verbatim without its backslash, and a backslash
/// at the very end of the input stops translation. Bytes are widened one to
/// one, so `0x80..=0xFF` become the Latin-1 code points of the same value.
pub fn translate_escapes(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut escaped = false;

    for &byte in input {
        if escaped {
            escaped = false;
            out.push(match byte {
                b'\\' => '\\',
                b'\'' => '\'',
                b'"' => '"',
                b'?' => '?',
                b't' => '\t',
                b'n' => '\n',
                other => char::from(other),
            });
        } else if byte == b'\\' {
            escaped = true;
        } else {
            out.push(char::from(byte));
        }
    }

    out
}

/// Encode display text back into legacy `.str` bytes.
///
/// Backslash, double quote, tab and newline are escaped so the result can sit
/// between quotes on a single line. Characters outside Latin-1 have no
/// single-byte form and are written as `?`.
pub fn encode_escapes(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '\\' => out.extend_from_slice(b"\\\\"),
            '"' => out.extend_from_slice(b"\\\""),
            '\t' => out.extend_from_slice(b"\\t"),
            '\n' => out.extend_from_slice(b"\\n"),
            _ => out.push(u8::try_from(u32::from(ch)).unwrap_or(b'?')),
        }
    }

    out
}

/// Decode one stored compiled-format unit.
///
/// `raw` is the unit exactly as it sits in memory after copying the two
/// little-endian bytes from disk; the byte order is corrected for the host
/// before the bits are inverted.
#[inline]
pub fn decode_compiled_char(raw: u16) -> u16 {
    !u16::from_le(raw)
}

/// Inverse of [`decode_compiled_char`].
#[inline]
pub fn encode_compiled_char(unit: u16) -> u16 {
    (!unit).to_le()
}

/// Decode a block of stored compiled-format bytes into text.
///
/// Units are decoded one at a time up to (not including) the first zero,
/// stored or decoded, which terminates the string. A trailing odd byte is ignored and
/// unpaired surrogates become U+FFFD.
pub fn decode_compiled_units(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
        .take_while(|&raw| raw != 0)
        .map(decode_compiled_char)
        .take_while(|&unit| unit != 0);

    char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Encode text into stored compiled-format bytes (no terminator).
pub fn encode_compiled_units(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .flat_map(|unit| encode_compiled_char(unit).to_ne_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_all_recognized_escapes() {
        assert_eq!(translate_escapes(br"\\"), "\\");
        assert_eq!(translate_escapes(br"\'"), "'");
        assert_eq!(translate_escapes(br#"\""#), "\"");
        assert_eq!(translate_escapes(br"\?"), "?");
        assert_eq!(translate_escapes(br"\t"), "\t");
        assert_eq!(translate_escapes(br"\n"), "\n");
    }

    #[test]
    fn test_translate_unknown_escape_drops_backslash() {
        assert_eq!(translate_escapes(br"a\qb"), "aqb");
        assert_eq!(translate_escapes(br"100\%"), "100%");
    }

    #[test]
    fn test_translate_trailing_backslash_stops() {
        assert_eq!(translate_escapes(b"abc\\"), "abc");
    }

    #[test]
    fn test_translate_widens_latin1() {
        assert_eq!(translate_escapes(&[b'C', 0xE9, b'!']), "C\u{e9}!");
    }

    #[test]
    fn test_escape_round_trip() {
        let text = "Tab\there \"quoted\" back\\slash\nnext 'single' why?";
        assert_eq!(translate_escapes(&encode_escapes(text)), text);
    }

    #[test]
    fn test_encode_non_latin1_becomes_question_mark() {
        assert_eq!(encode_escapes("a\u{4e2d}b"), b"a?b");
    }

    #[test]
    fn test_decode_compiled_char_inverts_bits() {
        let stored = (!u16::from(b'A')).to_le();
        assert_eq!(decode_compiled_char(stored), u16::from(b'A'));
        assert_eq!(decode_compiled_char(encode_compiled_char(0x4e2d)), 0x4e2d);
    }

    #[test]
    fn test_decode_units_stops_at_terminator() {
        let mut bytes = encode_compiled_units("Hi");
        bytes.extend_from_slice(&[0, 0]);
        bytes.extend_from_slice(&encode_compiled_units("ignored"));
        assert_eq!(decode_compiled_units(&bytes), "Hi");
    }

    #[test]
    fn test_decode_units_stops_at_decoded_zero() {
        let mut bytes = encode_compiled_units("H");
        bytes.extend_from_slice(&[0xFF, 0xFF]);
        bytes.extend_from_slice(&encode_compiled_units("i"));
        assert_eq!(decode_compiled_units(&bytes), "H");
    }

    #[test]
    fn test_decode_units_on_disk_layout() {
        // 'O' = 0x004F -> stored !0x004F = 0xFFB0, little-endian on disk
        let bytes = [0xB0, 0xFF, 0xB4, 0xFF];
        assert_eq!(decode_compiled_units(&bytes), "OK");
    }
}

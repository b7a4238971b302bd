//! Byte-at-a-time line and quoted-span reader for legacy `.str` files

use std::io::{self, Read};

use super::whitespace::is_space;

/// Byte that ends a quoted span immediately, wherever it appears.
pub const SENTINEL: u8 = 0xFF;

/// A quoted string plus the token that followed it on the same line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuotedSpan {
    /// Raw bytes between the quotes, escapes untranslated, whitespace
    /// normalized to plain spaces.
    pub text: Vec<u8>,
    /// Token after the closing quote (the speech cue), possibly empty.
    pub extra: String,
    /// Whether a closing quote was found before the sentinel or end of data.
    pub closed: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ExtraState {
    Leading,
    Token,
    Done,
}

/// Reads a legacy string file one byte at a time.
pub struct ByteReader<R> {
    inner: R,
}

impl<R: Read> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next byte from the underlying reader, `None` at end of data.
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    /// Next byte from `prefix` while it lasts, then from the reader.
    fn next_from(&mut self, prefix: &mut impl Iterator<Item = u8>) -> io::Result<Option<u8>> {
        match prefix.next() {
            Some(byte) => Ok(Some(byte)),
            None => self.next_byte(),
        }
    }

    /// Read one line into `line`, replacing its contents.
    ///
    /// The newline is consumed but not stored. Returns `false` only when no
    /// byte at all could be read, so an empty line still returns `true`.
    pub fn read_line(&mut self, line: &mut Vec<u8>) -> io::Result<bool> {
        line.clear();
        let mut read_any = false;

        while let Some(byte) = self.next_byte()? {
            read_any = true;
            if byte == b'\n' {
                break;
            }
            line.push(byte);
        }

        Ok(read_any)
    }

    /// Read a quoted span whose opening quote has already been consumed.
    ///
    /// Bytes come from `prefix` first (the rest of an already-read line) and
    /// then from the reader, so a string may continue over several physical
    /// lines. A newline becomes a space and clears a pending backslash; a
    /// backslash toggles the pending flag, which only decides whether the
    /// next `"` closes the span. The escapes themselves are left in place.
    ///
    /// After the closing quote the rest of the physical line is scanned for
    /// the extra-data token: whitespace and one `=` are skipped, then a run
    /// of `[A-Za-z0-9_]` is taken. A token ending in a digit gets an `e`
    /// appended (`VoiceLine1` becomes `VoiceLine1e`).
    pub fn read_quoted_span(&mut self, prefix: Option<&[u8]>) -> io::Result<QuotedSpan> {
        let mut prefix = prefix.unwrap_or_default().iter().copied();
        let mut span = QuotedSpan::default();
        let mut escaped = false;

        loop {
            let Some(mut byte) = self.next_from(&mut prefix)? else {
                return Ok(span);
            };
            if byte == SENTINEL {
                return Ok(span);
            }

            match byte {
                b'\n' => {
                    escaped = false;
                    byte = b' ';
                }
                b'\\' => escaped = !escaped,
                b'"' if !escaped => break,
                _ => escaped = false,
            }

            if is_space(byte) {
                byte = b' ';
            }
            span.text.push(byte);
        }
        span.closed = true;

        let mut state = ExtraState::Leading;
        let mut skipped_equals = false;

        while let Some(byte) = self.next_from(&mut prefix)? {
            if byte == b'\n' || byte == SENTINEL {
                break;
            }

            if state == ExtraState::Leading {
                if is_space(byte) {
                    continue;
                }
                if byte == b'=' && !skipped_equals {
                    skipped_equals = true;
                    continue;
                }
                state = ExtraState::Token;
            }

            if state == ExtraState::Token {
                if byte.is_ascii_alphanumeric() || byte == b'_' {
                    span.extra.push(char::from(byte));
                    continue;
                }
                state = ExtraState::Done;
            }
        }

        if span.extra.ends_with(|c: char| c.is_ascii_digit()) {
            span.extra.push('e');
        }

        Ok(span)
    }
}

//! Legacy `.str` string file reading and writing
//!
//! ```text
//! // comment
//! LABEL_A
//! "Hello \"World\"" = VoiceLine1
//! END
//! ```
//!
//! A label line is followed by lines up to a case-insensitive `END`; the
//! first line starting with `"` holds the text, optionally followed by a
//! speech cue token.

use std::collections::HashSet;
use std::io::{Read, Write};

use super::codec::{encode_escapes, translate_escapes};
use super::reader::ByteReader;
use super::whitespace::{collapse_interior, trim_edges};
use super::{ParsedStrings, latin1};
use crate::error::{Error, Result};
use crate::table::StringRecord;

/// Added to the `END` count so the record array never has to grow.
pub const STR_COUNT_MARGIN: usize = 500;

fn is_comment(line: &[u8]) -> bool {
    line.starts_with(b"//")
}

fn is_end(line: &[u8]) -> bool {
    line.eq_ignore_ascii_case(b"END")
}

/// Counting pass: number of `END` lines plus [`STR_COUNT_MARGIN`].
///
/// Quoted spans are consumed the same way the parser consumes them, so an
/// `END` line inside a multi-line string is not counted.
pub fn count_str_records<R: Read>(reader: R) -> Result<usize> {
    let mut reader = ByteReader::new(reader);
    let mut line = Vec::new();
    let mut count = 0;

    while reader.read_line(&mut line)? {
        trim_edges(&mut line);
        if line.first() == Some(&b'"') {
            line.push(b'\n');
            reader.read_quoted_span(Some(&line[1..]))?;
        } else if is_end(&line) {
            count += 1;
        }
    }

    Ok(count + STR_COUNT_MARGIN)
}

/// Parse a legacy string file.
///
/// `capacity` is the record count from [`count_str_records`] and only sizes
/// the initial allocation.
///
/// Duplicate labels (compared case-insensitively) keep their first
/// definition; later blocks are read and dropped. A second quoted line under
/// one label is read for its side effects but does not replace the first.
///
/// # Errors
///
/// Returns [`Error::MissingEnd`] if the data ends inside a label block and
/// [`Error::Io`] if reading fails.
pub fn parse_str<R: Read>(reader: R, capacity: usize) -> Result<ParsedStrings> {
    let mut reader = ByteReader::new(reader);
    let mut parsed = ParsedStrings::with_capacity(capacity);
    let mut seen = HashSet::new();
    let mut line = Vec::new();

    while reader.read_line(&mut line)? {
        trim_edges(&mut line);
        if line.is_empty() || is_comment(&line) {
            continue;
        }

        parsed.note_label(&line);
        let label = latin1(&line);

        let duplicate = !seen.insert(label.to_ascii_lowercase());
        #[cfg(feature = "strict-labels")]
        debug_assert!(!duplicate, "duplicate label '{label}'");
        if duplicate {
            tracing::warn!("Duplicate label '{}', keeping the first definition", label);
        }

        let mut value: Option<(String, String)> = None;
        let mut closed = false;

        while reader.read_line(&mut line)? {
            trim_edges(&mut line);

            if line.first() == Some(&b'"') {
                line.push(b'\n');
                let span = reader.read_quoted_span(Some(&line[1..]))?;
                if !span.closed {
                    tracing::debug!("Unterminated string under label '{}'", label);
                }

                if value.is_some() {
                    tracing::warn!("Label '{}' has more than one string, ignoring extras", label);
                } else {
                    let mut text = translate_escapes(&span.text);
                    collapse_interior(&mut text);
                    value = Some((text, span.extra));
                }
            }

            if is_end(&line) {
                closed = true;
                break;
            }
        }

        if !closed {
            return Err(Error::MissingEnd { label });
        }

        if !duplicate {
            let (text, speech) = value.unwrap_or_default();
            parsed.records.push(StringRecord::new(label, text).with_speech(speech));
        }
    }

    tracing::debug!(
        "Parsed {} string records (longest label {})",
        parsed.records.len(),
        parsed.max_label_len
    );

    Ok(parsed)
}

/// Write records in the legacy format.
///
/// Text is escaped with [`encode_escapes`]. A cue ending in a digit will
/// come back with an `e` appended when the file is parsed again.
pub fn write_str<W: Write>(mut writer: W, records: &[StringRecord]) -> Result<()> {
    for record in records {
        writer.write_all(&encode_escapes(&record.label))?;
        writer.write_all(b"\n\"")?;
        writer.write_all(&encode_escapes(&record.text))?;
        writer.write_all(b"\"")?;
        if !record.speech.is_empty() {
            writer.write_all(b" = ")?;
            writer.write_all(record.speech.as_bytes())?;
        }
        writer.write_all(b"\nEND\n\n")?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn parse(data: &str) -> Result<ParsedStrings> {
        parse_str(Cursor::new(data.as_bytes().to_vec()), 0)
    }

    #[test]
    fn test_parse_basic_record() {
        let parsed = parse("LABEL_A\n\"Hello \\\"World\\\"\" = VoiceLine1\nEND\n").unwrap();

        assert_eq!(parsed.records.len(), 1);
        let record = &parsed.records[0];
        assert_eq!(record.label, "LABEL_A");
        assert_eq!(&*record.text, "Hello \"World\"");
        assert_eq!(record.speech, "VoiceLine1e");
        assert_eq!(parsed.max_label_len, 7);
    }

    #[test]
    fn test_comments_and_blanks_parse_to_nothing() {
        let parsed = parse("// comment\n\n   \n// another\r\n").unwrap();
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_crlf_and_indentation() {
        let parsed = parse("  GUI:OK  \r\n\t\"OK\"\r\n  end \r\n").unwrap();
        assert_eq!(parsed.records[0].label, "GUI:OK");
        assert_eq!(&*parsed.records[0].text, "OK");
        assert_eq!(parsed.records[0].speech, "");
    }

    #[test]
    fn test_escapes_and_whitespace() {
        let parsed = parse("L\n\"  Line one \\n  line\\ttwo   \"\nEND\n").unwrap();
        assert_eq!(&*parsed.records[0].text, "Line one\nline\ttwo");
    }

    #[test]
    fn test_multiline_string() {
        let parsed = parse("L\n\"first\nsecond\" = cue\nEND\n").unwrap();
        assert_eq!(&*parsed.records[0].text, "first second");
        assert_eq!(parsed.records[0].speech, "cue");
    }

    #[test]
    fn test_second_string_does_not_overwrite() {
        init_tracing();
        let parsed = parse("L\n\"first\"\n\"second\"\nEND\n").unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(&*parsed.records[0].text, "first");
    }

    #[test]
    fn test_label_without_string() {
        let parsed = parse("EMPTY\nEND\n").unwrap();
        assert_eq!(parsed.records[0].label, "EMPTY");
        assert_eq!(&*parsed.records[0].text, "");
    }

    #[test]
    fn test_duplicate_label_first_wins() {
        init_tracing();
        let parsed = parse("A\n\"one\"\nEND\na\n\"two\"\nEND\nB\n\"three\"\nEND\n").unwrap();
        let labels: Vec<&str> = parsed.records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["A", "B"]);
        assert_eq!(&*parsed.records[0].text, "one");
    }

    #[test]
    fn test_missing_end_fails() {
        let err = parse("A\n\"one\"\nEND\nB\n\"two\"\n").unwrap_err();
        assert!(matches!(err, Error::MissingEnd { label } if label == "B"));
    }

    #[test]
    fn test_count_adds_margin() {
        let data = "A\n\"a\"\nEND\nB\n\"b\"\nend\n// END\n";
        let count = count_str_records(Cursor::new(data.as_bytes())).unwrap();
        assert_eq!(count, 2 + STR_COUNT_MARGIN);
    }

    #[test]
    fn test_count_skips_end_inside_string() {
        let data = "A\n\"first\nEND\nlast\"\nEND\nB\n\"b\"\nEND\n";
        let count = count_str_records(Cursor::new(data.as_bytes())).unwrap();
        assert_eq!(count, 2 + STR_COUNT_MARGIN);

        let parsed = parse(data).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(&*parsed.records[0].text, "first END last");
    }

    #[test]
    fn test_max_label_len_counts_raw_bytes() {
        let data = b"Caf\xe9\n\"x\"\nEND\n";
        let parsed = parse_str(Cursor::new(&data[..]), 0).unwrap();
        assert_eq!(parsed.records[0].label, "Caf\u{e9}");
        assert_eq!(parsed.max_label_len, 4);
    }

    #[test]
    fn test_write_then_parse() {
        let records = vec![
            StringRecord::new("GUI:Quote", "Say \"hi\"\tnow\nplease").with_speech("hello_e"),
            StringRecord::new("GUI:Plain", "Plain"),
        ];
        let mut out = Vec::new();
        write_str(&mut out, &records).unwrap();

        let parsed = parse_str(Cursor::new(out), 0).unwrap();
        assert_eq!(parsed.records, records);
    }
}

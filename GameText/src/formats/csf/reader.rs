//! `.csf` file reading and parsing

use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashSet;
use std::io::{self, Cursor, Read};

use super::{CSF_HEADER_SIZE, CSF_ID, CSF_LABEL, CSF_STRING, CSF_STRING_WITH_WAVE, CsfHeader};
use crate::error::{Error, Result};
use crate::formats::codec::decode_compiled_units;
use crate::formats::whitespace::collapse_interior;
use crate::formats::{ParsedStrings, latin1};
use crate::table::StringRecord;

/// Read and validate the 24-byte header.
///
/// # Errors
///
/// Returns [`Error::InvalidCsfMagic`] if the tag is wrong and
/// [`Error::TruncatedRecord`] if fewer than 24 bytes are available.
pub fn read_csf_header<R: Read>(reader: &mut R) -> Result<CsfHeader> {
    let mut raw = [0u8; CSF_HEADER_SIZE];
    reader
        .read_exact(&mut raw)
        .map_err(|e| Error::truncated(e, "CSF header"))?;

    let mut cursor = Cursor::new(&raw[..]);
    let id = cursor.read_u32::<LittleEndian>()?;
    if id != CSF_ID {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&raw[..4]);
        return Err(Error::InvalidCsfMagic(magic));
    }

    let version = cursor.read_u32::<LittleEndian>()?;
    let num_labels = cursor.read_u32::<LittleEndian>()?;
    let num_strings = cursor.read_u32::<LittleEndian>()?;
    let _reserved = cursor.read_u32::<LittleEndian>()?;
    let language_id = cursor.read_u32::<LittleEndian>()?;

    Ok(CsfHeader {
        version,
        num_labels,
        num_strings,
        language_id,
    })
}

/// Read a block tag. `None` when fewer than four bytes remain.
fn read_tag<R: Read>(reader: &mut R) -> io::Result<Option<u32>> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => return Ok(None),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(Some(u32::from_le_bytes(buf)))
}

fn read_len<R: Read>(reader: &mut R, context: &str) -> Result<usize> {
    reader
        .read_u32::<LittleEndian>()
        .map(|len| len as usize)
        .map_err(|e| Error::truncated(e, context))
}

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_bytes<R: Read>(reader: &mut R, len: usize, context: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(len as u64).read_to_end(&mut buf)?;
    if buf.len() == len {
        Ok(buf)
    } else {
        Err(Error::TruncatedRecord {
            context: context.to_string(),
        })
    }
}

/// Parse a compiled string file, header included.
///
/// Only the first variant of each label is kept; later variants are read to
/// advance past them. A label repeated case-insensitively keeps its first
/// block; later blocks are read and dropped. The block list ends at end of data or at the first tag
/// that is not a label tag.
///
/// # Errors
///
/// Returns [`Error::InvalidCsfMagic`] for a bad header,
/// [`Error::UnknownStringTag`] for an unrecognized variant tag, and
/// [`Error::TruncatedRecord`] if the data ends inside a block. Nothing
/// parsed before the error is returned.
pub fn parse_csf<R: Read>(mut reader: R) -> Result<ParsedStrings> {
    let header = read_csf_header(&mut reader)?;
    let mut parsed = ParsedStrings::with_capacity(header.num_labels as usize);
    parsed.language_id = header.effective_language_id();
    let mut seen = HashSet::new();
    let mut blocks = 0usize;

    while let Some(tag) = read_tag(&mut reader)? {
        if tag != CSF_LABEL {
            tracing::debug!("Stopping at non-label tag {:#010x}", tag);
            break;
        }

        let num_variants = read_len(&mut reader, "label variant count")?;
        let label_len = read_len(&mut reader, "label length")?;
        let raw_label = read_bytes(&mut reader, label_len, "label")?;
        parsed.note_label(&raw_label);
        let label = latin1(&raw_label);

        let mut record = StringRecord::new(label, "");

        for variant in 0..num_variants {
            let tag = reader
                .read_u32::<LittleEndian>()
                .map_err(|e| Error::truncated(e, format!("variant tag of '{}'", record.label)))?;
            if tag != CSF_STRING && tag != CSF_STRING_WITH_WAVE {
                return Err(Error::UnknownStringTag {
                    label: record.label,
                    tag,
                });
            }

            let units = read_len(&mut reader, "text length")?;
            let raw = read_bytes(&mut reader, units.saturating_mul(2), "text")?;

            if variant == 0 {
                let mut text = decode_compiled_units(&raw);
                collapse_interior(&mut text);
                record.text = text.into();
            } else {
                tracing::trace!("Skipping variant {} of '{}'", variant, record.label);
            }

            if tag == CSF_STRING_WITH_WAVE {
                let cue_len = read_len(&mut reader, "speech length")?;
                let cue = read_bytes(&mut reader, cue_len, "speech")?;
                if variant == 0 {
                    record.speech = latin1(&cue);
                }
            }
        }

        blocks += 1;
        let duplicate = !seen.insert(record.label.to_ascii_lowercase());
        #[cfg(feature = "strict-labels")]
        debug_assert!(!duplicate, "duplicate label '{}'", record.label);
        if duplicate {
            tracing::warn!("Duplicate label '{}', keeping the first definition", record.label);
        } else {
            parsed.records.push(record);
        }
    }

    if blocks != header.num_labels as usize {
        tracing::warn!(
            "CSF header declares {} labels, found {}",
            header.num_labels,
            blocks
        );
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::codec::encode_compiled_units;
    use crate::table::StringTable;
    use byteorder::WriteBytesExt;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn header(version: u32, labels: u32, language: u32) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b" FSC");
        for value in [version, labels, labels, 0, language] {
            out.write_u32::<LittleEndian>(value).unwrap();
        }
        out
    }

    fn label(out: &mut Vec<u8>, name: &str, variants: u32) {
        out.extend_from_slice(b" LBL");
        out.write_u32::<LittleEndian>(variants).unwrap();
        out.write_u32::<LittleEndian>(name.len() as u32).unwrap();
        out.extend_from_slice(name.as_bytes());
    }

    fn string(out: &mut Vec<u8>, text: &str, cue: Option<&str>) {
        out.extend_from_slice(if cue.is_some() { b"WRTS" } else { b" RTS" });
        out.write_u32::<LittleEndian>(text.encode_utf16().count() as u32).unwrap();
        out.extend_from_slice(&encode_compiled_units(text));
        if let Some(cue) = cue {
            out.write_u32::<LittleEndian>(cue.len() as u32).unwrap();
            out.extend_from_slice(cue.as_bytes());
        }
    }

    #[test]
    fn test_header_fields() {
        let data = header(3, 7, 2);
        let header = read_csf_header(&mut Cursor::new(data)).unwrap();
        assert_eq!(header.version, 3);
        assert_eq!(header.num_labels, 7);
        assert_eq!(header.effective_language_id(), 2);
    }

    #[test]
    fn test_version_one_ignores_language() {
        let data = header(1, 0, 5);
        let header = read_csf_header(&mut Cursor::new(data)).unwrap();
        assert_eq!(header.effective_language_id(), 0);
    }

    #[test]
    fn test_bad_magic() {
        let mut data = header(3, 0, 0);
        data[..4].copy_from_slice(b"LOCA");
        let err = parse_csf(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::InvalidCsfMagic(m) if &m == b"LOCA"));
    }

    #[test]
    fn test_short_header_is_truncated() {
        let err = parse_csf(Cursor::new(b" FSC\x03\x00".to_vec())).unwrap_err();
        assert!(matches!(err, Error::TruncatedRecord { .. }));
    }

    #[test]
    fn test_parse_records() {
        let mut data = header(3, 2, 0);
        label(&mut data, "GUI:OK", 1);
        string(&mut data, "  OK  ", None);
        label(&mut data, "DLG:Hello", 2);
        string(&mut data, "Hello \u{4e16}", Some("hello01"));
        string(&mut data, "Alternate", Some("alt"));

        let parsed = parse_csf(Cursor::new(data)).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(&*parsed.records[0].text, "OK");
        assert_eq!(parsed.records[0].speech, "");
        assert_eq!(&*parsed.records[1].text, "Hello \u{4e16}");
        assert_eq!(parsed.records[1].speech, "hello01");
        assert_eq!(parsed.max_label_len, "DLG:Hello".len());
    }

    #[test]
    fn test_duplicate_label_keeps_first() {
        init_tracing();
        let mut data = header(3, 3, 0);
        label(&mut data, "A", 1);
        string(&mut data, "one", None);
        label(&mut data, "a", 1);
        string(&mut data, "two", Some("two_cue"));
        label(&mut data, "B", 1);
        string(&mut data, "b", None);

        let table = StringTable::from_parsed(parse_csf(Cursor::new(data)).unwrap());
        assert_eq!(table.len(), 2);
        assert_eq!(&*table.get("A").unwrap().text, "one");
        assert_eq!(&*table.get("a").unwrap().text, "one");
        assert_eq!(table.get("a").unwrap().speech, "");
        assert_eq!(&*table.get("B").unwrap().text, "b");
    }

    #[test]
    fn test_max_label_len_counts_raw_bytes() {
        let mut data = header(3, 1, 0);
        data.extend_from_slice(b" LBL");
        data.write_u32::<LittleEndian>(1).unwrap();
        data.write_u32::<LittleEndian>(4).unwrap();
        data.extend_from_slice(b"Caf\xe9");
        string(&mut data, "x", None);

        let parsed = parse_csf(Cursor::new(data)).unwrap();
        assert_eq!(parsed.records[0].label, "Caf\u{e9}");
        assert_eq!(parsed.max_label_len, 4);
    }

    #[test]
    fn test_stops_at_foreign_tag() {
        let mut data = header(3, 1, 0);
        label(&mut data, "A", 1);
        string(&mut data, "a", None);
        data.extend_from_slice(b"JUNKtrailing bytes");

        let parsed = parse_csf(Cursor::new(data)).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_partial_tag_ends_blocks() {
        let mut data = header(3, 1, 0);
        label(&mut data, "A", 1);
        string(&mut data, "a", None);
        data.extend_from_slice(b" L");

        let parsed = parse_csf(Cursor::new(data)).unwrap();
        assert_eq!(parsed.records.len(), 1);
    }

    #[test]
    fn test_truncated_text_fails() {
        let mut data = header(3, 1, 0);
        label(&mut data, "A", 1);
        string(&mut data, "abcdef", None);
        data.truncate(data.len() - 3);

        let err = parse_csf(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::TruncatedRecord { .. }));
    }

    #[test]
    fn test_unknown_variant_tag_fails() {
        let mut data = header(3, 1, 0);
        label(&mut data, "A", 1);
        data.extend_from_slice(b"XXXX");

        let err = parse_csf(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::UnknownStringTag { label, .. } if label == "A"));
    }
}

//! `.csf` file writing

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use super::{CSF_ID, CSF_LABEL, CSF_STRING, CSF_STRING_WITH_WAVE, CSF_VERSION};
use crate::error::Result;
use crate::formats::codec::encode_compiled_units;
use crate::table::StringRecord;

/// Narrow a label or cue back to single bytes (`?` outside Latin-1).
fn narrow(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Write records as a compiled string file.
///
/// Each record becomes one label block with a single variant, `STRW` when
/// the record has a speech cue and `STR ` otherwise.
pub fn write_csf<W: Write>(mut writer: W, records: &[StringRecord], language_id: u32) -> Result<()> {
    let count = records.len() as u32;

    writer.write_u32::<LittleEndian>(CSF_ID)?;
    writer.write_u32::<LittleEndian>(CSF_VERSION)?;
    writer.write_u32::<LittleEndian>(count)?; // labels
    writer.write_u32::<LittleEndian>(count)?; // strings
    writer.write_u32::<LittleEndian>(0)?;
    writer.write_u32::<LittleEndian>(language_id)?;

    for record in records {
        let label = narrow(&record.label);
        writer.write_u32::<LittleEndian>(CSF_LABEL)?;
        writer.write_u32::<LittleEndian>(1)?;
        writer.write_u32::<LittleEndian>(label.len() as u32)?;
        writer.write_all(&label)?;

        let has_speech = !record.speech.is_empty();
        let tag = if has_speech { CSF_STRING_WITH_WAVE } else { CSF_STRING };
        writer.write_u32::<LittleEndian>(tag)?;
        writer.write_u32::<LittleEndian>(record.text.encode_utf16().count() as u32)?;
        writer.write_all(&encode_compiled_units(&record.text))?;

        if has_speech {
            let speech = narrow(&record.speech);
            writer.write_u32::<LittleEndian>(speech.len() as u32)?;
            writer.write_all(&speech)?;
        }
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::csf::parse_csf;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn test_header_bytes_on_disk() {
        let mut out = Vec::new();
        write_csf(&mut out, &[], 0).unwrap();
        assert_eq!(out.len(), 24);
        assert_eq!(&out[..4], b" FSC");
    }

    #[test]
    fn test_block_tags_on_disk() {
        let mut out = Vec::new();
        let records = [StringRecord::new("A", "x").with_speech("cue")];
        write_csf(&mut out, &records, 0).unwrap();

        assert_eq!(&out[24..28], b" LBL");
        // tag, variants, label length, label
        assert_eq!(&out[37..41], b"WRTS");
    }

    #[test]
    fn test_write_then_parse() {
        let records = vec![
            StringRecord::new("GUI:OK", "OK"),
            StringRecord::new("DLG:Line", "Caf\u{e9} \u{4e16}\u{754c}\nnext").with_speech("dlg_line_2"),
        ];
        let mut out = Vec::new();
        write_csf(&mut out, &records, 4).unwrap();

        let parsed = parse_csf(Cursor::new(out)).unwrap();
        assert_eq!(parsed.records, records);
        assert_eq!(parsed.language_id, 4);
    }
}

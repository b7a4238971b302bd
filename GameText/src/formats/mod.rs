//! String file formats
//!
//! - **STR** - legacy line-oriented text (`LABEL`, `"text" = cue`, `END`)
//! - **CSF** - compiled tagged binary with bit-inverted UTF-16 text

pub mod codec;
pub mod csf;
pub mod reader;
pub mod str_file;
pub mod whitespace;

use crate::table::StringRecord;

pub use csf::{CsfHeader, parse_csf, read_csf_header, write_csf};
pub use str_file::{STR_COUNT_MARGIN, count_str_records, parse_str, write_str};

/// Output of either parser
#[derive(Debug, Clone, Default)]
pub struct ParsedStrings {
    /// Records in file order
    pub records: Vec<StringRecord>,
    /// Length in bytes of the longest label seen
    pub max_label_len: usize,
    /// Language id from the compiled header (0 for legacy files)
    pub language_id: u32,
}

impl ParsedStrings {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Record a label's raw length, counted before any widening.
    fn note_label(&mut self, raw: &[u8]) {
        self.max_label_len = self.max_label_len.max(raw.len());
    }
}

/// Widen single-byte text to a `String`, one code point per byte.
pub(crate) fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

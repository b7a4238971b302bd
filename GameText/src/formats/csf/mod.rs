//! Compiled string file (`.csf`) format
//!
//! Little-endian throughout. A 24-byte header is followed by label blocks:
//!
//! ```text
//! header:  tag " FSC" | version | label count | string count | reserved | language id
//! label:   tag " LBL" | variant count | label length | label bytes
//! variant: tag " RTS" | unit count | UTF-16 units (bit-inverted)
//!        | tag "WRTS" | unit count | UTF-16 units | cue length | cue bytes
//! ```
//!
//! Tags are four-character codes stored as little-endian integers, which is
//! why they read backwards on disk.

mod reader;
mod writer;

pub use reader::{parse_csf, read_csf_header};
pub use writer::write_csf;

/// Build a tag from its four characters, most significant first.
const fn fourcc(id: &[u8; 4]) -> u32 {
    u32::from_be_bytes(*id)
}

/// File tag (`" FSC"` on disk)
pub const CSF_ID: u32 = fourcc(b"CSF ");
/// Label block tag (`" LBL"` on disk)
pub const CSF_LABEL: u32 = fourcc(b"LBL ");
/// Plain text variant tag (`" RTS"` on disk)
pub const CSF_STRING: u32 = fourcc(b"STR ");
/// Text variant followed by a speech cue (`"WRTS"` on disk)
pub const CSF_STRING_WITH_WAVE: u32 = fourcc(b"STRW");

/// Header size in bytes
pub const CSF_HEADER_SIZE: usize = 24;

/// Version written by [`write_csf`]
pub const CSF_VERSION: u32 = 3;

/// Fixed-size file header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsfHeader {
    pub version: u32,
    /// Declared number of label blocks
    pub num_labels: u32,
    /// Declared number of string variants
    pub num_strings: u32,
    /// Language id; only meaningful when `version > 1`
    pub language_id: u32,
}

impl CsfHeader {
    /// Language id honoring the version rule (0 for version 1 files).
    pub fn effective_language_id(&self) -> u32 {
        if self.version > 1 { self.language_id } else { 0 }
    }
}

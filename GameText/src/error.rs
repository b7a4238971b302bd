//! Error types for `GameText`

use thiserror::Error;

/// The error type for `GameText` operations.
///
/// Parse failures never escape [`TextManager`](crate::TextManager) lifecycle
/// calls; they are logged and turned into the "no text loaded" state. The
/// format functions in [`formats`](crate::formats) return them directly.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file service could not open the requested path.
    #[error("file not found: {path}")]
    FileNotFound {
        /// The path as passed to the file service.
        path: String,
    },

    // ==================== CSF Format Errors ====================
    /// The file does not start with the compiled string file tag.
    #[error("invalid CSF magic: expected \" FSC\", found {0:?}")]
    InvalidCsfMagic([u8; 4]),

    /// A label block carried a string variant tag other than `STR ` or `STRW`.
    #[error("unknown string tag {tag:#010x} under label '{label}'")]
    UnknownStringTag {
        /// Label whose variant list was being read.
        label: String,
        /// The tag value as read (little-endian).
        tag: u32,
    },

    /// The file ended in the middle of a block.
    #[error("truncated record: {context}")]
    TruncatedRecord {
        /// What was being read when the data ran out.
        context: String,
    },

    // ==================== STR Format Errors ====================
    /// The file ended before the `END` line of a label.
    #[error("missing END for label '{label}'")]
    MissingEnd {
        /// The label left open at end of file.
        label: String,
    },

    // ==================== Manager Errors ====================
    /// A table resolved to zero records.
    #[error("string table is empty")]
    EmptyTable,

    // ==================== Config Errors ====================
    /// The configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Map an IO error raised mid-block into [`Error::TruncatedRecord`] when
    /// it signals end of data, keeping every other IO error as-is.
    pub(crate) fn truncated(err: std::io::Error, context: impl Into<String>) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::TruncatedRecord {
                context: context.into(),
            }
        } else {
            Self::Io(err)
        }
    }
}

/// Result type alias for `GameText` operations.
pub type Result<T> = std::result::Result<T, Error>;

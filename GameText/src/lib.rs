//! # GameText
//!
//! Game string tables: load label-to-text mappings from legacy `.str` text
//! files or compiled `.csf` files, look them up by case-insensitive label,
//! and layer a replaceable per-map table over the main one.
//!
//! ## Supported Formats
//!
//! - **STR** - line-oriented text with escapes and speech cues
//! - **CSF** - tagged binary with bit-inverted UTF-16 text
//!
//! ## Quick Start
//!
//! ```no_run
//! use gametext::prelude::*;
//!
//! let mut text = TextManager::new(LocalFileSystem::new("game"), TextConfig::default());
//! text.initialize();
//!
//! let ok = text.fetch("GUI:OK");
//! println!("{} (found: {})", ok.text, ok.found);
//!
//! text.initialize_map_strings("maps/Alpine Assault/map.str")?;
//! for label in text.find_labels_with_prefix("MAP:") {
//!     println!("{label}");
//! }
//! text.reset();
//! # Ok::<(), gametext::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `gametext` command-line binary
//! - `strict-labels` - Debug-assert on duplicate labels in `.str` files

pub mod config;
pub mod error;
pub mod formats;
pub mod fs;
pub mod index;
pub mod manager;
pub mod table;
pub mod utils;

// Re-exports for convenience
pub use config::TextConfig;
pub use error::{Error, Result};
pub use manager::{FATAL_PLACEHOLDER, Fetched, StringFormat, TextManager};
pub use table::{StringRecord, StringTable};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::TextConfig;
    pub use crate::error::{Error, Result};
    pub use crate::formats::{
        CsfHeader, ParsedStrings, parse_csf, parse_str, read_csf_header, write_csf, write_str,
    };
    pub use crate::fs::{FileSystem, LocalFileSystem, MemoryFileSystem, OpenMode};
    pub use crate::index::{LookupIndex, compare_labels};
    pub use crate::manager::{FATAL_PLACEHOLDER, Fetched, StringFormat, TextManager};
    pub use crate::table::{StringRecord, StringTable};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

//! File service used to open string files
//!
//! The manager only needs "open this path for reading"; a missing file is a
//! normal answer (`None`), not an error.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use crate::utils::normalize_path;

/// How a file is opened. Both modes read raw bytes; the distinction is kept
/// for file services that translate line endings in text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Text,
    Binary,
}

/// Byte-oriented read access to named files.
pub trait FileSystem {
    /// Open `path` for reading, `None` if it does not exist or cannot be opened.
    fn open(&self, path: &str, mode: OpenMode) -> Option<Box<dyn Read + '_>>;

    /// Whether `path` can be opened.
    fn exists(&self, path: &str) -> bool {
        self.open(path, OpenMode::Binary).is_some()
    }
}

/// Files on disk under a root directory.
///
/// Game-style paths (`data\English\Generals.csf`) are accepted with either
/// separator.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a game path against the root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        normalize_path(path)
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

impl FileSystem for LocalFileSystem {
    fn open(&self, path: &str, mode: OpenMode) -> Option<Box<dyn Read + '_>> {
        let resolved = self.resolve(path);
        match File::open(&resolved) {
            Ok(file) => {
                tracing::debug!("Opened {} ({:?})", resolved.display(), mode);
                Some(Box::new(BufReader::new(file)))
            }
            Err(e) => {
                tracing::debug!("Cannot open {}: {}", resolved.display(), e);
                None
            }
        }
    }
}

/// In-memory files keyed by normalized, lowercased path.
///
/// Useful when string files already live in memory (read out of an archive)
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(path: &str) -> String {
        normalize_path(path).to_ascii_lowercase()
    }

    /// Add or replace a file.
    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) {
        self.files.insert(Self::key(path), data.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: &str, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileSystem for MemoryFileSystem {
    fn open(&self, path: &str, _mode: OpenMode) -> Option<Box<dyn Read + '_>> {
        self.files
            .get(&Self::key(path))
            .map(|data| Box::new(Cursor::new(data.as_slice())) as Box<dyn Read + '_>)
    }
}

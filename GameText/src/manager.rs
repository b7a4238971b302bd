//! Main/map string tables and the label fetch API
//!
//! The manager owns both tables and a cache of "missing string"
//! placeholders. Fetching never fails: unknown labels produce a placeholder
//! and `found == false`.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TextConfig;
use crate::error::{Error, Result};
use crate::formats::{count_str_records, parse_csf, parse_str, read_csf_header};
use crate::fs::{FileSystem, OpenMode};
use crate::table::StringTable;

/// Returned for every fetch while no main table is loaded.
pub const FATAL_PLACEHOLDER: &str = "***FATAL*** String Manager failed to initialize properly";

/// Which on-disk format a table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    /// Legacy line-oriented `.str`
    Str,
    /// Compiled `.csf`
    Csf,
}

/// Result of [`TextManager::fetch`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub text: Rc<str>,
    /// `false` when `text` is a placeholder
    pub found: bool,
}

/// Owns the main and map string tables and serves text by label.
///
/// Single-threaded: the missing-string cache uses interior mutability so
/// that [`fetch`](Self::fetch) only needs `&self`.
pub struct TextManager<F> {
    fs: F,
    config: TextConfig,
    initialized: bool,
    format: Option<StringFormat>,
    main: Option<StringTable>,
    map: Option<StringTable>,
    missing: RefCell<IndexMap<String, Rc<str>>>,
    failed: Rc<str>,
    title: Option<Rc<str>>,
    max_label_len: usize,
}

impl<F: FileSystem> TextManager<F> {
    pub fn new(fs: F, config: TextConfig) -> Self {
        Self {
            fs,
            config,
            initialized: false,
            format: None,
            main: None,
            map: None,
            missing: RefCell::new(IndexMap::new()),
            failed: Rc::from(FATAL_PLACEHOLDER),
            title: None,
            max_label_len: 0,
        }
    }

    /// Load the main table. Calling it again while initialized does nothing.
    ///
    /// The legacy file is tried first when enabled and present, then the
    /// compiled file. If neither can be read, or the table would be empty,
    /// the manager stays without a main table and every fetch returns
    /// [`FATAL_PLACEHOLDER`]. A file that fails to parse is discarded
    /// entirely and the manager is torn down.
    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;
        self.max_label_len = 0;

        let string_path = self.config.string_path();
        let csf_path = self.config.csf_path();

        let source = if self.config.use_string_file {
            self.count_string_file(&string_path)
                .map(|count| (StringFormat::Str, string_path.as_str(), count))
        } else {
            None
        };
        let source = source.or_else(|| {
            self.csf_label_count(&csf_path)
                .map(|count| (StringFormat::Csf, csf_path.as_str(), count))
        });

        let Some((format, path, count)) = source else {
            tracing::warn!("No string file found ({} / {})", string_path, csf_path);
            return;
        };

        if count == 0 {
            tracing::warn!("{} declares no strings", path);
            return;
        }

        match self.load_table(format, path, count) {
            Ok(table) => {
                tracing::info!("Loaded {} strings from {} ({:?})", table.len(), path, format);
                self.max_label_len = table.max_label_len();
                self.format = Some(format);
                self.main = Some(table);
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", path, e);
                self.teardown();
                return;
            }
        }

        let title = self.fetch(&self.config.title_label).text;
        self.title = Some(title);
    }

    /// Load (or replace) the map table from a legacy `.str` file.
    ///
    /// On failure the previous map table is gone and no partial table is
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if the file cannot be opened, or the
    /// parse error.
    pub fn initialize_map_strings(&mut self, path: &str) -> Result<usize> {
        self.map = None;

        let count = self.count_string_file(path).ok_or_else(|| Error::FileNotFound {
            path: path.to_string(),
        })?;
        let table = self.load_table(StringFormat::Str, path, count)?;

        tracing::info!("Loaded {} map strings from {}", table.len(), path);
        self.max_label_len = self.max_label_len.max(table.max_label_len());
        let len = table.len();
        self.map = Some(table);
        Ok(len)
    }

    /// Drop the map table. The main table is untouched.
    pub fn reset(&mut self) {
        self.map = None;
    }

    /// Drop everything and return to the uninitialized state. Safe to call
    /// any number of times.
    ///
    /// The map table goes too, so a later [`Self::initialize`] never finds a
    /// stale map layered over a fresh main table.
    pub fn teardown(&mut self) {
        self.main = None;
        self.map = None;
        self.format = None;
        self.title = None;
        self.missing.borrow_mut().clear();
        self.max_label_len = 0;
        self.initialized = false;
    }

    /// Look up `label` in the main table, then the map table.
    ///
    /// On a miss the text is `MISSING: '<label>'`, cached so that repeated
    /// misses share one allocation. Without a main table the text is
    /// [`FATAL_PLACEHOLDER`].
    pub fn fetch(&self, label: &str) -> Fetched {
        let Some(main) = &self.main else {
            return Fetched {
                text: Rc::clone(&self.failed),
                found: false,
            };
        };

        let record = main
            .get(label)
            .or_else(|| self.map.as_ref().and_then(|map| map.get(label)));

        match record {
            Some(record) => Fetched {
                text: Rc::clone(&record.text),
                found: true,
            },
            None => Fetched {
                text: self.missing_text(label),
                found: false,
            },
        }
    }

    /// Stored text for `label`, or `substitute` when it is not found. Does
    /// not touch the missing-string cache.
    pub fn fetch_or_substitute(&self, label: &str, substitute: &str) -> Rc<str> {
        let fetched = self.find(label);
        fetched.unwrap_or_else(|| Rc::from(substitute))
    }

    fn find(&self, label: &str) -> Option<Rc<str>> {
        let main = self.main.as_ref()?;
        main.get(label)
            .or_else(|| self.map.as_ref().and_then(|map| map.get(label)))
            .map(|record| Rc::clone(&record.text))
    }

    fn missing_text(&self, label: &str) -> Rc<str> {
        let message = format!("MISSING: '{label}'");
        let mut missing = self.missing.borrow_mut();

        if let Some(text) = missing.get(&message) {
            return Rc::clone(text);
        }

        tracing::debug!("Missing string '{}'", label);
        let text: Rc<str> = Rc::from(message.as_str());
        missing.insert(message, Rc::clone(&text));
        text
    }

    /// Labels starting with `prefix` (exact, case-sensitive): main table
    /// matches in sorted order, then map table matches in sorted order.
    pub fn find_labels_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut labels = Vec::new();
        for table in [&self.main, &self.map].into_iter().flatten() {
            labels.extend(table.labels_with_prefix(prefix));
        }
        labels
    }

    /// Placeholders synthesized so far, oldest first.
    pub fn missing_strings(&self) -> Vec<Rc<str>> {
        self.missing.borrow().values().cloned().collect()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether a main table is loaded.
    pub fn is_loaded(&self) -> bool {
        self.main.is_some()
    }

    pub fn format(&self) -> Option<StringFormat> {
        self.format
    }

    /// Text fetched for the configured title label during initialization.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn text_count(&self) -> usize {
        self.main.as_ref().map_or(0, StringTable::len)
    }

    pub fn map_text_count(&self) -> usize {
        self.map.as_ref().map_or(0, StringTable::len)
    }

    /// Longest label across the main and map tables.
    pub fn max_label_len(&self) -> usize {
        self.max_label_len
    }

    /// Language id of the main table (0 for legacy files).
    pub fn language_id(&self) -> u32 {
        self.main.as_ref().map_or(0, StringTable::language_id)
    }

    pub fn main_table(&self) -> Option<&StringTable> {
        self.main.as_ref()
    }

    pub fn map_table(&self) -> Option<&StringTable> {
        self.map.as_ref()
    }

    pub fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Counting pass over a legacy file, `None` if it cannot be opened or read.
    fn count_string_file(&self, path: &str) -> Option<usize> {
        let reader = self.fs.open(path, OpenMode::Text)?;
        match count_str_records(reader) {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!("Cannot count strings in {}: {}", path, e);
                None
            }
        }
    }

    /// Declared label count from a compiled header, `None` if unusable.
    fn csf_label_count(&self, path: &str) -> Option<usize> {
        let mut reader = self.fs.open(path, OpenMode::Binary)?;
        match read_csf_header(&mut reader) {
            Ok(header) => Some(header.num_labels as usize),
            Err(e) => {
                tracing::warn!("Bad CSF header in {}: {}", path, e);
                None
            }
        }
    }

    fn load_table(&self, format: StringFormat, path: &str, count: usize) -> Result<StringTable> {
        let mode = match format {
            StringFormat::Str => OpenMode::Text,
            StringFormat::Csf => OpenMode::Binary,
        };
        let reader = self.fs.open(path, mode).ok_or_else(|| Error::FileNotFound {
            path: path.to_string(),
        })?;

        let parsed = match format {
            StringFormat::Str => parse_str(reader, count)?,
            StringFormat::Csf => parse_csf(reader)?,
        };

        Ok(StringTable::from_parsed(parsed))
    }
}

//! String records and the indexed table that owns them

use std::rc::Rc;

use crate::formats::ParsedStrings;
use crate::index::LookupIndex;

/// A single label/text/speech entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringRecord {
    /// Case-insensitive identifier (e.g. `"GUI:OK"`)
    pub label: String,
    /// Display text
    pub text: Rc<str>,
    /// Speech cue identifier, empty when the entry has none
    pub speech: String,
}

impl StringRecord {
    pub fn new(label: impl Into<String>, text: impl AsRef<str>) -> Self {
        Self {
            label: label.into(),
            text: Rc::from(text.as_ref()),
            speech: String::new(),
        }
    }

    #[must_use]
    pub fn with_speech(mut self, speech: impl Into<String>) -> Self {
        self.speech = speech.into();
        self
    }
}

/// Records of one string file plus their sorted lookup index.
///
/// The record array and the index are built together and dropped together;
/// a table is never observable with one but not the other.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    records: Vec<StringRecord>,
    index: LookupIndex,
    max_label_len: usize,
    language_id: u32,
}

impl StringTable {
    /// Take ownership of parsed records and build the index.
    pub fn from_parsed(parsed: ParsedStrings) -> Self {
        let ParsedStrings {
            mut records,
            max_label_len,
            language_id,
        } = parsed;
        records.shrink_to_fit();
        let index = LookupIndex::build(&records);

        Self {
            records,
            index,
            max_label_len,
            language_id,
        }
    }

    /// Build a table from records directly (longest label computed here).
    pub fn from_records(records: Vec<StringRecord>) -> Self {
        let max_label_len = records.iter().map(|r| r.label.len()).max().unwrap_or(0);
        Self::from_parsed(ParsedStrings {
            records,
            max_label_len,
            language_id: 0,
        })
    }

    /// Look up a record by label, ignoring case.
    pub fn get(&self, label: &str) -> Option<&StringRecord> {
        self.index
            .find(&self.records, label)
            .map(|pos| &self.records[pos])
    }

    /// Records in sorted label order.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &StringRecord> + '_ {
        self.index.iter().map(|pos| &self.records[pos])
    }

    /// Labels starting with `prefix` (exact byte match, no case folding), in
    /// sorted order. This walks the whole index; it is not a point lookup.
    pub fn labels_with_prefix<'a>(&'a self, prefix: &str) -> impl Iterator<Item = &'a str> {
        self.iter_sorted()
            .map(|record| record.label.as_str())
            .filter(move |label| label.as_bytes().starts_with(prefix.as_bytes()))
    }

    /// Records in file order.
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Length in bytes of the longest label seen while parsing.
    pub fn max_label_len(&self) -> usize {
        self.max_label_len
    }

    /// Language id from the compiled header, 0 for legacy files.
    pub fn language_id(&self) -> u32 {
        self.language_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StringTable {
        StringTable::from_records(vec![
            StringRecord::new("GUI:OK", "OK"),
            StringRecord::new("GUI:Cancel", "Cancel").with_speech("ui_cancel"),
            StringRecord::new("MENU:OK", "Accept"),
        ])
    }

    #[test]
    fn test_get_ignores_case() {
        let table = sample();
        assert_eq!(&*table.get("gui:cancel").unwrap().text, "Cancel");
        assert_eq!(table.get("GUI:CANCEL").unwrap().speech, "ui_cancel");
        assert!(table.get("GUI:Missing").is_none());
    }

    #[test]
    fn test_prefix_is_case_sensitive_and_sorted() {
        let table = sample();
        let labels: Vec<&str> = table.labels_with_prefix("GUI:").collect();
        assert_eq!(labels, ["GUI:Cancel", "GUI:OK"]);
        assert_eq!(table.labels_with_prefix("gui:").count(), 0);
    }

    #[test]
    fn test_max_label_len() {
        assert_eq!(sample().max_label_len(), "GUI:Cancel".len());
        assert_eq!(StringTable::default().max_label_len(), 0);
    }
}

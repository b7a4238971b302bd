//! Sorted, case-insensitive label index over a record array

use std::cmp::Ordering;

use crate::table::StringRecord;

/// Case-insensitive label ordering, byte by byte (ASCII case folding).
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Lookup array for one table: record positions sorted by label.
///
/// Entries are indices into the owning table's record array, so the index
/// stays valid exactly as long as that array is unchanged. Rebuild it
/// whenever the records are replaced.
#[derive(Debug, Clone, Default)]
pub struct LookupIndex {
    entries: Vec<usize>,
}

impl LookupIndex {
    /// Build an index over `records`, sorted with [`compare_labels`].
    ///
    /// The sort is not stable; equal labels are a malformed-input condition
    /// and which one a lookup lands on is unspecified.
    pub fn build(records: &[StringRecord]) -> Self {
        let mut entries: Vec<usize> = (0..records.len()).collect();
        entries.sort_unstable_by(|&a, &b| compare_labels(&records[a].label, &records[b].label));
        Self { entries }
    }

    /// Binary search for `label`, returning the record position.
    pub fn find(&self, records: &[StringRecord], label: &str) -> Option<usize> {
        self.entries
            .binary_search_by(|&pos| compare_labels(&records[pos].label, label))
            .ok()
            .map(|slot| self.entries[slot])
    }

    /// Record positions in sorted label order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

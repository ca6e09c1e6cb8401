//! Per-column bookkeeping: original name, current name, and the expected
//! header the column is mapped to.

use std::collections::BTreeSet;

/// One source column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedHeader {
    original: String,
    current: String,
    expected: Option<String>,
}

impl TrackedHeader {
    /// Name in the source file.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Name of the column in the dataset right now.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Canonical name of the expected header this column is mapped to.
    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }

    pub fn is_mapped(&self) -> bool {
        self.expected.is_some()
    }
}

/// Ordered view of every source column.
///
/// A column is mapped exactly when its current name is the canonical name
/// of the expected header it maps to; otherwise its current name is its
/// original name. No expected header is mapped twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderTracker {
    entries: Vec<TrackedHeader>,
}

impl HeaderTracker {
    /// Track `headers` in order, all unmapped.
    ///
    /// A repeated header name is tracked once.
    pub fn from_headers<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::new();
        for header in headers {
            let header = header.into();
            if !seen.insert(header.clone()) {
                tracing::warn!(header = %header, "duplicate source header ignored");
                continue;
            }
            entries.push(TrackedHeader {
                current: header.clone(),
                original: header,
                expected: None,
            });
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[TrackedHeader] {
        &self.entries
    }

    pub fn originals(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(TrackedHeader::original)
    }

    pub fn get(&self, original: &str) -> Option<&TrackedHeader> {
        self.entries.iter().find(|e| e.original == original)
    }

    pub fn contains(&self, original: &str) -> bool {
        self.get(original).is_some()
    }

    pub fn current_name(&self, original: &str) -> Option<&str> {
        self.get(original).map(TrackedHeader::current)
    }

    pub fn expected_for(&self, original: &str) -> Option<&str> {
        self.get(original).and_then(TrackedHeader::expected)
    }

    /// Original header mapped to `expected`, if any.
    pub fn original_for(&self, expected: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.expected.as_deref() == Some(expected))
            .map(TrackedHeader::original)
    }

    /// True when some column is mapped to `expected`.
    pub fn is_mapped(&self, expected: &str) -> bool {
        self.original_for(expected).is_some()
    }

    /// Original header whose column is currently named `current`.
    pub fn holder_of(&self, current: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.current == current)
            .map(TrackedHeader::original)
    }

    /// Canonical names of every mapped expected header.
    pub fn mapped_names(&self) -> BTreeSet<&str> {
        self.entries.iter().filter_map(TrackedHeader::expected).collect()
    }

    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_mapped()).count()
    }

    /// `(original, current)` pairs in source order.
    pub fn original_to_current(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|e| (e.original(), e.current()))
    }

    /// `(original, expected)` pairs in source order.
    pub fn original_to_expected(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|e| (e.original(), e.expected()))
    }

    /// Record that `original`'s column was renamed to `expected`.
    ///
    /// Returns false when `original` is not tracked.
    pub fn record_mapping(&mut self, original: &str, expected: &str) -> bool {
        match self.entry_mut(original) {
            Some(entry) => {
                entry.current = expected.to_string();
                entry.expected = Some(expected.to_string());
                true
            }
            None => false,
        }
    }

    /// Record that `original`'s column was renamed back to its original name.
    ///
    /// Returns false when `original` is not tracked.
    pub fn record_unmapping(&mut self, original: &str) -> bool {
        match self.entry_mut(original) {
            Some(entry) => {
                entry.current = entry.original.clone();
                entry.expected = None;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry_mut(&mut self, original: &str) -> Option<&mut TrackedHeader> {
        self.entries.iter_mut().find(|e| e.original == original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unmapped_in_source_order() {
        let tracker = HeaderTracker::from_headers(["first name", "email", "email"]);
        assert_eq!(tracker.len(), 2);
        let pairs: Vec<_> = tracker.original_to_current().collect();
        assert_eq!(pairs, vec![("first name", "first name"), ("email", "email")]);
        assert!(tracker.mapped_names().is_empty());
    }

    #[test]
    fn mapping_and_unmapping_update_current_name() {
        let mut tracker = HeaderTracker::from_headers(["first name", "email"]);
        assert!(tracker.record_mapping("first name", "FirstName"));
        assert_eq!(tracker.current_name("first name"), Some("FirstName"));
        assert_eq!(tracker.original_for("FirstName"), Some("first name"));
        assert_eq!(tracker.holder_of("FirstName"), Some("first name"));
        assert!(tracker.is_mapped("FirstName"));

        assert!(tracker.record_unmapping("first name"));
        assert_eq!(tracker.current_name("first name"), Some("first name"));
        assert!(!tracker.is_mapped("FirstName"));
        assert!(!tracker.record_mapping("phone", "Phone"));
    }
}

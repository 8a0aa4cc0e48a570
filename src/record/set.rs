// Sun Oct 18 2026 - Alex

use std::collections::btree_set;
use std::collections::BTreeSet;

/// Deduplicated collection of trimmed, non-empty records.
///
/// Iteration and the persisted form are in byte-wise lexicographic order.
/// Membership does not depend on that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: BTreeSet<String>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits raw producer output on line boundaries, trims each line and
    /// drops the blank ones.
    pub fn from_lines(raw: &str) -> Self {
        raw.lines().collect()
    }

    /// Inserts a record after trimming it. Returns false for blank input or
    /// a record already present.
    pub fn insert(&mut self, record: &str) -> bool {
        let trimmed = record.trim();
        if trimmed.is_empty() {
            return false;
        }
        if self.records.contains(trimmed) {
            return false;
        }
        self.records.insert(trimmed.to_string())
    }

    pub fn contains(&self, record: &str) -> bool {
        self.records.contains(record.trim())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, String> {
        self.records.iter()
    }

    /// Records in `self` that are not in `other`.
    pub fn difference(&self, other: &RecordSet) -> RecordSet {
        RecordSet {
            records: self.records.difference(&other.records).cloned().collect(),
        }
    }

    pub fn union(&self, other: &RecordSet) -> RecordSet {
        RecordSet {
            records: self.records.union(&other.records).cloned().collect(),
        }
    }

    pub fn intersection(&self, other: &RecordSet) -> RecordSet {
        RecordSet {
            records: self.records.intersection(&other.records).cloned().collect(),
        }
    }

    pub fn extend_from(&mut self, other: &RecordSet) {
        for record in &other.records {
            if !self.records.contains(record) {
                self.records.insert(record.clone());
            }
        }
    }

    /// Sorted records joined by newlines with one trailing newline. An empty
    /// set renders as a lone newline.
    pub fn to_canonical_string(&self) -> String {
        let mut out = String::with_capacity(self.records.iter().map(|r| r.len() + 1).sum::<usize>() + 1);
        for (i, record) in self.records.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(record);
        }
        out.push('\n');
        out
    }
}

impl<'a> FromIterator<&'a str> for RecordSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for line in iter {
            set.insert(line);
        }
        set
    }
}

impl FromIterator<String> for RecordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        for line in iter {
            set.insert(&line);
        }
        set
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a String;
    type IntoIter = btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_trims_and_dedups() {
        let set = RecordSet::from_lines("  b.example.com \n\na.example.com\r\nb.example.com\n   \n");
        assert_eq!(set.len(), 2);
        assert!(set.contains("a.example.com"));
        assert!(set.contains("b.example.com"));
        assert!(!set.contains(""));
    }

    #[test]
    fn test_canonical_form_is_sorted_with_trailing_newline() {
        let set = RecordSet::from_lines("zeta.a\nalpha.a\nmid.a\n");
        assert_eq!(set.to_canonical_string(), "alpha.a\nmid.a\nzeta.a\n");
        assert_eq!(RecordSet::new().to_canonical_string(), "\n");
    }

    #[test]
    fn test_canonical_form_is_idempotent() {
        let set = RecordSet::from_lines("b\na\nc\na\n");
        let first = set.to_canonical_string();
        let reparsed = RecordSet::from_lines(&first);
        assert_eq!(reparsed, set);
        assert_eq!(reparsed.to_canonical_string(), first);
    }

    #[test]
    fn test_set_operations() {
        let a = RecordSet::from_lines("x.a\ny.a\n");
        let b = RecordSet::from_lines("y.a\nz.a\n");

        assert_eq!(a.difference(&b), RecordSet::from_lines("x.a"));
        assert_eq!(a.union(&b), RecordSet::from_lines("x.a\ny.a\nz.a"));
        assert_eq!(a.intersection(&b), RecordSet::from_lines("y.a"));
        assert!(a.difference(&a).is_empty());
    }

    #[test]
    fn test_ordering_is_bytewise() {
        let set = RecordSet::from_lines("b\nB\na\n_\n");
        let ordered: Vec<&str> = set.iter().map(|s| s.as_str()).collect();
        assert_eq!(ordered, vec!["B", "_", "a", "b"]);
    }
}

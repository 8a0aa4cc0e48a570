// Sun Oct 18 2026 - Alex

use crate::record::{RecordError, RecordSet, RecordStore, RunLayout};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    pub total_count: usize,
    pub previous_count: usize,
    pub new_count: usize,
}

/// Folds every source's output into the master file.
///
/// The master only ever grows: it is the union of its previous contents and
/// all source outputs present on disk.
pub struct GlobalAggregator<'a> {
    layout: &'a RunLayout,
}

impl<'a> GlobalAggregator<'a> {
    pub fn new(layout: &'a RunLayout) -> Self {
        Self { layout }
    }

    /// Pure part of the aggregation, no file access.
    pub fn merge<'s, I>(previous: &RecordSet, outputs: I) -> RecordSet
    where
        I: IntoIterator<Item = &'s RecordSet>,
    {
        let mut merged = previous.clone();
        for output in outputs {
            merged.extend_from(output);
        }
        merged
    }

    /// A master that exists but cannot be read is left untouched and the
    /// error is returned.
    pub fn aggregate<S: AsRef<str>>(&self, sources: &[S]) -> Result<AggregateSummary, RecordError> {
        let master_path = self.layout.master();
        let previous = RecordStore::load(&master_path)?;

        let mut outputs = Vec::new();
        for source in sources {
            let path = self.layout.output(source.as_ref());
            match RecordStore::load_existing(&path) {
                Ok(Some(set)) => outputs.push(set),
                Ok(None) => {}
                Err(e) => log::warn!("[{}] {}; skipped during aggregation", source.as_ref(), e),
            }
        }

        let merged = Self::merge(&previous, &outputs);
        RecordStore::save(&master_path, &merged)?;

        let summary = AggregateSummary {
            total_count: merged.len(),
            previous_count: previous.len(),
            new_count: merged.len() - previous.len(),
        };
        log::info!(
            "Master has {} records ({} previously, {} new)",
            summary.total_count,
            summary.previous_count,
            summary.new_count
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RunLayout) {
        let dir = TempDir::new().unwrap();
        let layout = RunLayout::new(dir.path());
        layout.ensure().unwrap();
        (dir, layout)
    }

    #[test]
    fn test_aggregate_from_empty_master() {
        let (_dir, layout) = setup();
        RecordStore::save(&layout.output("a"), &RecordSet::from_lines("x.a\ny.a")).unwrap();
        RecordStore::save(&layout.output("b"), &RecordSet::from_lines("y.a\nz.a")).unwrap();

        let summary = GlobalAggregator::new(&layout).aggregate(&["a", "b", "missing"]).unwrap();

        assert_eq!(summary, AggregateSummary { total_count: 3, previous_count: 0, new_count: 3 });
        assert_eq!(
            RecordStore::load(&layout.master()).unwrap(),
            RecordSet::from_lines("x.a\ny.a\nz.a")
        );
    }

    #[test]
    fn test_master_never_shrinks() {
        let (_dir, layout) = setup();
        RecordStore::save(&layout.master(), &RecordSet::from_lines("old.a\nx.a")).unwrap();
        RecordStore::save(&layout.output("a"), &RecordSet::from_lines("x.a")).unwrap();

        let before = RecordStore::load(&layout.master()).unwrap();
        let summary = GlobalAggregator::new(&layout).aggregate(&["a"]).unwrap();
        let after = RecordStore::load(&layout.master()).unwrap();

        assert_eq!(summary.new_count, 0);
        assert_eq!(summary.previous_count, 2);
        assert_eq!(after.intersection(&before), before);
    }

    #[test]
    fn test_master_with_invalid_utf8_keeps_history() {
        let (_dir, layout) = setup();
        std::fs::write(layout.master(), b"old1.a\nold2.a\ncaf\xE9.a\n").unwrap();
        RecordStore::save(&layout.output("a"), &RecordSet::from_lines("x.a")).unwrap();

        let summary = GlobalAggregator::new(&layout).aggregate(&["a"]).unwrap();
        let after = RecordStore::load(&layout.master()).unwrap();

        assert_eq!(summary.previous_count, 3);
        assert_eq!(summary.total_count, 4);
        assert!(after.contains("old1.a"));
        assert!(after.contains("old2.a"));
        assert!(after.contains("x.a"));
    }

    #[test]
    fn test_unreadable_master_is_not_overwritten() {
        let (_dir, layout) = setup();
        std::fs::create_dir(layout.master()).unwrap();
        std::fs::write(layout.master().join("keep"), "history").unwrap();
        RecordStore::save(&layout.output("a"), &RecordSet::from_lines("x.a")).unwrap();

        let err = GlobalAggregator::new(&layout).aggregate(&["a"]).unwrap_err();

        assert!(matches!(err, RecordError::Read { .. }));
        assert!(layout.master().is_dir());
        assert_eq!(std::fs::read_to_string(layout.master().join("keep")).unwrap(), "history");
    }

    #[test]
    fn test_merge_is_union() {
        let previous = RecordSet::from_lines("p.a");
        let outputs = vec![RecordSet::from_lines("a.a\np.a"), RecordSet::from_lines("b.a")];

        let merged = GlobalAggregator::merge(&previous, &outputs);
        assert_eq!(merged, RecordSet::from_lines("a.a\nb.a\np.a"));
    }
}

// Sun Oct 18 2026 - Alex

use crate::fetch::{FetchError, SourceFetcher};
use crate::record::{RecordError, RecordSet, RecordStore, RunLayout};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileState {
    Pending,
    Fetching,
    Reconciling,
    Persisted,
    Failed,
}

/// Cooperative stop flag shared by every task of a run. Never set unless a
/// caller asks for it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Serialize)]
pub struct ReconcileOutcome {
    pub source: String,
    pub state: ReconcileState,
    /// Size of this run's fetch result.
    pub new_count: usize,
    /// Records in the fetch result that the previous baseline did not have.
    pub additional_count: usize,
    #[serde(serialize_with = "serialize_display_opt")]
    pub error: Option<FetchError>,
    #[serde(serialize_with = "serialize_display_vec")]
    pub write_errors: Vec<RecordError>,
}

impl ReconcileOutcome {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            state: ReconcileState::Pending,
            new_count: 0,
            additional_count: 0,
            error: None,
            write_errors: Vec::new(),
        }
    }

    pub fn failed(source: &str, error: FetchError) -> Self {
        let mut outcome = Self::new(source);
        outcome.state = ReconcileState::Failed;
        outcome.error = Some(error);
        outcome
    }

    pub fn is_success(&self) -> bool {
        self.state == ReconcileState::Persisted
    }
}

fn serialize_display_opt<S, E>(value: &Option<E>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    E: std::fmt::Display,
{
    match value {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

fn serialize_display_vec<S, E>(values: &Vec<E>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    E: std::fmt::Display,
{
    serializer.collect_seq(values.iter().map(|e| e.to_string()))
}

/// Fetches one source and moves its on-disk state forward by one run.
///
/// The baseline is replaced by the fetch result, so it can shrink when a
/// source returns fewer records than before. A failed fetch leaves every
/// file of the source untouched.
pub struct SourceReconciler<'a> {
    source: String,
    layout: &'a RunLayout,
    fetcher: &'a dyn SourceFetcher,
    cancel: CancellationToken,
}

impl<'a> SourceReconciler<'a> {
    pub fn new(source: &str, layout: &'a RunLayout, fetcher: &'a dyn SourceFetcher) -> Self {
        Self {
            source: source.to_string(),
            layout,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn run(&self) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::new(&self.source);

        let baseline_path = self.layout.baseline(&self.source);
        let baseline = match RecordStore::load(&baseline_path) {
            Ok(set) => set,
            Err(e) => {
                log::warn!("[{}] {}; treating baseline as empty", self.source, e);
                RecordSet::new()
            }
        };
        log::debug!("[{}] baseline has {} records", self.source, baseline.len());

        if self.cancel.is_cancelled() {
            outcome.state = ReconcileState::Failed;
            outcome.error = Some(FetchError::Cancelled {
                source_id: self.source.clone(),
            });
            return outcome;
        }

        outcome.state = ReconcileState::Fetching;
        let raw = match self.fetcher.fetch(&self.source) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("[{}] fetch failed, keeping previous results: {}", self.source, e);
                outcome.state = ReconcileState::Failed;
                outcome.error = Some(e);
                return outcome;
            }
        };

        outcome.state = ReconcileState::Reconciling;
        let current = RecordSet::from_lines(&raw);
        let delta = current.difference(&baseline);

        let writes = [
            (self.layout.last_found(&self.source), &delta),
            (baseline_path, &current),
            (self.layout.output(&self.source), &current),
        ];
        for (path, set) in writes.iter() {
            if let Err(e) = RecordStore::save(path, set) {
                log::error!("[{}] {}", self.source, e);
                outcome.write_errors.push(e);
            }
        }

        outcome.new_count = current.len();
        outcome.additional_count = delta.len();
        outcome.state = ReconcileState::Persisted;

        log::info!(
            "[{}] {} records ({} new since last run)",
            self.source,
            outcome.new_count,
            outcome.additional_count
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::StaticFetcher;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RunLayout) {
        let dir = TempDir::new().unwrap();
        let layout = RunLayout::new(dir.path());
        layout.ensure().unwrap();
        (dir, layout)
    }

    #[test]
    fn test_first_run_everything_is_new() {
        let (_dir, layout) = setup();
        let fetcher = StaticFetcher::new().with_output("a", "y.a\nx.a\nx.a\n\n");

        let outcome = SourceReconciler::new("a", &layout, &fetcher).run();

        assert!(outcome.is_success());
        assert_eq!(outcome.new_count, 2);
        assert_eq!(outcome.additional_count, 2);
        assert_eq!(fs::read_to_string(layout.last_found("a")).unwrap(), "x.a\ny.a\n");
        assert_eq!(fs::read_to_string(layout.baseline("a")).unwrap(), "x.a\ny.a\n");
        assert_eq!(fs::read_to_string(layout.output("a")).unwrap(), "x.a\ny.a\n");
    }

    #[test]
    fn test_rerun_with_same_output_has_empty_delta() {
        let (_dir, layout) = setup();
        let fetcher = StaticFetcher::new().with_output("a", "x.a\ny.a\n");

        SourceReconciler::new("a", &layout, &fetcher).run();
        let baseline_before = fs::read(layout.baseline("a")).unwrap();
        let second = SourceReconciler::new("a", &layout, &fetcher).run();

        assert_eq!(second.additional_count, 0);
        assert_eq!(second.new_count, 2);
        assert_eq!(fs::read(layout.baseline("a")).unwrap(), baseline_before);
        assert!(RecordStore::load(&layout.last_found("a")).unwrap().is_empty());
    }

    #[test]
    fn test_baseline_shrinks_to_current() {
        let (_dir, layout) = setup();
        let first = StaticFetcher::new().with_output("a", "x.a\ny.a\n");
        SourceReconciler::new("a", &layout, &first).run();

        let second = StaticFetcher::new().with_output("a", "x.a\n");
        let outcome = SourceReconciler::new("a", &layout, &second).run();

        assert_eq!(outcome.additional_count, 0);
        assert_eq!(RecordStore::load(&layout.baseline("a")).unwrap(), RecordSet::from_lines("x.a"));
    }

    #[test]
    fn test_current_is_baseline_plus_delta() {
        let (_dir, layout) = setup();
        SourceReconciler::new("a", &layout, &StaticFetcher::new().with_output("a", "x.a\ny.a\n")).run();
        let old_baseline = RecordStore::load(&layout.baseline("a")).unwrap();

        SourceReconciler::new("a", &layout, &StaticFetcher::new().with_output("a", "y.a\nz.a\nw.a\n")).run();
        let current = RecordStore::load(&layout.baseline("a")).unwrap();
        let delta = RecordStore::load(&layout.last_found("a")).unwrap();

        assert!(delta.intersection(&old_baseline).is_empty());
        assert_eq!(delta, RecordSet::from_lines("w.a\nz.a"));
        assert_eq!(current, current.intersection(&old_baseline).union(&delta));
    }

    #[test]
    fn test_failure_preserves_previous_files() {
        let (_dir, layout) = setup();
        SourceReconciler::new("a", &layout, &StaticFetcher::new().with_output("a", "x.a\n")).run();

        let failing = StaticFetcher::new().with_failure("a", "connection refused");
        let outcome = SourceReconciler::new("a", &layout, &failing).run();

        assert_eq!(outcome.state, ReconcileState::Failed);
        assert!(matches!(outcome.error, Some(FetchError::Producer { .. })));
        assert_eq!(outcome.new_count, 0);
        assert_eq!(fs::read_to_string(layout.baseline("a")).unwrap(), "x.a\n");
        assert_eq!(fs::read_to_string(layout.output("a")).unwrap(), "x.a\n");
        assert_eq!(fs::read_to_string(layout.last_found("a")).unwrap(), "x.a\n");
    }

    #[test]
    fn test_cancelled_before_fetch() {
        let (_dir, layout) = setup();
        let fetcher = StaticFetcher::new().with_output("a", "x.a\n");
        let token = CancellationToken::new();
        token.cancel();

        let outcome = SourceReconciler::new("a", &layout, &fetcher)
            .with_cancellation(token)
            .run();

        assert_eq!(outcome.state, ReconcileState::Failed);
        assert!(matches!(outcome.error, Some(FetchError::Cancelled { .. })));
        assert!(!layout.output("a").exists());
    }

    #[test]
    fn test_write_failure_is_reported_not_fatal() {
        let (_dir, layout) = setup();
        fs::create_dir_all(layout.last_found("a")).unwrap();
        let fetcher = StaticFetcher::new().with_output("a", "x.a\n");

        let outcome = SourceReconciler::new("a", &layout, &fetcher).run();

        assert!(outcome.is_success());
        assert_eq!(outcome.write_errors.len(), 1);
        assert_eq!(fs::read_to_string(layout.output("a")).unwrap(), "x.a\n");
    }
}

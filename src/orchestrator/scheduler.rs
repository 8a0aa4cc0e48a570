// Sun Oct 18 2026 - Alex

use super::reconciler::{CancellationToken, ReconcileOutcome, SourceReconciler};
use crate::fetch::{FetchError, SourceFetcher};
use crate::record::RunLayout;
use serde::Serialize;
use std::thread;
use std::time::{Duration, Instant};

/// Receives per-source lifecycle events while the scheduler runs.
pub trait RunObserver: Sync {
    fn source_started(&self, source: &str);
    fn source_finished(&self, outcome: &ReconcileOutcome);
}

pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn source_started(&self, _source: &str) {}
    fn source_finished(&self, _outcome: &ReconcileOutcome) {}
}

/// Runs one reconciler per source, each on its own thread.
///
/// Every task is spawned before any is joined and there is no cap on the
/// number of threads. Tasks share nothing in memory; each one owns the files
/// named after its source.
pub struct TaskScheduler<'a> {
    layout: &'a RunLayout,
    fetcher: &'a dyn SourceFetcher,
    cancel: CancellationToken,
}

impl<'a> TaskScheduler<'a> {
    pub fn new(layout: &'a RunLayout, fetcher: &'a dyn SourceFetcher) -> Self {
        Self {
            layout,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Blocks until every source has finished. Outcomes come back in the
    /// order of `sources`.
    pub fn run_all(&self, sources: &[String], observer: &dyn RunObserver) -> Vec<ReconcileOutcome> {
        thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|source| {
                    let reconciler = SourceReconciler::new(source, self.layout, self.fetcher)
                        .with_cancellation(self.cancel.clone());
                    let handle = thread::Builder::new()
                        .name(format!("source-{}", source))
                        .spawn_scoped(scope, move || {
                            observer.source_started(reconciler.source());
                            let outcome = reconciler.run();
                            observer.source_finished(&outcome);
                            outcome
                        });
                    (source, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(source, handle)| match handle {
                    Ok(handle) => handle.join().unwrap_or_else(|_| {
                        log::error!("[{}] reconciliation task panicked", source);
                        ReconcileOutcome::failed(source, FetchError::Panicked {
                            source_id: source.clone(),
                        })
                    }),
                    Err(e) => {
                        log::error!("[{}] could not spawn task: {}", source, e);
                        ReconcileOutcome::failed(source, FetchError::Spawn {
                            source_id: source.clone(),
                            reason: e.to_string(),
                        })
                    }
                })
                .collect()
        })
    }

    pub fn run_timed(&self, sources: &[String], observer: &dyn RunObserver) -> (Vec<ReconcileOutcome>, SchedulerStatistics) {
        let start = Instant::now();
        let outcomes = self.run_all(sources, observer);
        let stats = SchedulerStatistics::from_outcomes(&outcomes, start.elapsed());
        (outcomes, stats)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SchedulerStatistics {
    pub sources_succeeded: usize,
    pub sources_failed: usize,
    pub records_fetched: usize,
    pub records_new: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl SchedulerStatistics {
    pub fn from_outcomes(outcomes: &[ReconcileOutcome], elapsed: Duration) -> Self {
        let mut stats = Self {
            sources_succeeded: 0,
            sources_failed: 0,
            records_fetched: 0,
            records_new: 0,
            elapsed,
        };

        for outcome in outcomes {
            if outcome.is_success() {
                stats.sources_succeeded += 1;
            } else {
                stats.sources_failed += 1;
            }
            stats.records_fetched += outcome.new_count;
            stats.records_new += outcome.additional_count;
        }

        stats
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.sources_succeeded + self.sources_failed;
        if total == 0 {
            0.0
        } else {
            self.sources_succeeded as f64 / total as f64
        }
    }
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

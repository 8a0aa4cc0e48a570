// Sun Oct 18 2026 - Alex

pub mod aggregator;
pub mod coordinator;
pub mod error;
pub mod exclusivity;
pub mod reconciler;
pub mod scheduler;

pub use aggregator::{AggregateSummary, GlobalAggregator};
pub use coordinator::{RunCoordinator, RunMode, RunReport, RunRequest};
pub use error::{RunError, RunResult};
pub use exclusivity::{ExclusivityAnalyzer, FilterOutcome, FrequencyTable, SourceTally, UniquenessRanking};
pub use reconciler::{CancellationToken, ReconcileOutcome, ReconcileState, SourceReconciler};
pub use scheduler::{NoopObserver, RunObserver, SchedulerStatistics, TaskScheduler};

// Sun Oct 18 2026 - Alex

pub mod fetch;
pub mod orchestrator;
pub mod record;
pub mod ui;

pub use fetch::{ShellFetcher, SourceCatalog, SourceFetcher, StaticFetcher};
pub use orchestrator::{
    ExclusivityAnalyzer, GlobalAggregator, RunCoordinator, RunReport, RunRequest, SourceReconciler,
    TaskScheduler,
};
pub use record::{RecordSet, RecordStore, RunLayout};

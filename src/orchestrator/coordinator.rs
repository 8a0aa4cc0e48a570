// Sun Oct 18 2026 - Alex

use super::aggregator::{AggregateSummary, GlobalAggregator};
use super::error::{RunError, RunResult};
use super::exclusivity::{ExclusivityAnalyzer, FilterOutcome, UniquenessRanking};
use super::reconciler::{CancellationToken, ReconcileOutcome};
use super::scheduler::{RunObserver, SchedulerStatistics, TaskScheduler};
use crate::fetch::catalog::is_valid_target;
use crate::fetch::{SourceCatalog, SourceFetcher};
use crate::record::RunLayout;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub run_dir: PathBuf,
    pub target: Option<String>,
    pub compare: bool,
    /// Sources to fetch. Empty means every catalog source.
    pub selection: Vec<String>,
}

impl RunRequest {
    pub fn new(run_dir: PathBuf) -> Self {
        Self {
            run_dir,
            target: None,
            compare: false,
            selection: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn with_compare(mut self, compare: bool) -> Self {
        self.compare = compare;
        self
    }

    pub fn with_selection(mut self, selection: Vec<String>) -> Self {
        self.selection = selection;
        self
    }

    /// Parses `a, b,,c` into trimmed, non-empty, first-occurrence ids.
    pub fn parse_selection(raw: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for part in raw.split(',') {
            let id = part.trim();
            if !id.is_empty() && !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }

    pub fn mode(&self) -> RunResult<RunMode> {
        match self.target.as_deref().map(str::trim) {
            Some(target) if !target.is_empty() => {
                if !is_valid_target(target) {
                    return Err(RunError::Usage(format!("Invalid target domain: {}", target)));
                }
                Ok(RunMode::Full)
            }
            _ if self.compare => Ok(RunMode::CompareOnly),
            _ => Err(RunError::Usage(
                "You must provide a domain (-d) or use -c to compare existing results.".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    Full,
    CompareOnly,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub mode: RunMode,
    pub unknown_sources: Vec<String>,
    pub outcomes: Vec<ReconcileOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<SchedulerStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<AggregateSummary>,
    pub filtered: Vec<FilterOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<UniquenessRanking>,
    /// Non-fatal failures outside the per-source phase.
    pub errors: Vec<String>,
}

impl RunReport {
    fn new(mode: RunMode) -> Self {
        Self {
            mode,
            unknown_sources: Vec::new(),
            outcomes: Vec::new(),
            statistics: None,
            aggregate: None,
            filtered: Vec::new(),
            ranking: None,
            errors: Vec::new(),
        }
    }

    pub fn failed_sources(&self) -> impl Iterator<Item = &ReconcileOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Drives one invocation: fan out, barrier, aggregate, filter, rank.
pub struct RunCoordinator {
    catalog: SourceCatalog,
    fetcher: Box<dyn SourceFetcher>,
    cancel: CancellationToken,
}

impl RunCoordinator {
    pub fn new(catalog: SourceCatalog, fetcher: Box<dyn SourceFetcher>) -> Self {
        Self {
            catalog,
            fetcher,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn run(&self, request: &RunRequest, observer: &dyn RunObserver) -> RunResult<RunReport> {
        let mode = request.mode()?;
        let layout = RunLayout::new(&request.run_dir);
        layout.ensure()?;

        let all_sources: Vec<String> = self.catalog.ids().map(str::to_string).collect();
        let analyzer = ExclusivityAnalyzer::new(&layout);
        let mut report = RunReport::new(mode);

        if mode == RunMode::CompareOnly {
            log::info!("No target given, comparing existing results");
            report.ranking = Some(analyzer.rank(&all_sources));
            return Ok(report);
        }

        let (selected, unknown) = self.select(&request.selection);
        for id in &unknown {
            log::warn!("Invalid tool: {}", id);
        }
        report.unknown_sources = unknown;

        log::info!("Running {} sources in {}", selected.len(), layout.records_dir().display());
        let scheduler = TaskScheduler::new(&layout, self.fetcher.as_ref())
            .with_cancellation(self.cancel.clone());
        let (outcomes, stats) = scheduler.run_timed(&selected, observer);
        log::info!(
            "Sources finished: {} ok, {} failed in {:?}",
            stats.sources_succeeded,
            stats.sources_failed,
            stats.elapsed
        );
        report.outcomes = outcomes;
        report.statistics = Some(stats);

        match GlobalAggregator::new(&layout).aggregate(&all_sources) {
            Ok(summary) => report.aggregate = Some(summary),
            Err(e) => {
                log::error!("Aggregation failed: {}", e);
                report.errors.push(format!("Error aggregating results: {}", e));
            }
        }

        report.filtered = analyzer.filter_exclusive(&all_sources);
        for outcome in &report.filtered {
            if let Some(e) = &outcome.error {
                report.errors.push(format!("Error writing filtered file for {}: {}", outcome.source, e));
            }
        }

        if request.compare {
            report.ranking = Some(analyzer.rank(&all_sources));
        }

        Ok(report)
    }

    /// Splits a selection into known and unknown ids. An empty selection
    /// picks every catalog source.
    fn select(&self, selection: &[String]) -> (Vec<String>, Vec<String>) {
        if selection.is_empty() {
            return (self.catalog.ids().map(str::to_string).collect(), Vec::new());
        }

        let mut known = Vec::new();
        let mut unknown = Vec::new();
        for id in selection {
            if self.catalog.contains(id) {
                if !known.contains(id) {
                    known.push(id.clone());
                }
            } else if !unknown.contains(id) {
                unknown.push(id.clone());
            }
        }
        (known, unknown)
    }
}

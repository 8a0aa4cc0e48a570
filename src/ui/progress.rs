// Sun Oct 18 2026 - Alex

use super::display::DisplayRenderer;
use crate::orchestrator::{ReconcileOutcome, RunObserver};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::Duration;

/// One spinner per running source, replaced by its result line when done.
pub struct SourceProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
    style: ProgressStyle,
    done_style: ProgressStyle,
    renderer: DisplayRenderer,
}

impl SourceProgress {
    pub fn new(renderer: DisplayRenderer) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let done_style = ProgressStyle::default_spinner()
            .template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            style,
            done_style,
            renderer,
        }
    }
}

impl RunObserver for SourceProgress {
    fn source_started(&self, source: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(self.style.clone());
        pb.set_message(self.renderer.running(source));
        pb.enable_steady_tick(Duration::from_millis(120));
        self.bars.lock().insert(source.to_string(), pb);
    }

    fn source_finished(&self, outcome: &ReconcileOutcome) {
        let line = self.renderer.source_result(outcome);
        match self.bars.lock().remove(&outcome.source) {
            Some(pb) => {
                pb.set_style(self.done_style.clone());
                pb.finish_with_message(line);
            }
            None => {
                if let Err(e) = self.multi.println(line) {
                    log::warn!("[{}] could not print result: {}", outcome.source, e);
                }
            }
        }
    }
}

/// Line-per-event output for terminals without spinners.
pub struct PlainProgress {
    renderer: DisplayRenderer,
}

impl PlainProgress {
    pub fn new(renderer: DisplayRenderer) -> Self {
        Self { renderer }
    }
}

impl RunObserver for PlainProgress {
    fn source_started(&self, source: &str) {
        println!("\n{}", self.renderer.running(source));
    }

    fn source_finished(&self, outcome: &ReconcileOutcome) {
        println!("{}", self.renderer.source_result(outcome));
    }
}

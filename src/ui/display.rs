// Sun Oct 18 2026 - Alex

use crate::orchestrator::{
    AggregateSummary, FilterOutcome, ReconcileOutcome, RunReport, UniquenessRanking,
};
use colored::*;

/// Formats run results the way the terminal output has always looked.
#[derive(Debug, Clone, Copy)]
pub struct DisplayRenderer {
    use_color: bool,
}

impl DisplayRenderer {
    pub fn new() -> Self {
        Self { use_color: true }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    fn paint(&self, text: &str, f: impl Fn(&str) -> ColoredString) -> String {
        if self.use_color {
            f(text).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn running(&self, source: &str) -> String {
        format!("Running {}...", title_case(source))
    }

    pub fn source_result(&self, outcome: &ReconcileOutcome) -> String {
        match &outcome.error {
            Some(e) => self.paint(&e.to_string(), |s| s.red()),
            None => format!(
                "{} Subdomains found: {} (New: {})",
                self.paint(&format!("[{}]", outcome.source.to_uppercase()), |s| s.green().bold()),
                outcome.new_count,
                outcome.additional_count
            ),
        }
    }

    pub fn unknown_source(&self, source: &str) -> String {
        format!("{} {}", self.paint("[!]", |s| s.red()), self.paint(&format!("Invalid tool: {}", source), |s| s.red()))
    }

    pub fn aggregate(&self, summary: &AggregateSummary) -> String {
        self.paint(
            &format!(
                "[TOTAL] Unique Subdomains: {} (Previously: {}, New: {})",
                summary.total_count, summary.previous_count, summary.new_count
            ),
            |s| s.green().bold(),
        )
    }

    pub fn filtered(&self, outcome: &FilterOutcome) -> String {
        format!(
            "{} original file filtered: kept {} truly unique entries.",
            self.paint(&format!("[{}]", outcome.source.to_uppercase()), |s| s.cyan()),
            self.paint(&outcome.kept.to_string(), |s| s.green())
        )
    }

    pub fn ranking(&self, ranking: &UniquenessRanking) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            self.paint("Comparison of Unique Subdomains Per Tool:", |s| s.cyan()),
        ];

        for tally in &ranking.tallies {
            lines.push(format!(
                "{}: {} unique subdomains",
                self.paint(&tally.source.to_uppercase(), |s| s.yellow()),
                self.paint(&tally.claimed.to_string(), |s| s.green())
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "TOTAL UNIQUE Subdomains ACROSS ALL TOOLS: {}",
            self.paint(&ranking.total_unique.to_string(), |s| s.green())
        ));
        lines
    }

    /// Everything after the per-source phase, in the order it happened.
    pub fn report_tail(&self, report: &RunReport) -> Vec<String> {
        let mut lines = Vec::new();

        if let Some(summary) = &report.aggregate {
            lines.push(String::new());
            lines.push(self.paint("Aggregating results...", |s| s.cyan()));
            lines.push(self.aggregate(summary));
        }

        if !report.filtered.is_empty() {
            lines.push(String::new());
            lines.push(self.paint(
                "Filtering original tool outputs to keep only truly exclusive entries...",
                |s| s.cyan(),
            ));
            for outcome in &report.filtered {
                lines.push(self.filtered(outcome));
            }
        }

        for error in &report.errors {
            lines.push(self.paint(error, |s| s.red()));
        }

        if let Some(ranking) = &report.ranking {
            lines.extend(self.ranking(ranking));
        }

        lines
    }

    pub fn print_report_tail(&self, report: &RunReport) {
        for line in self.report_tail(report) {
            println!("{}", line);
        }
    }
}

impl Default for DisplayRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchError;
    use crate::orchestrator::{ReconcileState, SourceTally};

    fn plain() -> DisplayRenderer {
        DisplayRenderer::new().with_color(false)
    }

    #[test]
    fn test_source_lines() {
        let failed = ReconcileOutcome::failed("subfinder", FetchError::Producer {
            source_id: "subfinder".to_string(),
            reason: "exit status: 1".to_string(),
        });
        let ok = ReconcileOutcome {
            source: "subfinder".to_string(),
            state: ReconcileState::Persisted,
            new_count: 12,
            additional_count: 3,
            error: None,
            write_errors: Vec::new(),
        };

        assert_eq!(plain().running("subfinder"), "Running Subfinder...");
        assert_eq!(plain().source_result(&failed), "subfinder error: exit status: 1");
        assert_eq!(plain().source_result(&ok), "[SUBFINDER] Subdomains found: 12 (New: 3)");
    }

    #[test]
    fn test_aggregate_line() {
        let line = plain().aggregate(&AggregateSummary { total_count: 10, previous_count: 7, new_count: 3 });
        assert_eq!(line, "[TOTAL] Unique Subdomains: 10 (Previously: 7, New: 3)");
    }

    #[test]
    fn test_ranking_lines() {
        let ranking = UniquenessRanking {
            tallies: vec![
                SourceTally { source: "crtsh".to_string(), claimed: 5 },
                SourceTally { source: "chaos".to_string(), claimed: 2 },
            ],
            total_unique: 7,
        };

        let lines = plain().ranking(&ranking);
        assert_eq!(lines[1], "Comparison of Unique Subdomains Per Tool:");
        assert_eq!(lines[2], "CRTSH: 5 unique subdomains");
        assert_eq!(lines[3], "CHAOS: 2 unique subdomains");
        assert_eq!(lines.last().unwrap(), "TOTAL UNIQUE Subdomains ACROSS ALL TOOLS: 7");
    }

    #[test]
    fn test_filtered_line() {
        let outcome = FilterOutcome { source: "shodan".to_string(), kept: 4, dropped: 1, error: None };
        assert_eq!(plain().filtered(&outcome), "[SHODAN] original file filtered: kept 4 truly unique entries.");
    }
}

// Sun Oct 18 2026 - Alex

use crate::record::{RecordError, RecordSet, RecordStore, RunLayout};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// How many sources' output files contain each record.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<String, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts each record once per set it appears in.
    pub fn from_sets<'s, I>(sets: I) -> Self
    where
        I: IntoIterator<Item = &'s RecordSet>,
    {
        let mut table = Self::new();
        for set in sets {
            table.add(set);
        }
        table
    }

    pub fn add(&mut self, set: &RecordSet) {
        for record in set {
            *self.counts.entry(record.clone()).or_insert(0) += 1;
        }
    }

    pub fn count(&self, record: &str) -> usize {
        self.counts.get(record).copied().unwrap_or(0)
    }

    pub fn is_exclusive(&self, record: &str) -> bool {
        self.count(record) == 1
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct FilterOutcome {
    pub source: String,
    pub kept: usize,
    pub dropped: usize,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_error")]
    pub error: Option<RecordError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceTally {
    pub source: String,
    pub claimed: usize,
}

/// First-claim-wins ranking of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UniquenessRanking {
    /// Sorted by `claimed` descending, then by source id.
    pub tallies: Vec<SourceTally>,
    /// Distinct records across every source considered.
    pub total_unique: usize,
}

fn serialize_error<S: serde::Serializer>(value: &Option<RecordError>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Cross-source analysis over the per-source output files.
///
/// Two different notions of uniqueness live here. `filter_exclusive` keeps
/// records found by exactly one source. `rank` credits each record to the
/// first source, in id order, that has it, so contested records still count
/// for somebody.
pub struct ExclusivityAnalyzer<'a> {
    layout: &'a RunLayout,
}

impl<'a> ExclusivityAnalyzer<'a> {
    pub fn new(layout: &'a RunLayout) -> Self {
        Self { layout }
    }

    /// Loads the output file of every source that has one, in parallel.
    /// Unreadable files are logged and left out.
    pub fn load_outputs<S: AsRef<str> + Sync>(&self, sources: &[S]) -> BTreeMap<String, RecordSet> {
        sources
            .par_iter()
            .filter_map(|source| {
                let source = source.as_ref();
                match RecordStore::load_existing(&self.layout.output(source)) {
                    Ok(Some(set)) => Some((source.to_string(), set)),
                    Ok(None) => None,
                    Err(e) => {
                        log::warn!("[{}] {}; skipped", source, e);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn frequency_table<S: AsRef<str> + Sync>(&self, sources: &[S]) -> FrequencyTable {
        let outputs = self.load_outputs(sources);
        FrequencyTable::from_sets(outputs.values())
    }

    /// Rewrites each source's output file so it only holds records no other
    /// source produced.
    pub fn filter_exclusive<S: AsRef<str> + Sync>(&self, sources: &[S]) -> Vec<FilterOutcome> {
        let outputs = self.load_outputs(sources);
        let table = FrequencyTable::from_sets(outputs.values());

        outputs
            .iter()
            .map(|(source, set)| {
                let kept: RecordSet = set
                    .iter()
                    .filter(|record| table.is_exclusive(record))
                    .cloned()
                    .collect();

                let error = RecordStore::save(&self.layout.output(source), &kept).err();
                if let Some(ref e) = error {
                    log::error!("[{}] {}", source, e);
                }

                FilterOutcome {
                    source: source.clone(),
                    kept: kept.len(),
                    dropped: set.len() - kept.len(),
                    error,
                }
            })
            .collect()
    }

    pub fn rank<S: AsRef<str> + Sync>(&self, sources: &[S]) -> UniquenessRanking {
        Self::rank_sets(&self.load_outputs(sources))
    }

    /// Sources are visited in key order; a record counts for the first
    /// source that has it.
    pub fn rank_sets(outputs: &BTreeMap<String, RecordSet>) -> UniquenessRanking {
        let mut claimed: HashSet<&str> = HashSet::new();
        let mut tallies = Vec::with_capacity(outputs.len());

        for (source, set) in outputs {
            let mut count = 0;
            for record in set {
                if claimed.insert(record.as_str()) {
                    count += 1;
                }
            }
            tallies.push(SourceTally {
                source: source.clone(),
                claimed: count,
            });
        }

        tallies.sort_by(|a, b| b.claimed.cmp(&a.claimed).then_with(|| a.source.cmp(&b.source)));

        UniquenessRanking {
            tallies,
            total_unique: claimed.len(),
        }
    }
}

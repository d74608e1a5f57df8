//! Search/template partitioning of an exposure batch.
//!
//! Recent exposures become *search* images (differenced to find transients);
//! everything else is kept as *template* imagery. The choice depends on how
//! many distinct nights the batch covers:
//!
//! - fewer than two nights: everything is search, there is no baseline
//! - exactly two nights: the later night is search
//! - more than two: among nights with more than two exposures, the most recent
//!   run of at least two consecutive nights is search, falling back to the most
//!   recent such night; at most `max_search` exposures are flagged, chosen by a
//!   [`SearchSelection`] strategy

use serde::Serialize;
use tracing::{debug, info, warn};

use super::policy::{EncounterOrder, SearchSelection, SelectionPolicy};
use crate::logging::OperationLog;
use crate::models::{ExposureRecord, ExposureTable, Night};

/// Upper bound on search exposures per batch (job-submission cost).
pub const DEFAULT_MAX_SEARCH: usize = 20;

/// A night qualifies for the consecutive-run search only with more exposures than this.
pub const MIN_EXPOSURES_PER_NIGHT: usize = 2;

/// Shortest run of consecutive nights preferred over a single night.
pub const MIN_RUN_LENGTH: usize = 2;

/// Result of looking for a run of consecutive qualifying nights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelection {
    RunFound(Vec<Night>),
    NoRunFound,
}

/// Which rule produced the search set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PartitionOutcome {
    /// Fewer than two nights; every exposure was flagged search.
    Degenerate { nights: usize },
    /// Exactly two nights; the later one is search.
    LatestOfTwo { night: Night },
    /// Most recent run of consecutive qualifying nights.
    ConsecutiveRun { nights: Vec<Night>, over_cap: usize },
    /// No run found; most recent qualifying night.
    SingleNight { night: Night, over_cap: usize },
}

impl PartitionOutcome {
    pub fn is_degenerate(&self) -> bool {
        matches!(self, PartitionOutcome::Degenerate { .. })
    }
}

/// A partitioned batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub table: ExposureTable,
    pub outcome: PartitionOutcome,
}

/// Split nights (ascending, deduplicated) into maximal runs of consecutive calendar days.
pub fn consecutive_runs(nights: &[Night]) -> Vec<Vec<Night>> {
    let mut runs: Vec<Vec<Night>> = Vec::new();
    for &night in nights {
        match runs.last_mut() {
            Some(run) if run.last().is_some_and(|prev| prev.is_followed_by(night)) => {
                run.push(night)
            }
            _ => runs.push(vec![night]),
        }
    }
    runs
}

/// Most recent run of at least `min_len` consecutive nights.
pub fn latest_consecutive_run(nights: &[Night], min_len: usize) -> RunSelection {
    consecutive_runs(nights)
        .into_iter()
        .rev()
        .find(|run| run.len() >= min_len)
        .map_or(RunSelection::NoRunFound, RunSelection::RunFound)
}

/// Assigns `is_search` to every record of a batch.
pub struct Partitioner {
    max_search: usize,
    strategy: Box<dyn SearchSelection>,
}

impl Default for Partitioner {
    fn default() -> Self {
        Self {
            max_search: DEFAULT_MAX_SEARCH,
            strategy: Box::new(EncounterOrder),
        }
    }
}

impl std::fmt::Debug for Partitioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partitioner")
            .field("max_search", &self.max_search)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl Partitioner {
    /// A `max_search` of zero is raised to one so a batch always has a search exposure.
    pub fn new(max_search: usize, policy: SelectionPolicy) -> Self {
        Self {
            max_search: max_search.max(1),
            strategy: policy.strategy(),
        }
    }

    pub fn with_strategy(mut self, strategy: Box<dyn SearchSelection>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn max_search(&self) -> usize {
        self.max_search
    }

    /// Partition a batch. Any existing `is_search` flags are ignored.
    pub fn partition(&self, mut table: ExposureTable, log: &OperationLog) -> Partition {
        let scope = log.begin("partition_exposures");
        table.clear_search_flags();

        let groups = table.nights();
        let outcome = match groups.last_key_value() {
            _ if groups.len() < 2 => {
                for record in table.records_mut() {
                    record.is_search = true;
                }
                warn!(
                    parent: scope.span(),
                    nights = groups.len(),
                    exposures = table.len(),
                    "Fewer than two nights available; marking every exposure as search. \
                     Template data will be missing downstream."
                );
                PartitionOutcome::Degenerate {
                    nights: groups.len(),
                }
            }
            // Keys are ascending, so the last entry is the later night
            Some((&night, indices)) if groups.len() == 2 => {
                mark(table.records_mut(), indices);
                PartitionOutcome::LatestOfTwo { night }
            }
            _ => {
                let qualifying: Vec<Night> = groups
                    .iter()
                    .filter(|(_, indices)| indices.len() > MIN_EXPOSURES_PER_NIGHT)
                    .map(|(night, _)| *night)
                    .collect();
                debug!(parent: scope.span(), ?qualifying, "Nights with enough exposures");

                let chosen = match latest_consecutive_run(&qualifying, MIN_RUN_LENGTH) {
                    RunSelection::RunFound(nights) => nights,
                    RunSelection::NoRunFound => {
                        let fallback = qualifying
                            .last()
                            .copied()
                            .or_else(|| groups.keys().next_back().copied());
                        debug!(
                            parent: scope.span(),
                            ?fallback,
                            "No consecutive run; using the most recent night"
                        );
                        fallback.into_iter().collect()
                    }
                };

                let mut candidate_indices: Vec<usize> = chosen
                    .iter()
                    .filter_map(|night| groups.get(night))
                    .flatten()
                    .copied()
                    .collect();
                candidate_indices.sort_unstable();

                let candidates: Vec<(usize, &ExposureRecord)> = candidate_indices
                    .iter()
                    .map(|&idx| (idx, &table.records()[idx]))
                    .collect();
                let selected = self.strategy.select(&candidates, self.max_search);
                let over_cap = candidates.len().saturating_sub(selected.len());
                mark(table.records_mut(), &selected);

                if over_cap > 0 {
                    info!(
                        parent: scope.span(),
                        over_cap,
                        cap = self.max_search,
                        strategy = self.strategy.name(),
                        "Search cap reached; extra exposures kept as templates"
                    );
                }

                if chosen.len() == 1 {
                    PartitionOutcome::SingleNight {
                        night: chosen[0],
                        over_cap,
                    }
                } else {
                    PartitionOutcome::ConsecutiveRun {
                        nights: chosen,
                        over_cap,
                    }
                }
            }
        };

        info!(
            parent: scope.span(),
            search = table.search().count(),
            template = table.templates().count(),
            outcome = ?outcome,
            "Partitioned exposures"
        );
        scope.finish();
        Partition { table, outcome }
    }
}

fn mark(records: &mut [ExposureRecord], indices: &[usize]) {
    for &idx in indices {
        records[idx].is_search = true;
    }
}

//! Exposure selection: quality cuts, search/template partitioning and the
//! derived time window.

pub mod partition;
pub mod policy;
pub mod quality;
pub mod window;

#[cfg(test)]
mod partition_tests;

pub use partition::{
    consecutive_runs, latest_consecutive_run, Partition, PartitionOutcome, Partitioner,
    RunSelection, DEFAULT_MAX_SEARCH,
};
pub use policy::{EncounterOrder, HighestQuality, SearchSelection, SelectionPolicy};
pub use quality::QualityCuts;
pub use window::{NightBounds, TimeWindow, TWINDOW_PAD_DAYS};

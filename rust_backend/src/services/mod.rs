//! Workflows that combine the catalog, the selection logic and the filesystem.

pub mod exposure_info;
pub mod job_stats;

pub use exposure_info::{fetch_exposure_details, get_exposure_info};
pub use job_stats::{
    ExposureJobStats, ForcePhotoStatus, JobStatsPaths, JobStatsReport, JobStatsScanner,
    StepFailures,
};

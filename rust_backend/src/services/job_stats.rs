//! Progress report for DiffImg and ForcePhoto outputs on the worker filesystem.
//!
//! The scan is read-only. For each exposure it looks at
//! `<persistent_root>/exp/<nite>/<exp>/dp<season>*_*/` where every matching
//! directory holds one CCD's outputs, and at
//! `<forcephoto_root>/dp<season>/<nite>/<exp>/` for ForcePhoto products.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DagResult;
use crate::logging::OperationLog;
use crate::models::{Night, Season};

/// Filesystem roots scanned for pipeline outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatsPaths {
    #[serde(default = "default_persistent_root")]
    pub persistent_root: PathBuf,
    #[serde(default = "default_forcephoto_root")]
    pub forcephoto_root: PathBuf,
}

fn default_persistent_root() -> PathBuf {
    PathBuf::from("/pnfs/des/persistent/gw")
}

fn default_forcephoto_root() -> PathBuf {
    PathBuf::from("/pnfs/des/persistent/gw/forcephoto/images")
}

impl Default for JobStatsPaths {
    fn default() -> Self {
        Self {
            persistent_root: default_persistent_root(),
            forcephoto_root: default_forcephoto_root(),
        }
    }
}

/// CCDs that failed on one pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepFailures {
    pub step: String,
    pub count: usize,
    /// Share of finished CCD outputs, in percent
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcePhotoStatus {
    AllPresent,
    MissingAll,
    MissingFits,
    MissingPsf,
}

impl ForcePhotoStatus {
    fn from_counts(fits: usize, psf: usize) -> Self {
        match (fits > 0, psf > 0) {
            (true, true) => Self::AllPresent,
            (false, false) => Self::MissingAll,
            (false, true) => Self::MissingFits,
            (true, false) => Self::MissingPsf,
        }
    }

    fn message(&self, exposure: i64) -> String {
        match self {
            Self::AllPresent => format!("All ForcePhoto outputs for {} are present.", exposure),
            Self::MissingAll => format!("Missing all ForcePhoto outputs for {}.", exposure),
            Self::MissingFits => format!("Missing the fits output for {}.", exposure),
            Self::MissingPsf => format!("Missing the psf output for {}.", exposure),
        }
    }
}

/// Scan result for one exposure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureJobStats {
    pub exposure: i64,
    pub night: Night,
    pub diffimg_dir: String,
    /// Finished CCD tarballs
    pub finished: usize,
    /// `*.FAIL` markers
    pub failed: usize,
    /// `stamps*` outputs
    pub filled: usize,
    pub failure_steps: Vec<StepFailures>,
    pub forcephoto_dir: String,
    pub forcephoto: ForcePhotoStatus,
}

impl ExposureJobStats {
    /// Human-readable report lines for this exposure.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.diffimg_dir.clone()];
        if self.finished == 0 && self.failed == 0 {
            lines.push(format!("Nothing has finished for {}.", self.exposure));
        } else {
            lines.extend(self.failure_steps.iter().map(|s| {
                format!(
                    "{}: {:.2}% of CCDs failed on this step. ({} out of {}).",
                    s.step, s.percent, s.count, self.finished
                )
            }));
        }
        lines.push(self.forcephoto_dir.clone());
        lines.push(self.forcephoto.message(self.exposure));
        lines
    }
}

/// Scan results for a list of exposures, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobStatsReport {
    pub season: Season,
    pub exposures: Vec<ExposureJobStats>,
}

impl fmt::Display for JobStatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stats in &self.exposures {
            for line in stats.lines() {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

/// Read-only scanner over the worker output trees of one season.
pub struct JobStatsScanner<'a> {
    paths: &'a JobStatsPaths,
    season: Season,
}

impl<'a> JobStatsScanner<'a> {
    pub fn new(paths: &'a JobStatsPaths, season: Season) -> Self {
        Self { paths, season }
    }

    /// Scan every `(exposure, night)` pair.
    ///
    /// # Errors
    /// Fails on a pattern that cannot be compiled; unreadable entries are skipped.
    pub fn scan(&self, exposures: &[(i64, Night)], log: &OperationLog) -> DagResult<JobStatsReport> {
        let scope = log.begin("fetch_job_stats");
        let exposures = exposures
            .iter()
            .map(|&(exposure, night)| self.scan_exposure(exposure, night))
            .collect::<DagResult<Vec<_>>>()?;

        for stats in &exposures {
            debug!(
                parent: scope.span(),
                exposure = stats.exposure,
                finished = stats.finished,
                failed = stats.failed,
                filled = stats.filled,
                "Scanned exposure outputs"
            );
        }

        scope.finish();
        Ok(JobStatsReport {
            season: self.season,
            exposures,
        })
    }

    pub fn scan_exposure(&self, exposure: i64, night: Night) -> DagResult<ExposureJobStats> {
        let exp_dir = self
            .paths
            .persistent_root
            .join("exp")
            .join(night.to_string())
            .join(exposure.to_string());
        let ccd_prefix = format!("{}/dp{}", escaped(&exp_dir), self.season);

        let finished = matches(&format!("{ccd_prefix}*_*/*.tar.gz"))?;
        let filled = matches(&format!("{ccd_prefix}*_*/stamps*"))?;
        let failed = matches(&format!("{ccd_prefix}*_*/*.FAIL"))?;

        let failure_steps = if finished.is_empty() && failed.is_empty() {
            Vec::new()
        } else {
            failure_steps(&finished, &failed)
        };

        let fp_dir = self
            .paths
            .forcephoto_root
            .join(format!("dp{}", self.season))
            .join(night.to_string())
            .join(exposure.to_string());
        let fits = matches(&format!("{}/*.fits", escaped(&fp_dir)))?;
        let psf = matches(&format!("{}/*.psf", escaped(&fp_dir)))?;

        Ok(ExposureJobStats {
            exposure,
            night,
            diffimg_dir: format!("{}/dp{}", exp_dir.display(), self.season),
            finished: finished.len(),
            failed: failed.len(),
            filled: filled.len(),
            failure_steps,
            forcephoto_dir: format!("{}/", fp_dir.display()),
            forcephoto: ForcePhotoStatus::from_counts(fits.len(), psf.len()),
        })
    }
}

fn escaped(path: &Path) -> String {
    Pattern::escape(&path.to_string_lossy())
}

fn matches(pattern: &str) -> DagResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in glob(pattern)? {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => warn!(path = %e.path().display(), error = %e.error(), "Skipping unreadable entry"),
        }
    }
    Ok(paths)
}

/// Name of the directory holding `path`, i.e. the CCD.
fn ccd_of(path: &Path) -> Option<String> {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
}

/// Attribute every finished output whose CCD also carries a FAIL marker to
/// the step named by that marker (file name up to the first `.`).
fn failure_steps(finished: &[PathBuf], failed: &[PathBuf]) -> Vec<StepFailures> {
    let mut step_by_ccd: HashMap<String, String> = HashMap::new();
    for marker in failed {
        let (Some(ccd), Some(name)) = (ccd_of(marker), marker.file_name()) else {
            continue;
        };
        let name = name.to_string_lossy();
        let step = name.split('.').next().unwrap_or_default().to_string();
        step_by_ccd.entry(ccd).or_insert(step);
    }

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for output in finished {
        if let Some(step) = ccd_of(output).and_then(|ccd| step_by_ccd.get(&ccd)) {
            *counts.entry(step.clone()).or_default() += 1;
        }
    }

    let total = finished.len() as f64;
    counts
        .into_iter()
        .map(|(step, count)| StepFailures {
            step,
            count,
            percent: count as f64 / total * 100.0,
        })
        .collect()
}

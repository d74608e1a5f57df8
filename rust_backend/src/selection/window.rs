//! Time-window fields for the DAGMaker configuration.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DagError, DagResult};
use crate::logging::OperationLog;
use crate::models::{ExposureTable, Night};

/// Days added to the span of the search exposures.
pub const TWINDOW_PAD_DAYS: f64 = 2.0;

/// Template night bounds. Deliberately wide so every archived template qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NightBounds {
    #[serde(default = "default_min_night")]
    pub min_night: Night,
    #[serde(default = "default_max_night")]
    pub max_night: Night,
    #[serde(default = "default_pad_days")]
    pub pad_days: f64,
}

fn default_min_night() -> Night {
    Night::new(20100101)
}

fn default_max_night() -> Night {
    Night::new(21000101)
}

fn default_pad_days() -> f64 {
    TWINDOW_PAD_DAYS
}

impl Default for NightBounds {
    fn default() -> Self {
        Self {
            min_night: default_min_night(),
            max_night: default_max_night(),
            pad_days: default_pad_days(),
        }
    }
}

/// `MIN_NITE`, `MAX_NITE` and `TWINDOW` for one batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    pub min_night: Night,
    pub max_night: Night,
    /// Days between the first and last search exposure, plus the pad
    pub padding_window: f64,
}

impl TimeWindow {
    /// Derive the window from a finalized partition.
    ///
    /// # Errors
    /// [`DagError::EmptySearchSet`] if no record is flagged search.
    pub fn from_partition(
        table: &ExposureTable,
        bounds: &NightBounds,
        log: &OperationLog,
    ) -> DagResult<Self> {
        let scope = log.begin("get_time_boundaries");

        let (min_mjd, max_mjd) = table
            .search()
            .map(|r| r.mjd)
            .fold(None, |acc: Option<(f64, f64)>, mjd| match acc {
                None => Some((mjd, mjd)),
                Some((lo, hi)) => Some((lo.min(mjd), hi.max(mjd))),
            })
            .ok_or(DagError::EmptySearchSet)?;

        let window = TimeWindow {
            min_night: bounds.min_night,
            max_night: bounds.max_night,
            padding_window: max_mjd - min_mjd + bounds.pad_days,
        };

        info!(parent: scope.span(), min_nite = %window.min_night, "min_nite");
        info!(parent: scope.span(), max_nite = %window.max_night, "max_nite");
        info!(parent: scope.span(), twindow = window.padding_window, "twindow");
        scope.finish();
        Ok(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, ExposureRecord};

    fn exposure(id: i64, mjd: f64, search: bool) -> ExposureRecord {
        ExposureRecord {
            exposure_id: id,
            night: Night::new(20200531),
            mjd,
            ra: 0.0,
            dec: 0.0,
            band: Band::Z,
            exposure_time: 90.0,
            quality_metric: 0.4,
            propid: String::new(),
            obs_type: String::new(),
            object: String::new(),
            is_search: search,
        }
    }

    #[test]
    fn test_window_spans_search_exposures_only() {
        let table = ExposureTable::new(vec![
            exposure(1, 58000.0, false),
            exposure(2, 59000.0, true),
            exposure(3, 59003.5, true),
            exposure(4, 59001.2, true),
        ])
        .unwrap();

        let window =
            TimeWindow::from_partition(&table, &NightBounds::default(), &OperationLog::disabled())
                .unwrap();
        assert!((window.padding_window - 5.5).abs() < 1e-9);
        assert_eq!(window.min_night, Night::new(20100101));
        assert_eq!(window.max_night, Night::new(21000101));
    }

    #[test]
    fn test_single_search_exposure_gives_pad_only() {
        let table = ExposureTable::new(vec![exposure(1, 59000.25, true)]).unwrap();
        let window =
            TimeWindow::from_partition(&table, &NightBounds::default(), &OperationLog::disabled())
                .unwrap();
        assert_eq!(window.padding_window, 2.0);
    }

    #[test]
    fn test_empty_search_set_is_an_error() {
        let table = ExposureTable::new(vec![exposure(1, 59000.0, false)]).unwrap();
        let result =
            TimeWindow::from_partition(&table, &NightBounds::default(), &OperationLog::disabled());
        assert!(matches!(result, Err(DagError::EmptySearchSet)));
    }
}

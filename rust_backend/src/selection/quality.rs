//! Exposure quality cuts applied before partitioning.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{Band, ExposureRecord, ExposureTable};

/// Acceptance criteria for candidate exposures. All bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityCuts {
    #[serde(default = "default_min_exposure_time")]
    pub min_exposure_time: f64,
    #[serde(default = "default_max_exposure_time")]
    pub max_exposure_time: f64,
    #[serde(default = "default_min_quality")]
    pub min_quality: f64,
    #[serde(default = "default_bands")]
    pub bands: BTreeSet<Band>,
}

fn default_min_exposure_time() -> f64 {
    30.0
}

fn default_max_exposure_time() -> f64 {
    200.0
}

fn default_min_quality() -> f64 {
    0.05
}

fn default_bands() -> BTreeSet<Band> {
    [Band::U, Band::G, Band::R, Band::I, Band::Z, Band::Y]
        .into_iter()
        .collect()
}

impl Default for QualityCuts {
    fn default() -> Self {
        Self {
            min_exposure_time: default_min_exposure_time(),
            max_exposure_time: default_max_exposure_time(),
            min_quality: default_min_quality(),
            bands: default_bands(),
        }
    }
}

impl QualityCuts {
    pub fn accepts(&self, record: &ExposureRecord) -> bool {
        (self.min_exposure_time..=self.max_exposure_time).contains(&record.exposure_time)
            && record.quality_metric >= self.min_quality
            && self.bands.contains(&record.band)
    }

    /// Drop every record that fails a cut; order is preserved.
    pub fn apply(&self, table: ExposureTable) -> ExposureTable {
        table.retain(|record| self.accepts(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Night;

    fn exposure(id: i64, exposure_time: f64, teff: f64, band: Band) -> ExposureRecord {
        ExposureRecord {
            exposure_id: id,
            night: Night::new(20230101),
            mjd: 59945.1,
            ra: 60.0,
            dec: -30.0,
            band,
            exposure_time,
            quality_metric: teff,
            propid: String::new(),
            obs_type: "object".to_string(),
            object: String::new(),
            is_search: false,
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let cuts = QualityCuts::default();
        assert!(cuts.accepts(&exposure(1, 30.0, 0.05, Band::G)));
        assert!(cuts.accepts(&exposure(2, 200.0, 0.05, Band::G)));
        assert!(!cuts.accepts(&exposure(3, 29.9, 0.5, Band::G)));
        assert!(!cuts.accepts(&exposure(4, 200.1, 0.5, Band::G)));
        assert!(!cuts.accepts(&exposure(5, 90.0, 0.049, Band::G)));
    }

    #[test]
    fn test_band_outside_set_rejected() {
        let cuts = QualityCuts::default();
        assert!(!cuts.accepts(&exposure(1, 90.0, 0.5, Band::VR)));
        assert!(!cuts.accepts(&exposure(2, 90.0, 0.5, Band::Other("N964".to_string()))));
    }

    #[test]
    fn test_apply_preserves_order() {
        let table = ExposureTable::new(vec![
            exposure(3, 90.0, 0.5, Band::R),
            exposure(1, 10.0, 0.5, Band::R),
            exposure(2, 90.0, 0.5, Band::Z),
        ])
        .unwrap();

        let kept = QualityCuts::default().apply(table);
        let ids: Vec<i64> = kept.iter().map(|r| r.exposure_id).collect();
        assert_eq!(ids, vec![3, 2]);
    }
}

//! Strategies for choosing which candidates on the chosen nights become search
//! exposures when there are more than the cap allows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::ExposureRecord;

/// Picks at most `cap` of the candidate records.
///
/// `candidates` holds `(table index, record)` pairs in input order; the
/// returned indices are the ones marked search.
pub trait SearchSelection: Send + Sync {
    fn name(&self) -> &'static str;

    fn select(&self, candidates: &[(usize, &ExposureRecord)], cap: usize) -> Vec<usize>;
}

/// First `cap` candidates in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncounterOrder;

impl SearchSelection for EncounterOrder {
    fn name(&self) -> &'static str {
        "encounter-order"
    }

    fn select(&self, candidates: &[(usize, &ExposureRecord)], cap: usize) -> Vec<usize> {
        candidates.iter().take(cap).map(|(idx, _)| *idx).collect()
    }
}

/// `cap` candidates with the best quality metric; ties keep input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestQuality;

impl SearchSelection for HighestQuality {
    fn name(&self) -> &'static str {
        "highest-quality"
    }

    fn select(&self, candidates: &[(usize, &ExposureRecord)], cap: usize) -> Vec<usize> {
        let mut ranked: Vec<(usize, &ExposureRecord)> = candidates.to_vec();
        // Stable sort keeps input order among equal scores
        ranked.sort_by(|a, b| b.1.quality_metric.total_cmp(&a.1.quality_metric));
        ranked.into_iter().take(cap).map(|(idx, _)| idx).collect()
    }
}

/// Configurable name for the built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    #[default]
    EncounterOrder,
    HighestQuality,
}

impl SelectionPolicy {
    pub fn strategy(&self) -> Box<dyn SearchSelection> {
        match self {
            SelectionPolicy::EncounterOrder => Box::new(EncounterOrder),
            SelectionPolicy::HighestQuality => Box::new(HighestQuality),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "encounter-order" | "encounter_order" => Ok(Self::EncounterOrder),
            "highest-quality" | "highest_quality" => Ok(Self::HighestQuality),
            _ => Err(format!(
                "Unknown selection policy: {}. Use 'encounter-order' or 'highest-quality'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Band, Night};

    fn exposure(id: i64, teff: f64) -> ExposureRecord {
        ExposureRecord {
            exposure_id: id,
            night: Night::new(20230101),
            mjd: 59945.0,
            ra: 0.0,
            dec: 0.0,
            band: Band::R,
            exposure_time: 90.0,
            quality_metric: teff,
            propid: String::new(),
            obs_type: String::new(),
            object: String::new(),
            is_search: false,
        }
    }

    #[test]
    fn test_encounter_order_takes_prefix() {
        let records: Vec<ExposureRecord> = (0..5).map(|i| exposure(i, 0.1 * i as f64)).collect();
        let candidates: Vec<(usize, &ExposureRecord)> = records.iter().enumerate().collect();

        assert_eq!(EncounterOrder.select(&candidates, 3), vec![0, 1, 2]);
        assert_eq!(EncounterOrder.select(&candidates, 10).len(), 5);
    }

    #[test]
    fn test_highest_quality_prefers_teff_then_order() {
        let records = vec![exposure(1, 0.2), exposure(2, 0.9), exposure(3, 0.2), exposure(4, 0.5)];
        let candidates: Vec<(usize, &ExposureRecord)> = records.iter().enumerate().collect();

        assert_eq!(HighestQuality.select(&candidates, 3), vec![1, 3, 0]);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "highest-quality".parse::<SelectionPolicy>().unwrap(),
            SelectionPolicy::HighestQuality
        );
        assert!("random".parse::<SelectionPolicy>().is_err());
        assert_eq!(SelectionPolicy::default().to_string(), "encounter-order");
    }
}

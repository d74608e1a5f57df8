//! Exposure records and the typed table the selection code works on.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{Band, Night};
use crate::error::{DagError, DagResult};

/// One telescope exposure as returned by the catalog.
///
/// `is_search` is not part of the catalog row: it starts out `false` and is
/// assigned by the partitioner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    pub exposure_id: i64,
    pub night: Night,
    pub mjd: f64,
    pub ra: f64,
    pub dec: f64,
    pub band: Band,
    /// Exposure duration in seconds
    pub exposure_time: f64,
    /// Effective-exposure-time quality score (teff); higher is better
    pub quality_metric: f64,
    #[serde(default)]
    pub propid: String,
    #[serde(default)]
    pub obs_type: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub is_search: bool,
}

/// Ordered batch of exposures with unique ids.
///
/// Input order is preserved by every operation; the partitioner's search cap
/// depends on it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposureTable {
    records: Vec<ExposureRecord>,
}

impl ExposureTable {
    /// Build a table, rejecting duplicate exposure ids.
    pub fn new(records: Vec<ExposureRecord>) -> DagResult<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.exposure_id) {
                return Err(DagError::DuplicateExposure(record.exposure_id));
            }
        }
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExposureRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ExposureRecord] {
        &self.records
    }

    pub(crate) fn records_mut(&mut self) -> &mut [ExposureRecord] {
        &mut self.records
    }

    pub fn into_records(self) -> Vec<ExposureRecord> {
        self.records
    }

    pub fn search(&self) -> impl Iterator<Item = &ExposureRecord> {
        self.records.iter().filter(|r| r.is_search)
    }

    pub fn templates(&self) -> impl Iterator<Item = &ExposureRecord> {
        self.records.iter().filter(|r| !r.is_search)
    }

    pub fn search_ids(&self) -> Vec<i64> {
        self.search().map(|r| r.exposure_id).collect()
    }

    /// Record indices grouped by night, nights ascending, indices in input order.
    pub fn nights(&self) -> BTreeMap<Night, Vec<usize>> {
        let mut groups: BTreeMap<Night, Vec<usize>> = BTreeMap::new();
        for (idx, record) in self.records.iter().enumerate() {
            groups.entry(record.night).or_default().push(idx);
        }
        groups
    }

    pub fn distinct_nights(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.night)
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn clear_search_flags(&mut self) {
        for record in &mut self.records {
            record.is_search = false;
        }
    }

    /// Keep the records matching `predicate`, preserving order.
    pub fn retain<F>(mut self, predicate: F) -> Self
    where
        F: FnMut(&ExposureRecord) -> bool,
    {
        self.records.retain(predicate);
        self
    }
}

impl<'a> IntoIterator for &'a ExposureTable {
    type Item = &'a ExposureRecord;
    type IntoIter = std::slice::Iter<'a, ExposureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, night: u32) -> ExposureRecord {
        ExposureRecord {
            exposure_id: id,
            night: Night::new(night),
            mjd: 59000.0,
            ra: 10.0,
            dec: -20.0,
            band: Band::I,
            exposure_time: 90.0,
            quality_metric: 0.5,
            propid: "2023B-0001".to_string(),
            obs_type: "object".to_string(),
            object: "field".to_string(),
            is_search: false,
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ExposureTable::new(vec![record(1, 20230101), record(1, 20230102)]);
        assert!(matches!(result, Err(DagError::DuplicateExposure(1))));
    }

    #[test]
    fn test_nights_grouping_keeps_input_order() {
        let table = ExposureTable::new(vec![
            record(3, 20230102),
            record(1, 20230101),
            record(2, 20230102),
        ])
        .unwrap();

        let groups = table.nights();
        let keys: Vec<u32> = groups.keys().map(|n| n.code()).collect();
        assert_eq!(keys, vec![20230101, 20230102]);
        assert_eq!(groups[&Night::new(20230102)], vec![0, 2]);
        assert_eq!(table.distinct_nights(), 2);
    }

    #[test]
    fn test_search_and_templates_split() {
        let mut a = record(1, 20230101);
        a.is_search = true;
        let table = ExposureTable::new(vec![a, record(2, 20230101)]).unwrap();

        assert_eq!(table.search_ids(), vec![1]);
        assert_eq!(table.templates().count(), 1);
    }

    #[test]
    fn test_clear_search_flags() {
        let mut a = record(1, 20230101);
        a.is_search = true;
        let mut table = ExposureTable::new(vec![a]).unwrap();
        table.clear_search_flags();
        assert_eq!(table.search().count(), 0);
    }
}

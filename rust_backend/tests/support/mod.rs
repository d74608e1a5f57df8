//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use diffimg_dag::models::{Band, ExposureRecord, ExposureTable, Night};

/// Science exposure on `night` that passes the default quality cuts.
pub fn exposure(id: i64, night: Night) -> ExposureRecord {
    ExposureRecord {
        exposure_id: id,
        night,
        mjd: 59000.0 + id as f64 * 0.01,
        ra: 120.0,
        dec: -35.0,
        band: Band::I,
        exposure_time: 90.0,
        quality_metric: 0.3,
        propid: "2023A-0001".to_string(),
        obs_type: "object".to_string(),
        object: "GW field".to_string(),
        is_search: false,
    }
}

/// Night `offset` days after 2023-01-01.
pub fn night(offset: u32) -> Night {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    Night::from_date(start + Duration::days(offset as i64))
}

/// Records with ids assigned in order, `count` per `(night offset, count)` entry.
pub fn records(layout: &[(u32, usize)]) -> Vec<ExposureRecord> {
    let mut next_id = 1;
    let mut out = Vec::new();
    for &(offset, count) in layout {
        for _ in 0..count {
            out.push(exposure(next_id, night(offset)));
            next_id += 1;
        }
    }
    out
}

pub fn table(layout: &[(u32, usize)]) -> ExposureTable {
    ExposureTable::new(records(layout)).unwrap()
}

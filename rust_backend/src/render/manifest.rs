//! Exposure manifests handed to the DAG and the post-processing tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::error::{DagError, DagResult};
use crate::io::{ExposureRow, CSV_COLUMNS};
use crate::models::{ExposureRecord, ExposureTable};

/// Write the search-flagged exposure ids, one per line, in table order.
///
/// Returns the number of ids written.
pub fn write_search_list(path: &Path, table: &ExposureTable) -> DagResult<usize> {
    let file = File::create(path).map_err(|e| DagError::write(path, e))?;
    let mut out = BufWriter::new(file);

    let mut count = 0;
    for id in table.search_ids() {
        writeln!(out, "{}", id).map_err(|e| DagError::write(path, e))?;
        count += 1;
    }
    out.flush().map_err(|e| DagError::write(path, e))?;
    Ok(count)
}

/// Write the full annotated table, `SEARCH` column included.
///
/// The output loads back through `ExposureTableLoader::load_from_csv`.
pub fn write_annotated_table(path: &Path, table: &ExposureTable) -> DagResult<()> {
    let mut writer = headed_writer(path, &CSV_COLUMNS)?;
    for record in table {
        writer.serialize(ExposureRow::from(record))?;
    }
    writer.flush().map_err(|e| DagError::write(path, e))?;
    Ok(())
}

const EXPOSURE_INFO_COLUMNS: [&str; 5] = ["exposure", "nite", "radeg", "decdeg", "band"];

/// CSV writer with `columns` already written, so an empty input still yields a header.
fn headed_writer(path: &Path, columns: &[&str]) -> DagResult<csv::Writer<File>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(columns)?;
    Ok(writer)
}

/// Row of the per-exposure summary used by the post-processing tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExposureInfoRow {
    pub exposure: i64,
    pub nite: u32,
    pub radeg: f64,
    pub decdeg: f64,
    pub band: String,
}

impl From<&ExposureRecord> for ExposureInfoRow {
    fn from(record: &ExposureRecord) -> Self {
        Self {
            exposure: record.exposure_id,
            nite: record.night.code(),
            radeg: record.ra,
            decdeg: record.dec,
            band: record.band.to_string(),
        }
    }
}

/// Write `exposure,nite,radeg,decdeg,band` rows for `records` in the given order.
pub fn write_exposure_info(path: &Path, records: &[ExposureRecord]) -> DagResult<()> {
    let mut writer = headed_writer(path, &EXPOSURE_INFO_COLUMNS)?;
    for record in records {
        writer.serialize(ExposureInfoRow::from(record))?;
    }
    writer.flush().map_err(|e| DagError::write(path, e))?;
    Ok(())
}

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::db::repository::{CatalogError, CatalogResult};
use crate::error::{DagError, DagResult};
use crate::models::{Band, ExposureRecord, Night};

/// Column order of the whitespace-separated `.tab` exposure dumps.
pub const TAB_COLUMNS: [&str; 12] = [
    "EXPNUM", "NITE", "MJD", "RA", "DEC", "BAND", "EXPTIME", "PROPID", "OBJECT", "TEFF",
    "COMMENT", "SEARCH",
];

/// Header of CSV exposure tables, in [`ExposureRow`] field order.
pub const CSV_COLUMNS: [&str; 12] = [
    "EXPNUM", "NITE", "MJD", "RA", "DEC", "BAND", "EXPTIME", "PROPID", "OBSTYPE", "OBJECT",
    "TEFF", "SEARCH",
];

/// One exposure row as stored in CSV tables.
///
/// This is also the layout of the annotated table written next to the search
/// manifest, so a written table can be loaded back as a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRow {
    #[serde(rename = "EXPNUM")]
    pub expnum: i64,
    #[serde(rename = "NITE")]
    pub nite: u32,
    #[serde(rename = "MJD")]
    pub mjd: f64,
    #[serde(rename = "RA")]
    pub ra: f64,
    #[serde(rename = "DEC")]
    pub dec: f64,
    #[serde(rename = "BAND")]
    pub band: String,
    #[serde(rename = "EXPTIME")]
    pub exptime: f64,
    #[serde(rename = "PROPID", default)]
    pub propid: String,
    #[serde(rename = "OBSTYPE", default)]
    pub obstype: String,
    #[serde(rename = "OBJECT", default)]
    pub object: String,
    #[serde(rename = "TEFF")]
    pub teff: f64,
    #[serde(rename = "SEARCH", default)]
    pub search: Option<bool>,
}

impl TryFrom<ExposureRow> for ExposureRecord {
    type Error = CatalogError;

    fn try_from(row: ExposureRow) -> CatalogResult<Self> {
        let band = row.band.parse::<Band>().map_err(|e| {
            CatalogError::SchemaError(format!("exposure {}: {}", row.expnum, e))
        })?;
        Ok(ExposureRecord {
            exposure_id: row.expnum,
            night: Night::new(row.nite),
            mjd: row.mjd,
            ra: row.ra,
            dec: row.dec,
            band,
            exposure_time: row.exptime,
            quality_metric: row.teff,
            propid: row.propid,
            obs_type: row.obstype,
            object: row.object,
            is_search: row.search.unwrap_or(false),
        })
    }
}

impl From<&ExposureRecord> for ExposureRow {
    fn from(record: &ExposureRecord) -> Self {
        Self {
            expnum: record.exposure_id,
            nite: record.night.code(),
            mjd: record.mjd,
            ra: record.ra,
            dec: record.dec,
            band: record.band.to_string(),
            exptime: record.exposure_time,
            propid: record.propid.clone(),
            obstype: record.obs_type.clone(),
            object: record.object.clone(),
            teff: record.quality_metric,
            search: Some(record.is_search),
        }
    }
}

/// Loads exposure tables into typed records.
pub struct ExposureTableLoader;

impl ExposureTableLoader {
    /// Load a table, picking the format from the extension (`.tab` is
    /// whitespace-separated without a header, everything else is CSV).
    pub fn load_from_file(path: &Path) -> CatalogResult<Vec<ExposureRecord>> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tab") => Self::load_from_tab(path),
            _ => Self::load_from_csv(path),
        }
    }

    /// Load a headed CSV table. A missing or malformed column fails the whole load.
    pub fn load_from_csv(path: &Path) -> CatalogResult<Vec<ExposureRecord>> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            CatalogError::ConnectionError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        reader
            .deserialize::<ExposureRow>()
            .enumerate()
            .map(|(idx, row)| {
                let row = row.map_err(|e| {
                    CatalogError::SchemaError(format!(
                        "{} row {}: {}",
                        path.display(),
                        idx + 1,
                        e
                    ))
                })?;
                ExposureRecord::try_from(row)
            })
            .collect()
    }

    /// Load a whitespace-separated dump in [`TAB_COLUMNS`] order.
    pub fn load_from_tab(path: &Path) -> CatalogResult<Vec<ExposureRecord>> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::ConnectionError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse_tab(&content)
    }

    pub fn parse_tab(content: &str) -> CatalogResult<Vec<ExposureRecord>> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .map(|(idx, line)| parse_tab_line(idx + 1, line))
            .collect()
    }
}

fn parse_tab_line(line_no: usize, line: &str) -> CatalogResult<ExposureRecord> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != TAB_COLUMNS.len() {
        return Err(CatalogError::SchemaError(format!(
            "line {}: expected {} columns, found {}",
            line_no,
            TAB_COLUMNS.len(),
            fields.len()
        )));
    }

    fn field<T: std::str::FromStr>(fields: &[&str], col: usize, line_no: usize) -> CatalogResult<T> {
        fields[col].parse::<T>().map_err(|_| {
            CatalogError::SchemaError(format!(
                "line {}: invalid {} value {:?}",
                line_no, TAB_COLUMNS[col], fields[col]
            ))
        })
    }

    let search = match fields[11].to_lowercase().as_str() {
        "true" | "t" | "1" => true,
        "false" | "f" | "0" => false,
        other => {
            return Err(CatalogError::SchemaError(format!(
                "line {}: invalid SEARCH value {:?}",
                line_no, other
            )))
        }
    };

    let row = ExposureRow {
        expnum: field(&fields, 0, line_no)?,
        nite: field(&fields, 1, line_no)?,
        mjd: field(&fields, 2, line_no)?,
        ra: field(&fields, 3, line_no)?,
        dec: field(&fields, 4, line_no)?,
        band: fields[5].to_string(),
        exptime: field(&fields, 6, line_no)?,
        propid: fields[7].to_string(),
        obstype: "object".to_string(),
        object: fields[8].to_string(),
        teff: field(&fields, 9, line_no)?,
        search: Some(search),
    };
    ExposureRecord::try_from(row)
}

/// Read an exposure id list: one id per line, blank lines ignored.
pub fn read_id_list(path: &Path) -> DagResult<Vec<i64>> {
    let content = fs::read_to_string(path).map_err(|e| DagError::read(path, e))?;
    parse_id_list(&content)
}

pub fn parse_id_list(content: &str) -> DagResult<Vec<i64>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<i64>()
                .map_err(|_| DagError::Config(format!("Invalid exposure id in list: {:?}", line)))
        })
        .collect()
}

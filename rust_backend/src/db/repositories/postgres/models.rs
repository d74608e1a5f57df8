use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable, Text, Timestamptz};

use crate::db::repository::{CatalogError, CatalogResult};
use crate::models::{Band, ExposureRecord, Night};
use crate::time::datetime_to_mjd;

/// Raw row of the exposure catalog query.
#[derive(Debug, Clone, QueryableByName)]
pub struct ExposureQueryRow {
    #[diesel(sql_type = BigInt)]
    pub id: i64,
    #[diesel(sql_type = Timestamptz)]
    pub obs_date: DateTime<Utc>,
    #[diesel(sql_type = Double)]
    pub ra: f64,
    #[diesel(sql_type = Double)]
    pub declination: f64,
    #[diesel(sql_type = Text)]
    pub filter: String,
    #[diesel(sql_type = Double)]
    pub exptime: f64,
    #[diesel(sql_type = Nullable<Text>)]
    pub propid: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub obstype: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub object: Option<String>,
    #[diesel(sql_type = Nullable<Double>)]
    pub t_eff: Option<f64>,
}

impl TryFrom<ExposureQueryRow> for ExposureRecord {
    type Error = CatalogError;

    fn try_from(row: ExposureQueryRow) -> CatalogResult<Self> {
        let band = row
            .filter
            .parse::<Band>()
            .map_err(|e| CatalogError::SchemaError(format!("exposure {}: {}", row.id, e)))?;

        Ok(ExposureRecord {
            exposure_id: row.id,
            night: Night::from_observation(&row.obs_date),
            mjd: datetime_to_mjd(&row.obs_date),
            ra: row.ra,
            dec: row.declination,
            band,
            exposure_time: row.exptime,
            // No QA entry yet: treat as unusable rather than guessing
            quality_metric: row.t_eff.unwrap_or(0.0),
            propid: row.propid.unwrap_or_default(),
            obs_type: row.obstype.unwrap_or_default(),
            object: row.object.unwrap_or_default(),
            is_search: false,
        })
    }
}

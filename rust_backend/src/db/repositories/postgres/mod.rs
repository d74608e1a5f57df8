//! Postgres exposure catalog using Diesel.
//!
//! Every query is a parameterized `sql_query`; values are bound, never
//! spliced into the SQL text.

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel::sql_types::{Array, BigInt, Double, Text};
use tokio::task;

use crate::db::repository::{CatalogError, CatalogResult, ExposureCatalog, SCIENCE_OBSTYPE};
use crate::models::{ExposureRecord, SkyBox};

mod models;

use models::ExposureQueryRow;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const SELECT_EXPOSURES: &str = "SELECT e.id, e.date AS obs_date, e.ra, e.declination, \
     e.filter, e.exptime, e.propid, e.obstype, e.object, q.t_eff \
     FROM exposure.exposure e \
     LEFT JOIN exposure.qa_summary q ON q.expid = e.id";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_pool_size: u32,
}

impl PostgresConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let max_pool_size = std::env::var("PG_POOL_MAX")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);

        Ok(Self {
            database_url,
            max_pool_size,
        })
    }
}

/// Diesel-backed exposure catalog.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    pub fn new(config: PostgresConfig) -> CatalogResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url);
        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .build(manager)
            .map_err(|e| CatalogError::ConnectionError(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn with_conn<T, F>(&self, f: F) -> CatalogResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> CatalogResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| CatalogError::ConnectionError(e.to_string()))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| CatalogError::InternalError(e.to_string()))?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> CatalogError {
    match err {
        diesel::result::Error::NotFound => CatalogError::NotFound("Record not found".into()),
        diesel::result::Error::DeserializationError(e) => CatalogError::SchemaError(e.to_string()),
        other => CatalogError::QueryError(other.to_string()),
    }
}

fn rows_to_records(rows: Vec<ExposureQueryRow>) -> CatalogResult<Vec<ExposureRecord>> {
    rows.into_iter().map(ExposureRecord::try_from).collect()
}

#[async_trait]
impl ExposureCatalog for PostgresCatalog {
    async fn health_check(&self) -> CatalogResult<bool> {
        self.with_conn(|conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn exposures_in_box(&self, sky_box: &SkyBox) -> CatalogResult<Vec<ExposureRecord>> {
        let sky_box = *sky_box;
        self.with_conn(move |conn| {
            let query = format!(
                "{SELECT_EXPOSURES} \
                 WHERE e.obstype = $5 \
                 AND e.declination BETWEEN $3 AND $4 \
                 AND (CASE WHEN $1 <= $2 THEN e.ra BETWEEN $1 AND $2 \
                      ELSE (e.ra >= $1 OR e.ra <= $2) END) \
                 ORDER BY e.id"
            );
            let rows = sql_query(query)
                .bind::<Double, _>(sky_box.ra_min)
                .bind::<Double, _>(sky_box.ra_max)
                .bind::<Double, _>(sky_box.dec_min)
                .bind::<Double, _>(sky_box.dec_max)
                .bind::<Text, _>(SCIENCE_OBSTYPE)
                .load::<ExposureQueryRow>(conn)
                .map_err(map_diesel_error)?;
            rows_to_records(rows)
        })
        .await
    }

    async fn exposures_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<ExposureRecord>> {
        let ids = ids.to_vec();
        self.with_conn(move |conn| {
            let query = format!("{SELECT_EXPOSURES} WHERE e.id = ANY($1) ORDER BY e.id");
            let rows = sql_query(query)
                .bind::<Array<BigInt>, _>(ids)
                .load::<ExposureQueryRow>(conn)
                .map_err(map_diesel_error)?;
            rows_to_records(rows)
        })
        .await
    }

    async fn exposures_in_id_range(
        &self,
        min_id: i64,
        max_id: i64,
    ) -> CatalogResult<Vec<ExposureRecord>> {
        if min_id > max_id {
            return Err(CatalogError::QueryError(format!(
                "Invalid id range {}..={}",
                min_id, max_id
            )));
        }
        self.with_conn(move |conn| {
            let query = format!("{SELECT_EXPOSURES} WHERE e.id BETWEEN $1 AND $2 ORDER BY e.id");
            let rows = sql_query(query)
                .bind::<BigInt, _>(min_id)
                .bind::<BigInt, _>(max_id)
                .load::<ExposureQueryRow>(conn)
                .map_err(map_diesel_error)?;
            rows_to_records(rows)
        })
        .await
    }
}

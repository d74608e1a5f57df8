//! Exposure catalog trait.
//!
//! The catalog is the external database of telescope exposures. Queries carry
//! no retry or timeout policy of their own; callers wrap them if they need one.

use async_trait::async_trait;

use super::error::CatalogResult;
use crate::models::{ExposureRecord, SkyBox};

/// Observation type of science exposures; box queries return only these.
pub const SCIENCE_OBSTYPE: &str = "object";

/// Read-only access to the exposure catalog.
///
/// Every query returns raw rows (`is_search == false`) ordered by exposure id.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ExposureCatalog: Send + Sync {
    /// Check if the catalog connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(CatalogError)` if an error occurred during the check
    async fn health_check(&self) -> CatalogResult<bool>;

    /// All science exposures whose pointing falls inside `sky_box`.
    ///
    /// # Arguments
    /// * `sky_box` - RA/Dec box in degrees; may wrap through RA = 0
    async fn exposures_in_box(&self, sky_box: &SkyBox) -> CatalogResult<Vec<ExposureRecord>>;

    /// Exposures for an explicit list of ids. Unknown ids are skipped.
    async fn exposures_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<ExposureRecord>>;

    /// Exposures with `min_id <= id <= max_id`.
    async fn exposures_in_id_range(
        &self,
        min_id: i64,
        max_id: i64,
    ) -> CatalogResult<Vec<ExposureRecord>>;
}

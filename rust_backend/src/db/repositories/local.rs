//! In-memory local catalog implementation.
//!
//! This module provides a catalog held entirely in memory, suitable for unit
//! testing, offline runs against an exported exposure table, and local
//! development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::db::repository::*;
use crate::io::ExposureTableLoader;
use crate::models::{ExposureRecord, SkyBox};

/// In-memory exposure catalog.
///
/// Rows are keyed by exposure id, so every query comes back in id order just
/// like the database-backed catalog.
///
/// # Example
/// ```
/// use diffimg_dag::db::LocalCatalog;
///
/// let catalog = LocalCatalog::new();
/// assert_eq!(catalog.exposure_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct LocalCatalog {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    exposures: BTreeMap<i64, ExposureRecord>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            exposures: BTreeMap::new(),
            is_healthy: true,
        }
    }
}

impl LocalCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `records`. A later record with a repeated id replaces the earlier one.
    pub fn with_exposures(records: impl IntoIterator<Item = ExposureRecord>) -> Self {
        let catalog = Self::new();
        catalog.insert_all(records);
        catalog
    }

    /// Load an exported exposure table (`.csv` or `.tab`).
    ///
    /// # Errors
    /// `CatalogError::SchemaError` for missing or malformed columns,
    /// `CatalogError::ConnectionError` if the file cannot be read.
    pub fn from_file(path: &Path) -> CatalogResult<Self> {
        let records = ExposureTableLoader::load_from_file(path)?;
        Ok(Self::with_exposures(records))
    }

    /// Add exposures to the catalog. Search flags are dropped: the catalog only holds raw rows.
    pub fn insert_all(&self, records: impl IntoIterator<Item = ExposureRecord>) {
        let mut data = self.write();
        for mut record in records {
            record.is_search = false;
            data.exposures.insert(record.exposure_id, record);
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.write().is_healthy = healthy;
    }

    /// Get the number of exposures stored.
    pub fn exposure_count(&self) -> usize {
        self.read().exposures.len()
    }

    fn read(&self) -> RwLockReadGuard<'_, LocalData> {
        // A poisoned lock only means another test thread panicked mid-write;
        // the map itself is still usable.
        self.data.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, LocalData> {
        self.data.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> CatalogResult<()> {
        if !self.read().is_healthy {
            return Err(CatalogError::ConnectionError(
                "Catalog is not healthy".to_string(),
            ));
        }
        Ok(())
    }

    fn select<F>(&self, predicate: F) -> CatalogResult<Vec<ExposureRecord>>
    where
        F: Fn(&ExposureRecord) -> bool,
    {
        self.check_health()?;
        Ok(self
            .read()
            .exposures
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ExposureCatalog for LocalCatalog {
    async fn health_check(&self) -> CatalogResult<bool> {
        Ok(self.read().is_healthy)
    }

    async fn exposures_in_box(&self, sky_box: &SkyBox) -> CatalogResult<Vec<ExposureRecord>> {
        self.select(|r| r.obs_type == SCIENCE_OBSTYPE && sky_box.contains(r.ra, r.dec))
    }

    async fn exposures_by_ids(&self, ids: &[i64]) -> CatalogResult<Vec<ExposureRecord>> {
        self.check_health()?;
        let data = self.read();
        let mut found: Vec<ExposureRecord> = ids
            .iter()
            .filter_map(|id| data.exposures.get(id))
            .cloned()
            .collect();
        found.sort_by_key(|r| r.exposure_id);
        found.dedup_by_key(|r| r.exposure_id);
        Ok(found)
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
        self.check_health()?;
        Ok(self
            .read()
            .exposures
            .range(min_id..=max_id)
            .map(|(_, r)| r.clone())
            .collect())
    }
}

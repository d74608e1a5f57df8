//! Catalog factory for dependency injection.
//!
//! This module creates catalog instances from runtime configuration so the
//! workflows only ever see `Arc<dyn ExposureCatalog>`.

use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalCatalog;
use super::repository::{CatalogError, CatalogResult, ExposureCatalog};
use crate::config::AppConfig;

/// Catalog backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogType {
    /// In-memory catalog, optionally loaded from an exported table
    Local,
    /// PostgreSQL exposure database
    Postgres,
}

impl FromStr for CatalogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            _ => Err(format!("Unknown catalog type: {}", s)),
        }
    }
}

/// Catalog factory for creating catalog instances.
///
/// # Example
/// ```no_run
/// use diffimg_dag::config::AppConfig;
/// use diffimg_dag::db::CatalogFactory;
///
/// let config = AppConfig::from_default_location().unwrap_or_default();
/// let catalog = CatalogFactory::create(&config).expect("catalog");
/// ```
pub struct CatalogFactory;

impl CatalogFactory {
    /// Create the catalog described by `config`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn ExposureCatalog>)` - catalog instance
    /// * `Err(CatalogError::ConfigurationError)` - unknown type, missing settings,
    ///   or a backend this build does not include
    pub fn create(config: &AppConfig) -> CatalogResult<Arc<dyn ExposureCatalog>> {
        let catalog_type = config
            .catalog_type()
            .map_err(CatalogError::ConfigurationError)?;

        match catalog_type {
            CatalogType::Local => Self::create_local(config),
            CatalogType::Postgres => Self::create_postgres(config),
        }
    }

    /// Create a local catalog, loading `catalog.exposure_table` when set.
    pub fn create_local(config: &AppConfig) -> CatalogResult<Arc<dyn ExposureCatalog>> {
        let catalog = match &config.catalog.exposure_table {
            Some(path) => LocalCatalog::from_file(path)?,
            None => LocalCatalog::new(),
        };
        Ok(Arc::new(catalog))
    }

    #[cfg(feature = "postgres-repo")]
    pub fn create_postgres(config: &AppConfig) -> CatalogResult<Arc<dyn ExposureCatalog>> {
        use super::repositories::PostgresCatalog;

        let pg_config = config.to_postgres_config()?;
        Ok(Arc::new(PostgresCatalog::new(pg_config)?))
    }

    #[cfg(not(feature = "postgres-repo"))]
    pub fn create_postgres(_config: &AppConfig) -> CatalogResult<Arc<dyn ExposureCatalog>> {
        Err(CatalogError::ConfigurationError(
            "Postgres catalog requires the 'postgres-repo' feature".to_string(),
        ))
    }
}

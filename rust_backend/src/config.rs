//! Application configuration file support.
//!
//! Settings are read from a TOML file; every section and field is optional
//! and falls back to the values the monthly end-to-end runs use.
//!
//! ```toml
//! [catalog]
//! type = "postgres"
//!
//! [postgres]
//! database_url = "postgres://reader@localhost:5443/decam_prd"
//!
//! [selection]
//! max_search = 20
//! policy = "highest-quality"
//!
//! [selection.cuts]
//! min_quality = 0.1
//!
//! [dag]
//! operator_email = "operator@example.org"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::db::CatalogType;
use crate::error::{DagError, DagResult};
use crate::render::DagTemplate;
use crate::selection::{NightBounds, Partitioner, QualityCuts, SelectionPolicy, DEFAULT_MAX_SEARCH};
use crate::services::job_stats::JobStatsPaths;

/// Environment variable overriding `dag.operator_email`.
pub const OPERATOR_EMAIL_ENV: &str = "DIFFIMG_OPERATOR_EMAIL";
/// Environment variable overriding `postgres.database_url`.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub postgres: PostgresSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    #[serde(default)]
    pub window: NightBounds,
    #[serde(default)]
    pub dag: DagTemplate,
    #[serde(default)]
    pub paths: JobStatsPaths,
}

/// Catalog backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(rename = "type", default = "default_catalog_type")]
    pub catalog_type: String,
    /// Exported exposure table backing the local catalog
    #[serde(default)]
    pub exposure_table: Option<PathBuf>,
}

/// Postgres connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub database_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Exposure selection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSettings {
    /// Half-width in degrees of the sky box queried around a pointing
    #[serde(default = "default_box_margin")]
    pub box_margin_deg: f64,
    #[serde(default = "default_max_search")]
    pub max_search: usize,
    #[serde(default)]
    pub policy: SelectionPolicy,
    #[serde(default)]
    pub cuts: QualityCuts,
}

fn default_catalog_type() -> String {
    "local".to_string()
}

fn default_max_connections() -> u32 {
    2
}

fn default_box_margin() -> f64 {
    1.0
}

fn default_max_search() -> usize {
    DEFAULT_MAX_SEARCH
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            catalog_type: default_catalog_type(),
            exposure_table: None,
        }
    }
}

impl Default for PostgresSettings {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            box_margin_deg: default_box_margin(),
            max_search: default_max_search(),
            policy: SelectionPolicy::default(),
            cuts: QualityCuts::default(),
        }
    }
}

impl SelectionSettings {
    pub fn partitioner(&self) -> Partitioner {
        Partitioner::new(self.max_search, self.policy)
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// Parse errors name the offending key path, e.g. `selection.cuts.min_quality`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DagResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| DagError::read(path, e))?;
        Self::from_toml_str(&content)
            .map_err(|e| DagError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        let deserializer = toml::Deserializer::new(content);
        let config: AppConfig = serde_path_to_error::deserialize(deserializer).map_err(|e| {
            let path = e.path().to_string();
            format!("invalid value at '{}': {}", path, e.into_inner())
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the selection cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.selection.max_search < 1 {
            return Err("selection.max_search must be at least 1".to_string());
        }
        let margin = self.selection.box_margin_deg;
        if margin.is_nan() || margin <= 0.0 {
            return Err(format!(
                "selection.box_margin_deg must be positive, got {}",
                margin
            ));
        }
        Ok(())
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `diffimg.toml` in:
    /// 1. Current directory
    /// 2. `rust_backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> DagResult<Self> {
        let search_paths = [
            PathBuf::from("diffimg.toml"),
            PathBuf::from("rust_backend/diffimg.toml"),
            PathBuf::from("../diffimg.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(DagError::Config(
            "No diffimg.toml found in standard locations".to_string(),
        ))
    }

    /// Apply [`OPERATOR_EMAIL_ENV`] and [`DATABASE_URL_ENV`] from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(email) = value(OPERATOR_EMAIL_ENV) {
            self.dag.operator_email = email;
        }
        if let Some(url) = value(DATABASE_URL_ENV) {
            self.postgres.database_url = url;
        }
    }

    /// Get the catalog type from configuration.
    pub fn catalog_type(&self) -> Result<CatalogType, String> {
        CatalogType::from_str(&self.catalog.catalog_type)
    }

    /// Convert the `[postgres]` section into a connection config.
    ///
    /// An empty `database_url` falls back to the environment.
    #[cfg(feature = "postgres-repo")]
    pub fn to_postgres_config(
        &self,
    ) -> crate::db::CatalogResult<crate::db::PostgresConfig> {
        use crate::db::{CatalogError, PostgresConfig};

        if self.postgres.database_url.is_empty() {
            return PostgresConfig::from_env().map_err(CatalogError::ConfigurationError);
        }

        Ok(PostgresConfig {
            database_url: self.postgres.database_url.clone(),
            max_pool_size: self.postgres.max_connections,
        })
    }
}

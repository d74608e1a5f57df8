//! Crate-level error type for the configuration and reporting workflows.

use std::path::PathBuf;

use crate::db::repository::CatalogError;

/// Result type for DAG preparation operations
pub type DagResult<T> = Result<T, DagError>;

/// Error type for DAG preparation operations
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Duplicate exposure id {0} in batch")]
    DuplicateExposure(i64),

    #[error("No search exposures selected; cannot derive a time window")]
    EmptySearchSet,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl DagError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DagError::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DagError::Read {
            path: path.into(),
            source,
        }
    }
}

//! Error types for exposure catalog operations.

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Failure of a catalog query or of loading an exported table.
///
/// Catalog errors reach the caller untranslated; the batch aborts on any of them.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Database or table file unreachable, or the local catalog marked unhealthy
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Rejected query, including an inverted id range
    #[error("Query error: {0}")]
    QueryError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or malformed column in a catalog row
    #[error("Schema mismatch: {0}")]
    SchemaError(String),

    /// Unknown backend or missing connection settings
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Worker thread failure around a blocking query
    #[error("Internal error: {0}")]
    InternalError(String),
}

//! Catalog implementations.
//!
//! - `local`: In-memory implementation for tests and offline runs
//! - `postgres`: PostgreSQL implementation with Diesel

pub mod local;
#[cfg(feature = "postgres-repo")]
pub mod postgres;

pub use local::LocalCatalog;
#[cfg(feature = "postgres-repo")]
pub use postgres::{PostgresCatalog, PostgresConfig};

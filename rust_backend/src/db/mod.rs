//! Exposure catalog access.
//!
//! The catalog is an external database; this module only reads from it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Workflows (services::exposure_info, services::job_stats)│
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ExposureCatalog trait (repository/)                    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ Postgres Catalog │     │  Local Catalog          │
//! │ (Diesel, bound   │     │  (in-memory / exported  │
//! │  parameters)     │     │   table)                │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! Use [`CatalogFactory`] to build the backend named in the configuration.

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{CatalogFactory, CatalogType};
pub use repositories::LocalCatalog;
#[cfg(feature = "postgres-repo")]
pub use repositories::{PostgresCatalog, PostgresConfig};
pub use repository::{CatalogError, CatalogResult, ExposureCatalog, SCIENCE_OBSTYPE};

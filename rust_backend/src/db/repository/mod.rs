//! Catalog trait definitions.
//!
//! - [`error`]: Error types for catalog operations
//! - [`catalog`]: The [`ExposureCatalog`] query interface

pub mod catalog;
pub mod error;

pub use catalog::{ExposureCatalog, SCIENCE_OBSTYPE};
pub use error::{CatalogError, CatalogResult};

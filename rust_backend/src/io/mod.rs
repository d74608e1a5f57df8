//! Exposure table and id-list loading.
//!
//! # Example
//!
//! ```no_run
//! use diffimg_dag::io::ExposureTableLoader;
//! use std::path::Path;
//!
//! let records = ExposureTableLoader::load_from_file(Path::new("sample_exposures.tab"))
//!     .expect("Failed to load");
//! println!("Loaded {} exposures", records.len());
//! ```

pub mod loaders;

#[cfg(test)]
mod loaders_tests;

pub use loaders::{
    parse_id_list, read_id_list, ExposureRow, ExposureTableLoader, CSV_COLUMNS, TAB_COLUMNS,
};

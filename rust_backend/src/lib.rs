//! Set-up tooling for monthly DiffImg end-to-end runs.
//!
//! Given a sky pointing, the crate queries the exposure catalog, applies the
//! quality cuts, splits the exposures into a search set and a template set,
//! and writes the files the DiffImg DAG consumes:
//!
//! - [`render::DagTemplate`]: the DAGMaker `.rc` with `SEASON`, `TWINDOW`,
//!   `MIN_NITE` and `MAX_NITE` filled in
//! - [`render::manifest`]: the search exposure list and the annotated table
//! - [`render::PostprocIni`]: the post-processing configuration
//!
//! [`services::job_stats`] reports on the outputs of a submitted run.
//!
//! # Modules
//!
//! - [`config`]: TOML configuration
//! - [`db`]: exposure catalog trait and backends
//! - [`error`]: crate error type
//! - [`io`]: exposure table and id list loading
//! - [`logging`]: tracing setup and per-operation scopes
//! - [`models`]: exposures, nights, bands, seasons, pointings
//! - [`render`]: output files
//! - [`selection`]: quality cuts, partitioning and the time window
//! - [`services`]: end-to-end workflows
//! - [`time`]: MJD conversions

pub mod config;
pub mod db;
pub mod error;
pub mod io;
pub mod logging;
pub mod models;
pub mod render;
pub mod selection;
pub mod services;
pub mod time;

pub use error::{DagError, DagResult};

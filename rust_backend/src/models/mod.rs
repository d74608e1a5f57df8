//! Domain types for exposure selection.
//!
//! - [`ExposureRecord`] / [`ExposureTable`]: typed rows from the exposure catalog
//! - [`Night`]: `YYYYMMDD` observing-night code with calendar adjacency
//! - [`Band`]: DECam filter
//! - [`Season`]: `YYMM` pipeline-run identifier
//! - [`Pointing`] / [`SkyBox`]: where to look

pub mod band;
pub mod exposure;
pub mod night;
pub mod pointing;
pub mod season;

pub use band::Band;
pub use exposure::{ExposureRecord, ExposureTable};
pub use night::Night;
pub use pointing::{Pointing, SkyBox, DECAM_MAX_DEC};
pub use season::Season;

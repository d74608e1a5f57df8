//! Time conversions shared by the catalog backends and the night model.

pub mod mjd;

pub use mjd::{datetime_to_mjd, mjd_to_datetime, MJD_UNIX_EPOCH};

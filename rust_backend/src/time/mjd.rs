use chrono::{DateTime, TimeZone, Utc};

/// MJD of the Unix epoch (1970-01-01T00:00:00Z).
pub const MJD_UNIX_EPOCH: f64 = 40587.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert Modified Julian Date to a UTC timestamp
///
/// # Arguments
/// * `mjd` - Modified Julian Date value
///
/// # Returns
/// * `Some(DateTime<Utc>)` - the instant, rounded to the microsecond
/// * `None` - if the value is outside chrono's representable range
///
/// # Example
/// ```
/// use diffimg_dag::time::mjd_to_datetime;
/// let dt = mjd_to_datetime(59580.0).unwrap();
/// assert_eq!(dt.to_rfc3339(), "2022-01-01T00:00:00+00:00");
/// ```
pub fn mjd_to_datetime(mjd: f64) -> Option<DateTime<Utc>> {
    if !mjd.is_finite() {
        return None;
    }
    let micros = ((mjd - MJD_UNIX_EPOCH) * SECONDS_PER_DAY * 1e6).round();
    if micros.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_micros(micros as i64).single()
}

/// Convert a UTC timestamp to Modified Julian Date
pub fn datetime_to_mjd(datetime: &DateTime<Utc>) -> f64 {
    let seconds = datetime.timestamp() as f64
        + f64::from(datetime.timestamp_subsec_micros()) / 1e6;
    seconds / SECONDS_PER_DAY + MJD_UNIX_EPOCH
}

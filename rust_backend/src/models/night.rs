//! Observing-night identifiers.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar night bucket in `YYYYMMDD` form.
///
/// A night groups every exposure taken during one observing session. The
/// code is the local date on which the night *started*, which for DECam is
/// the UTC date of the observation shifted back by twelve hours.
///
/// # Examples
///
/// ```
/// use diffimg_dag::models::Night;
///
/// let night = Night::new(20230131);
/// assert!(night.is_followed_by(Night::new(20230201)));
/// assert!(!night.is_followed_by(Night::new(20230202)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Night(u32);

impl Night {
    pub fn new(code: u32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    /// Calendar date of this night, `None` if the code is not a real date.
    pub fn to_date(&self) -> Option<NaiveDate> {
        let year = (self.0 / 10_000) as i32;
        let month = (self.0 / 100) % 100;
        let day = self.0 % 100;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        // Years before 0 never show up in a survey archive.
        let year = date.year().max(0) as u32;
        Self(year * 10_000 + date.month() * 100 + date.day())
    }

    /// Night an observation belongs to: the date of `timestamp - 12h`.
    pub fn from_observation(timestamp: &DateTime<Utc>) -> Self {
        Self::from_date((*timestamp - Duration::hours(12)).date_naive())
    }

    /// True when `other` is the calendar day right after this night.
    pub fn is_followed_by(&self, other: Night) -> bool {
        match (self.to_date(), other.to_date()) {
            (Some(a), Some(b)) => a.succ_opt() == Some(b),
            // Malformed codes: plain integer adjacency is the best we can do
            _ => self.0.checked_add(1) == Some(other.0),
        }
    }
}

impl fmt::Display for Night {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Night {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_roundtrip() {
        let night = Night::new(20211106);
        let date = night.to_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 11, 6).unwrap());
        assert_eq!(Night::from_date(date), night);
    }

    #[test]
    fn test_invalid_code_has_no_date() {
        assert!(Night::new(20230230).to_date().is_none());
        assert!(Night::new(0).to_date().is_none());
    }

    #[test]
    fn test_consecutive_across_boundaries() {
        assert!(Night::new(20230101).is_followed_by(Night::new(20230102)));
        assert!(Night::new(20230228).is_followed_by(Night::new(20230301)));
        assert!(Night::new(20221231).is_followed_by(Night::new(20230101)));
        assert!(!Night::new(20230102).is_followed_by(Night::new(20230101)));
        assert!(!Night::new(20230101).is_followed_by(Night::new(20230101)));
    }

    #[test]
    fn test_observation_before_noon_belongs_to_previous_night() {
        let early = Utc.with_ymd_and_hms(2023, 1, 2, 5, 30, 0).unwrap();
        assert_eq!(Night::from_observation(&early), Night::new(20230101));

        let evening = Utc.with_ymd_and_hms(2023, 1, 2, 23, 0, 0).unwrap();
        assert_eq!(Night::from_observation(&evening), Night::new(20230102));
    }
}

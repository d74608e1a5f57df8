use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline-run identifier in `YYMM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Season(u32);

impl Season {
    pub fn new(code: u32) -> Self {
        Self(code)
    }

    /// `(year - 2000) * 100 + month`, e.g. 2021-11-06 gives 2111.
    pub fn from_date(date: NaiveDate) -> Self {
        let years = (date.year() - 2000).max(0) as u32;
        Self(years * 100 + date.month())
    }

    pub fn code(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// DECam filter bands as spelled by the exposure catalog.
///
/// Filters without a dedicated variant (narrowband `N964`, engineering
/// filters) are kept as [`Band::Other`] so the quality cuts can drop them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Band {
    U,
    G,
    R,
    I,
    Z,
    Y,
    VR,
    Other(String),
}

impl Band {
    /// Broadband filters with a dedicated variant.
    pub const ALL: [Band; 7] = [Band::U, Band::G, Band::R, Band::I, Band::Z, Band::Y, Band::VR];

    pub fn as_str(&self) -> &str {
        match self {
            Band::U => "u",
            Band::G => "g",
            Band::R => "r",
            Band::I => "i",
            Band::Z => "z",
            Band::Y => "Y",
            Band::VR => "VR",
            Band::Other(name) => name,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Band {
    type Err = String;

    /// Case-sensitive. Only an empty name is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err("Empty filter band".to_string());
        }
        Ok(Band::ALL
            .into_iter()
            .find(|band| band.as_str() == name)
            .unwrap_or_else(|| Band::Other(name.to_string())))
    }
}

impl TryFrom<String> for Band {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Band> for String {
    fn from(band: Band) -> Self {
        match band {
            Band::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

//! Provider region (platform) selector

use crate::RippleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Platform routing values accepted by the provider
pub const KNOWN_REGIONS: &[&str] = &[
    "br1", "eun1", "euw1", "jp1", "kr", "la1", "la2", "na1", "oc1", "ph2", "ru", "sg2", "th2",
    "tr1", "tw2", "vn2",
];

/// A validated, lower-case region selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Region(String);

impl Region {
    /// Parses a region, accepting any casing
    ///
    /// # Returns
    ///
    /// * `Ok(Region)` - The region is one of [`KNOWN_REGIONS`]
    /// * `Err(RippleError::Usage)` - The region is unknown
    pub fn parse(input: &str) -> Result<Self, RippleError> {
        let normalized = input.trim().to_ascii_lowercase();
        if KNOWN_REGIONS.contains(&normalized.as_str()) {
            Ok(Self(normalized))
        } else {
            Err(RippleError::Usage(format!(
                "unknown region '{}', expected one of: {}",
                input,
                KNOWN_REGIONS.join(", ")
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Region {
    type Err = RippleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Region {
    type Error = RippleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Region> for String {
    fn from(region: Region) -> Self {
        region.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

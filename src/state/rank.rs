/// Competitive rank definitions
///
/// A rank is a tier plus a division within it, as reported by the provider
/// for the ranked solo queue.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Competitive tier, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

/// Division within a tier (I is the highest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Division {
    I,
    II,
    III,
    IV,
}

/// A participant's current standing in the ranked solo queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankEntry {
    pub tier: Tier,
    pub division: Division,
}

impl RankEntry {
    pub fn new(tier: Tier, division: Division) -> Self {
        Self { tier, division }
    }
}

impl Tier {
    /// Converts the tier to the provider's string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Iron => "IRON",
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::Gold => "GOLD",
            Self::Platinum => "PLATINUM",
            Self::Emerald => "EMERALD",
            Self::Diamond => "DIAMOND",
            Self::Master => "MASTER",
            Self::Grandmaster => "GRANDMASTER",
            Self::Challenger => "CHALLENGER",
        }
    }

    /// Returns all tiers in ascending order
    pub fn all() -> Vec<Self> {
        vec![
            Self::Iron,
            Self::Bronze,
            Self::Silver,
            Self::Gold,
            Self::Platinum,
            Self::Emerald,
            Self::Diamond,
            Self::Master,
            Self::Grandmaster,
            Self::Challenger,
        ]
    }
}

impl Division {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I => "I",
            Self::II => "II",
            Self::III => "III",
            Self::IV => "IV",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| format!("unknown tier '{}'", s))
    }
}

impl FromStr for Division {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "I" => Ok(Self::I),
            "II" => Ok(Self::II),
            "III" => Ok(Self::III),
            "IV" => Ok(Self::IV),
            _ => Err(format!("unknown division '{}'", s)),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RankEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.tier, self.division)
    }
}

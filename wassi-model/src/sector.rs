//! Closed vocabularies used to tag water-use data.
//!
//! Every enum parses the spellings found in county water-use tables
//! (case-insensitive) and serialises to one canonical name. Unknown names
//! are rejected when a document is loaded.

use crate::error::WassiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Water-use sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sector {
    /// Summary across sectors
    All,
    Irrigation,
    Industrial,
    PublicSupply,
    PowerGeneration,
    Domestic,
    Livestock,
    Aquaculture,
    Mining,
}

impl Sector {
    /// Sectors that receive their own stress ratio.
    pub const STRESS_SECTORS: [Sector; 6] = [
        Sector::Irrigation,
        Sector::Industrial,
        Sector::PublicSupply,
        Sector::PowerGeneration,
        Sector::Domestic,
        Sector::Livestock,
    ];

    /// Every leaf sector, i.e. everything except [`Sector::All`].
    pub const LEAVES: [Sector; 8] = [
        Sector::Irrigation,
        Sector::Industrial,
        Sector::PublicSupply,
        Sector::PowerGeneration,
        Sector::Domestic,
        Sector::Livestock,
        Sector::Aquaculture,
        Sector::Mining,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::All => "All",
            Sector::Irrigation => "Irrigation",
            Sector::Industrial => "Industrial",
            Sector::PublicSupply => "Public Supply",
            Sector::PowerGeneration => "Power Generation",
            Sector::Domestic => "Domestic",
            Sector::Livestock => "Livestock",
            Sector::Aquaculture => "Aquaculture",
            Sector::Mining => "Mining",
        }
    }

    pub fn is_leaf(&self) -> bool {
        *self != Sector::All
    }
}

impl FromStr for Sector {
    type Err = WassiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" | "total" | "any" => Ok(Sector::All),
            "irrigation" | "ir" | "crop" | "cropirrigation" => Ok(Sector::Irrigation),
            "industrial" | "in" | "industry" => Ok(Sector::Industrial),
            "publicsupply" | "ps" => Ok(Sector::PublicSupply),
            "powergeneration" | "thermoelectric" | "thermoelectricpower" | "power" | "pt" => {
                Ok(Sector::PowerGeneration)
            }
            "domestic" | "do" | "selfsupplieddomestic" => Ok(Sector::Domestic),
            "livestock" | "li" => Ok(Sector::Livestock),
            "aquaculture" | "aq" => Ok(Sector::Aquaculture),
            "mining" | "mi" => Ok(Sector::Mining),
            _ => Err(WassiError::UnknownSector(s.to_string())),
        }
    }
}

/// Source of a water-use measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WaterSource {
    /// Summary across sources
    All,
    Surface,
    Groundwater,
}

impl WaterSource {
    pub fn name(&self) -> &'static str {
        match self {
            WaterSource::All => "All",
            WaterSource::Surface => "Surface Water",
            WaterSource::Groundwater => "Groundwater",
        }
    }
}

impl FromStr for WaterSource {
    type Err = WassiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "all" | "total" | "any" => Ok(WaterSource::All),
            "surface" | "surfacewater" | "sw" => Ok(WaterSource::Surface),
            "groundwater" | "ground" | "gw" => Ok(WaterSource::Groundwater),
            _ => Err(WassiError::UnknownWaterSource(s.to_string())),
        }
    }
}

/// Quality class of the water.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WaterType {
    Fresh,
    Saline,
    Reclaimed,
    /// Summary across water types
    Any,
}

impl WaterType {
    pub fn name(&self) -> &'static str {
        match self {
            WaterType::Fresh => "Fresh",
            WaterType::Saline => "Saline",
            WaterType::Reclaimed => "Reclaimed",
            WaterType::Any => "Any",
        }
    }
}

impl FromStr for WaterType {
    type Err = WassiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "fresh" | "freshwater" => Ok(WaterType::Fresh),
            "saline" | "salinewater" => Ok(WaterType::Saline),
            "reclaimed" | "reclaimedwastewater" => Ok(WaterType::Reclaimed),
            "any" | "all" | "total" => Ok(WaterType::Any),
            _ => Err(WassiError::UnknownWaterType(s.to_string())),
        }
    }
}

/// Operational status of a well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WellStatus {
    Active,
    Inactive,
    Abandoned,
    Unknown,
}

impl WellStatus {
    pub fn name(&self) -> &'static str {
        match self {
            WellStatus::Active => "Active",
            WellStatus::Inactive => "Inactive",
            WellStatus::Abandoned => "Abandoned",
            WellStatus::Unknown => "Unknown",
        }
    }
}

impl FromStr for WellStatus {
    type Err = WassiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" => Ok(WellStatus::Active),
            "inactive" => Ok(WellStatus::Inactive),
            "abandoned" | "plugged" => Ok(WellStatus::Abandoned),
            "unknown" | "" => Ok(WellStatus::Unknown),
            _ => Err(WassiError::UnknownWellStatus(s.to_string())),
        }
    }
}

macro_rules! named_enum_conversions {
    ($($ty:ty),*) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.name())
                }
            }

            impl TryFrom<String> for $ty {
                type Error = WassiError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.name().to_string()
                }
            }
        )*
    };
}

named_enum_conversions!(Sector, WaterSource, WaterType, WellStatus);

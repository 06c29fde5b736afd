//! Water-use records at county and sub-county scale.

use crate::sector::{Sector, WaterSource, WaterType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The spatial entity a record is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "scale", content = "id", rename_all = "snake_case")]
pub enum SpatialKey {
    County(String),
    HydrologicUnit(String),
    SubUnit(String),
}

impl SpatialKey {
    pub fn id(&self) -> &str {
        match self {
            SpatialKey::County(id) | SpatialKey::HydrologicUnit(id) | SpatialKey::SubUnit(id) => id,
        }
    }

    pub fn is_county(&self) -> bool {
        matches!(self, SpatialKey::County(_))
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpatialKey::County(id) => write!(f, "county {id}"),
            SpatialKey::HydrologicUnit(id) => write!(f, "hydrologic unit {id}"),
            SpatialKey::SubUnit(id) => write!(f, "sub-unit {id}"),
        }
    }
}

/// Whether a record was reported or produced by disaggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOrigin {
    #[default]
    Reported,
    Disaggregated,
}

/// A water-use quantity in million gallons per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterUseRecord {
    pub id: String,
    #[serde(with = "crate::lossless")]
    pub value: f64,
    pub sector: Sector,
    pub source: WaterSource,
    pub water_type: WaterType,
    pub consumptive: bool,
    pub location: SpatialKey,
    pub year: i32,
    #[serde(default)]
    pub origin: RecordOrigin,
}

impl WaterUseRecord {
    /// Records that count towards withdrawal totals.
    pub fn is_withdrawal(&self) -> bool {
        !self.consumptive && self.water_type != WaterType::Any
    }
}

/// Identity of a disaggregated record; values sharing a key are summed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisaggregationKey {
    pub sub_unit: String,
    pub sector: Sector,
    pub source: WaterSource,
    pub water_type: WaterType,
    pub year: i32,
    pub consumptive: bool,
}

impl DisaggregationKey {
    /// Key a disaggregated record would be merged under, if it is one.
    pub fn of(record: &WaterUseRecord) -> Option<Self> {
        match (&record.location, record.origin) {
            (SpatialKey::SubUnit(sub_unit), RecordOrigin::Disaggregated) => Some(Self {
                sub_unit: sub_unit.clone(),
                sector: record.sector,
                source: record.source,
                water_type: record.water_type,
                year: record.year,
                consumptive: record.consumptive,
            }),
            _ => None,
        }
    }

    /// Deterministic record id derived from the key.
    pub fn record_id(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}/{}",
            self.sub_unit,
            self.sector,
            self.source,
            self.water_type,
            self.year,
            if self.consumptive { "consumptive" } else { "withdrawal" }
        )
    }

    pub fn into_record(self, value: f64) -> WaterUseRecord {
        WaterUseRecord {
            id: self.record_id(),
            value,
            sector: self.sector,
            source: self.source,
            water_type: self.water_type,
            consumptive: self.consumptive,
            year: self.year,
            location: SpatialKey::SubUnit(self.sub_unit),
            origin: RecordOrigin::Disaggregated,
        }
    }
}

#[derive(PartialEq, Eq, Hash)]
struct ExactRecord<'a> {
    id: &'a str,
    value_bits: u64,
    sector: Sector,
    source: WaterSource,
    water_type: WaterType,
    consumptive: bool,
    location: &'a SpatialKey,
    year: i32,
    origin: RecordOrigin,
}

impl<'a> From<&'a WaterUseRecord> for ExactRecord<'a> {
    fn from(r: &'a WaterUseRecord) -> Self {
        ExactRecord {
            id: &r.id,
            value_bits: r.value.to_bits(),
            sector: r.sector,
            source: r.source,
            water_type: r.water_type,
            consumptive: r.consumptive,
            location: &r.location,
            year: r.year,
            origin: r.origin,
        }
    }
}

/// Indices of records identical on every field to an earlier record.
///
/// Values are compared bit for bit, so two NaN values count as equal.
pub fn find_exact_duplicates(records: &[WaterUseRecord]) -> Vec<usize> {
    let mut seen: HashMap<ExactRecord, usize> = HashMap::new();
    let mut duplicates = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if seen.insert(ExactRecord::from(record), i).is_some() {
            duplicates.push(i);
        }
    }
    duplicates
}

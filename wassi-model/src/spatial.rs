//! Counties, hydrologic units and the sub-units formed by their intersection.
//!
//! Entities are stored in the document keyed by identifier; the structs
//! here carry only attributes. Areas are in km².

use crate::sector::{Sector, WellStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A quantity tagged by year, e.g. crop area per survey year.
pub type YearSeries = BTreeMap<i32, f64>;

/// Number of wells of one sector and status in a given year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellCount {
    pub year: i32,
    pub sector: Sector,
    pub status: WellStatus,
    pub count: u32,
}

/// Well inventory for an area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WellInventory(pub Vec<WellCount>);

impl WellInventory {
    /// Active wells per sector for a year. Sectors without an active entry are absent.
    ///
    /// Counts saturate at `u32::MAX`.
    pub fn active_by_sector(&self, year: i32) -> BTreeMap<Sector, u32> {
        let mut counts = BTreeMap::new();
        for well in &self.0 {
            if well.year == year && well.status == WellStatus::Active {
                let count = counts.entry(well.sector).or_insert(0u32);
                *count = count.saturating_add(well.count);
            }
        }
        counts
    }

    pub fn has_active(&self, year: i32) -> bool {
        self.0
            .iter()
            .any(|well| well.year == year && well.status == WellStatus::Active)
    }
}

/// Ancillary year-tagged datasets shared by counties and sub-units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandUse {
    /// Cropland area (km²) per year
    #[serde(default)]
    pub crop_area: YearSeries,
    /// Developed land area (km²) per year
    #[serde(default)]
    pub developed_area: YearSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct County {
    pub name: Option<String>,
    pub area_km2: f64,
    #[serde(default)]
    pub land_use: LandUse,
    #[serde(default)]
    pub wells: WellInventory,
}

/// A small watershed (HUC12), the unit stress indices are reported for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydrologicUnit {
    pub name: Option<String>,
    pub area_km2: f64,
    /// Mean annual streamflow in cubic feet per second
    #[serde(default)]
    pub mean_annual_flow_cfs: Option<f64>,
    /// Groundwater recharge in mm/km²/yr
    #[serde(default)]
    pub recharge_mm: Option<f64>,
}

/// The part of one hydrologic unit that lies in one county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubUnit {
    pub county: String,
    pub hydrologic_unit: String,
    pub area_km2: f64,
    /// Highest Strahler order of the streams inside the sub-unit
    #[serde(default)]
    pub max_stream_order: f64,
    #[serde(default)]
    pub land_use: LandUse,
    #[serde(default)]
    pub wells: WellInventory,
}

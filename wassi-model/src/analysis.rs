//! Analysis configuration and the collections derived from it.

use crate::error::{Result, WassiError};
use crate::sector::{Sector, WaterSource};
use crate::stress::StressValue;
use crate::weights::{DisaggregationTable, WeightComponent, WeightFactorDefinition};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share of streamflow reserved for ecological needs when none is configured.
pub const DEFAULT_ENVIRONMENTAL_FLOW_FRACTION: f64 = 0.5;

fn default_environmental_flow_fraction() -> f64 {
    DEFAULT_ENVIRONMENTAL_FLOW_FRACTION
}

/// One WaSSI analysis: which data years to use, how to weight, and what
/// has been derived so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub name: String,
    /// Year of the crop-area dataset (W2)
    pub crop_year: i32,
    /// Year of the developed-area dataset (W4)
    pub developed_area_year: i32,
    /// Year of the well inventory (GW1)
    pub well_year: i32,
    /// Year of the water-use records to disaggregate and evaluate
    pub water_use_year: i32,
    #[serde(default = "default_environmental_flow_fraction")]
    pub environmental_flow_fraction: f64,
    /// Empty means [`WeightFactorDefinition::defaults`]
    #[serde(default)]
    pub weight_factors: Vec<WeightFactorDefinition>,
    #[serde(default)]
    pub disaggregation: DisaggregationTable,
    #[serde(default)]
    pub stress_values: Vec<StressValue>,
    #[serde(default)]
    pub last_run: Option<NaiveDateTime>,
}

impl Analysis {
    /// A fresh analysis using one year for every dataset.
    pub fn new(name: &str, year: i32) -> Self {
        Self {
            name: name.to_string(),
            crop_year: year,
            developed_area_year: year,
            well_year: year,
            water_use_year: year,
            environmental_flow_fraction: DEFAULT_ENVIRONMENTAL_FLOW_FRACTION,
            weight_factors: Vec::new(),
            disaggregation: DisaggregationTable::new(),
            stress_values: Vec::new(),
            last_run: None,
        }
    }

    /// Weight components per (source, sector), falling back to the defaults.
    ///
    /// Later definitions for the same pair replace earlier ones.
    pub fn weight_factor_table(&self) -> BTreeMap<(WaterSource, Sector), Vec<WeightComponent>> {
        let defs = if self.weight_factors.is_empty() {
            WeightFactorDefinition::defaults()
        } else {
            self.weight_factors.clone()
        };
        defs.into_iter()
            .map(|def| ((def.source(), def.sector()), def.components().to_vec()))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let e = self.environmental_flow_fraction;
        if !(0.0..1.0).contains(&e) {
            return Err(WassiError::Configuration(format!(
                "environmental flow fraction must be in [0, 1), got {e}"
            )));
        }
        Ok(())
    }
}

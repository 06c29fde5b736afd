//! The document snapshot an analysis runs against.
//!
//! Components never mutate a document in place. Each one reads a
//! `&Document` and returns a derived collection; the `with_*` methods then
//! build the next snapshot, either replacing or appending prior results.

use crate::analysis::Analysis;
use crate::error::{Result, WassiError};
use crate::spatial::{County, HydrologicUnit, SubUnit};
use crate::stress::StressValue;
use crate::water_use::{DisaggregationKey, RecordOrigin, SpatialKey, WaterUseRecord};
use crate::weights::DisaggregationTable;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub counties: BTreeMap<String, County>,
    #[serde(default)]
    pub hydrologic_units: BTreeMap<String, HydrologicUnit>,
    #[serde(default)]
    pub sub_units: BTreeMap<String, SubUnit>,
    #[serde(default)]
    pub water_use: Vec<WaterUseRecord>,
    pub analysis: Analysis,
}

impl Document {
    pub fn new(analysis: Analysis) -> Self {
        Self {
            counties: BTreeMap::new(),
            hydrologic_units: BTreeMap::new(),
            sub_units: BTreeMap::new(),
            water_use: Vec::new(),
            analysis,
        }
    }

    /// Check that required collections exist and every reference resolves.
    pub fn validate(&self) -> Result<()> {
        if self.counties.is_empty() {
            return Err(WassiError::Configuration("document has no counties".to_string()));
        }
        if self.sub_units.is_empty() {
            return Err(WassiError::Configuration("document has no sub-units".to_string()));
        }
        for (id, sub) in &self.sub_units {
            if !self.counties.contains_key(&sub.county) {
                return Err(WassiError::InvalidReference {
                    kind: "sub-unit",
                    id: id.clone(),
                    target_kind: "county",
                    target: sub.county.clone(),
                });
            }
            if !self.hydrologic_units.contains_key(&sub.hydrologic_unit) {
                return Err(WassiError::InvalidReference {
                    kind: "sub-unit",
                    id: id.clone(),
                    target_kind: "hydrologic unit",
                    target: sub.hydrologic_unit.clone(),
                });
            }
        }
        for record in &self.water_use {
            let (exists, target_kind) = match &record.location {
                SpatialKey::County(id) => (self.counties.contains_key(id), "county"),
                SpatialKey::HydrologicUnit(id) => {
                    (self.hydrologic_units.contains_key(id), "hydrologic unit")
                }
                SpatialKey::SubUnit(id) => (self.sub_units.contains_key(id), "sub-unit"),
            };
            if !exists {
                return Err(WassiError::InvalidReference {
                    kind: "water-use record",
                    id: record.id.clone(),
                    target_kind,
                    target: record.location.id().to_string(),
                });
            }
        }
        self.analysis.validate()
    }

    /// Sub-unit ids grouped by county id.
    pub fn sub_units_by_county(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut index: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (id, sub) in &self.sub_units {
            index.entry(sub.county.as_str()).or_default().push(id.as_str());
        }
        index
    }

    /// Sub-unit ids grouped by hydrologic unit id.
    pub fn sub_units_by_hydrologic_unit(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut index: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (id, sub) in &self.sub_units {
            index
                .entry(sub.hydrologic_unit.as_str())
                .or_default()
                .push(id.as_str());
        }
        index
    }

    /// Next snapshot with new weight records per county.
    ///
    /// With `overwrite` a county's prior records are replaced; otherwise the
    /// new ones are appended, which can repeat sub-units.
    pub fn with_disaggregation_records(mut self, table: DisaggregationTable, overwrite: bool) -> Self {
        for (county, records) in table {
            let entry = self.analysis.disaggregation.entry(county).or_default();
            if overwrite {
                *entry = records;
            } else {
                entry.extend(records);
            }
        }
        self
    }

    /// Next snapshot with disaggregated records added to the water-use collection.
    ///
    /// With `overwrite` every previously disaggregated record of the analysis
    /// year is dropped first. Otherwise a new record whose key matches an
    /// existing disaggregated record is added onto it.
    pub fn with_disaggregated_water_use(mut self, records: Vec<WaterUseRecord>, overwrite: bool) -> Self {
        if overwrite {
            let year = self.analysis.water_use_year;
            let before = self.water_use.len();
            self.water_use
                .retain(|r| !(r.origin == RecordOrigin::Disaggregated && r.year == year));
            debug!("Dropped {} disaggregated records for {}", before - self.water_use.len(), year);
        }
        let mut positions: HashMap<DisaggregationKey, usize> = self
            .water_use
            .iter()
            .enumerate()
            .filter_map(|(i, r)| DisaggregationKey::of(r).map(|key| (key, i)))
            .collect();
        let mut merged = 0usize;
        for record in records {
            match DisaggregationKey::of(&record) {
                Some(key) => match positions.get(&key) {
                    Some(&i) => {
                        merged += 1;
                        self.water_use[i].value += record.value;
                    }
                    None => {
                        positions.insert(key, self.water_use.len());
                        self.water_use.push(record);
                    }
                },
                None => self.water_use.push(record),
            }
        }
        if merged > 0 {
            debug!("Added {merged} records onto existing disaggregated values");
        }
        self
    }

    /// Next snapshot with new stress values.
    ///
    /// With `overwrite` the prior values of every unit present in `values`
    /// are dropped first.
    pub fn with_stress_values(mut self, values: Vec<StressValue>, overwrite: bool) -> Self {
        if overwrite {
            let units: BTreeSet<&str> = values.iter().map(|v| v.hydrologic_unit.as_str()).collect();
            self.analysis
                .stress_values
                .retain(|v| !units.contains(v.hydrologic_unit.as_str()));
        }
        self.analysis.stress_values.extend(values);
        self
    }
}

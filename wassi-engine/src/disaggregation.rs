//! Apportioning county water use to sub-units.
//!
//! For every (county, source, sector) the weight of a sub-unit is
//!
//! - surface: the geometric mean of the named components,
//!   `w(s) = (Π component_i(s))^(1/k)`
//! - groundwater: GW1\[sector\] directly
//!
//! and a county value `V` is split as `V · w(s) / Σw`. The geometric mean of
//! normalised weights is not itself normalised, so `Σw` is generally not 1.
//! When `Σw = 0` every share is zero.

use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use wassi_model::analysis::Analysis;
use wassi_model::document::Document;
use wassi_model::error::{Result, WassiError};
use wassi_model::sector::{Sector, WaterSource};
use wassi_model::water_use::{DisaggregationKey, RecordOrigin, SpatialKey, WaterUseRecord};
use wassi_model::weights::{CountyDisaggregationRecord, WeightComponent};

/// Lookup key for resolved weights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WeightKey {
    pub county: String,
    pub source: WaterSource,
    pub sector: Sector,
}

impl fmt::Display for WeightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "county {} {}/{}", self.county, self.source, self.sector)
    }
}

/// Disaggregation weights of the sub-units of one county for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWeights {
    pub weights: Vec<(String, f64)>,
    pub total: f64,
}

impl ResolvedWeights {
    fn new(weights: Vec<(String, f64)>) -> Self {
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        Self { weights, total }
    }

    /// Shares of the county value, `w / Σw`, or zero when `Σw = 0`.
    pub fn normalized(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(move |(sub_unit, w)| {
            let share = if self.total == 0.0 { 0.0 } else { w / self.total };
            (sub_unit.as_str(), share)
        })
    }
}

/// Geometric mean of the named surface components of one sub-unit.
pub fn geometric_mean(record: &CountyDisaggregationRecord, components: &[WeightComponent]) -> f64 {
    let product: f64 = components
        .iter()
        .map(|c| record.surface.component(*c).unwrap_or(0.0))
        .product();
    product.powf(1.0 / components.len() as f64)
}

fn resolve_key(
    records: &[CountyDisaggregationRecord],
    source: WaterSource,
    sector: Sector,
    components: &[WeightComponent],
) -> Option<ResolvedWeights> {
    match source {
        WaterSource::Surface => Some(ResolvedWeights::new(
            records
                .iter()
                .map(|r| (r.sub_unit.clone(), geometric_mean(r, components)))
                .collect(),
        )),
        WaterSource::Groundwater => {
            let weights: Vec<(String, f64)> = records
                .iter()
                .filter_map(|r| r.groundwater.ratio(sector).map(|w| (r.sub_unit.clone(), w)))
                .collect();
            if weights.is_empty() {
                None
            } else {
                Some(ResolvedWeights::new(weights))
            }
        }
        WaterSource::All => None,
    }
}

/// Resolve every declared (source, sector) pair for every county with weights.
///
/// Groundwater pairs for a sector without wells in the county are left out.
pub fn resolve_weights(analysis: &Analysis) -> BTreeMap<WeightKey, ResolvedWeights> {
    let factors = analysis.weight_factor_table();
    let mut lookup = BTreeMap::new();
    for (county, records) in &analysis.disaggregation {
        for ((source, sector), components) in &factors {
            match resolve_key(records, *source, *sector, components) {
                Some(resolved) => {
                    lookup.insert(
                        WeightKey {
                            county: county.clone(),
                            source: *source,
                            sector: *sector,
                        },
                        resolved,
                    );
                }
                None => debug!("No {source}/{sector} weights for county {county}"),
            }
        }
    }
    lookup
}

/// Result of one disaggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisaggregationOutput {
    /// New sub-unit records, one per key, values already merged
    pub records: Vec<WaterUseRecord>,
    /// County records left as they are (summary source or sector)
    pub passed_through: usize,
    /// Keys that had county records but no resolved weights
    pub unresolved: BTreeSet<WeightKey>,
}

/// Split every county record of the analysis year over the county's sub-units.
///
/// Fails when a county record's county has no weight records. Records
/// for an unresolved (source, sector) are skipped with a warning.
pub fn disaggregate(doc: &Document) -> Result<DisaggregationOutput> {
    let analysis = &doc.analysis;
    let lookup = resolve_weights(analysis);
    let mut output = DisaggregationOutput::default();
    let mut merged: BTreeMap<DisaggregationKey, f64> = BTreeMap::new();

    let county_records = doc.water_use.iter().filter(|r| {
        r.year == analysis.water_use_year && r.origin == RecordOrigin::Reported && r.location.is_county()
    });
    for record in county_records {
        let county = record.location.id();
        let has_weights = analysis
            .disaggregation
            .get(county)
            .is_some_and(|records| !records.is_empty());
        if !has_weights {
            return Err(WassiError::MissingWeights {
                county: county.to_string(),
            });
        }
        if record.source == WaterSource::All || record.sector == Sector::All {
            output.passed_through += 1;
            continue;
        }
        let key = WeightKey {
            county: county.to_string(),
            source: record.source,
            sector: record.sector,
        };
        let Some(resolved) = lookup.get(&key) else {
            if output.unresolved.insert(key.clone()) {
                warn!("No weights resolved for {key}; its records are not disaggregated");
            }
            continue;
        };
        for (sub_unit, share) in resolved.normalized() {
            let target = DisaggregationKey {
                sub_unit: sub_unit.to_string(),
                sector: record.sector,
                source: record.source,
                water_type: record.water_type,
                year: record.year,
                consumptive: record.consumptive,
            };
            *merged.entry(target).or_insert(0.0) += record.value * share;
        }
    }

    output.records = merged
        .into_iter()
        .map(|(key, value)| key.into_record(value))
        .collect();
    info!(
        "Disaggregated into {} sub-unit records ({} passed through, {} unresolved keys)",
        output.records.len(),
        output.passed_through,
        output.unresolved.len()
    );
    Ok(output)
}

/// Sum of disaggregated values per sub-unit, for diagnostics.
pub fn totals_by_sub_unit(records: &[WaterUseRecord]) -> BTreeMap<&str, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        if let SpatialKey::SubUnit(id) = &record.location {
            *totals.entry(id.as_str()).or_insert(0.0) += record.value;
        }
    }
    totals
}

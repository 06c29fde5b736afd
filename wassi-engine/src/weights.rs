//! Surface and groundwater weights for every sub-unit of every county.
//!
//! For a sub-unit `s` of county `c`:
//!
//! - W1 = area(s) / area(c)
//! - W2 = crop area(s) / crop area(c)
//! - W3 = max stream order(s) / Σ max stream order over the sub-units of `c`
//! - W4 = developed area(s) / developed area(c)
//! - GW1\[sector\] = active wells(s, sector) / active wells(c, sector)
//!
//! Zero denominators are not errors; the resulting infinities and NaN are
//! carried into the weight records unchanged.

use log::{debug, info};
use std::collections::BTreeMap;
use std::fmt;
use wassi_model::analysis::Analysis;
use wassi_model::document::Document;
use wassi_model::error::{Result, WassiError};
use wassi_model::sector::Sector;
use wassi_model::spatial::{County, SubUnit, YearSeries};
use wassi_model::weights::{
    CountyDisaggregationRecord, DisaggregationTable, GroundwaterWeightSet, SurfaceWeightSet,
};

fn year_value(
    series: &YearSeries,
    what: &str,
    entity: impl FnOnce() -> String,
    year: i32,
) -> Result<f64> {
    series.get(&year).copied().ok_or_else(|| WassiError::MissingData {
        entity: entity(),
        what: what.to_string(),
        year,
    })
}

/// Weights of the sub-units of one county.
///
/// `sub_units` must be every sub-unit of the county; the W3 denominator
/// and the normalisation invariants depend on it.
pub fn compute_county_weights(
    county_id: &str,
    county: &County,
    sub_units: &[(&str, &SubUnit)],
    analysis: &Analysis,
) -> Result<Vec<CountyDisaggregationRecord>> {
    if sub_units.is_empty() {
        return Err(WassiError::Configuration(format!(
            "county {county_id} has no sub-units"
        )));
    }
    let county_crop = year_value(
        &county.land_use.crop_area,
        "crop area",
        || format!("county {county_id}"),
        analysis.crop_year,
    )?;
    let county_developed = year_value(
        &county.land_use.developed_area,
        "developed area",
        || format!("county {county_id}"),
        analysis.developed_area_year,
    )?;
    if !county.wells.has_active(analysis.well_year) {
        return Err(WassiError::MissingData {
            entity: format!("county {county_id}"),
            what: "active well counts".to_string(),
            year: analysis.well_year,
        });
    }
    let county_wells = county.wells.active_by_sector(analysis.well_year);

    let mut records = Vec::with_capacity(sub_units.len());
    let mut stream_order_sum = 0.0;
    for (sub_id, sub) in sub_units {
        let crop = year_value(
            &sub.land_use.crop_area,
            "crop area",
            || format!("sub-unit {sub_id}"),
            analysis.crop_year,
        )?;
        let developed = year_value(
            &sub.land_use.developed_area,
            "developed area",
            || format!("sub-unit {sub_id}"),
            analysis.developed_area_year,
        )?;
        if !sub.wells.has_active(analysis.well_year) {
            return Err(WassiError::MissingData {
                entity: format!("sub-unit {sub_id}"),
                what: "active well counts".to_string(),
                year: analysis.well_year,
            });
        }
        let sub_wells = sub.wells.active_by_sector(analysis.well_year);
        let groundwater: BTreeMap<Sector, f64> = county_wells
            .iter()
            .filter_map(|(sector, county_count)| {
                sub_wells
                    .get(sector)
                    .map(|count| (*sector, f64::from(*count) / f64::from(*county_count)))
            })
            .collect();

        stream_order_sum += sub.max_stream_order;
        records.push(CountyDisaggregationRecord {
            sub_unit: sub_id.to_string(),
            surface: SurfaceWeightSet {
                w1: sub.area_km2 / county.area_km2,
                w2: crop / county_crop,
                // normalised below once the county total is known
                w3: sub.max_stream_order,
                w4: developed / county_developed,
            },
            groundwater: GroundwaterWeightSet(groundwater),
        });
    }
    for record in &mut records {
        record.surface.w3 /= stream_order_sum;
    }
    Ok(records)
}

/// Weight records for every county in the document.
pub fn compute_weights(doc: &Document) -> Result<DisaggregationTable> {
    doc.validate()?;
    let by_county = doc.sub_units_by_county();
    let mut table = DisaggregationTable::new();
    for (county_id, county) in &doc.counties {
        let sub_units: Vec<(&str, &SubUnit)> = by_county
            .get(county_id.as_str())
            .map(|ids| ids.iter().map(|id| (*id, &doc.sub_units[*id])).collect())
            .unwrap_or_default();
        let records = compute_county_weights(county_id, county, &sub_units, &doc.analysis)?;
        debug!("Weight sums for county {}: {}", county_id, WeightSums::of(&records));
        table.insert(county_id.clone(), records);
    }
    info!(
        "Computed weights for {} sub-units in {} counties",
        table.values().map(Vec::len).sum::<usize>(),
        table.len()
    );
    Ok(table)
}

/// Per-county sums of each weight; all should be close to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSums {
    pub w1: f64,
    pub w2: f64,
    pub w3: f64,
    pub w4: f64,
    pub groundwater: BTreeMap<Sector, f64>,
}

impl WeightSums {
    pub fn of(records: &[CountyDisaggregationRecord]) -> Self {
        let mut sums = WeightSums {
            w1: 0.0,
            w2: 0.0,
            w3: 0.0,
            w4: 0.0,
            groundwater: BTreeMap::new(),
        };
        for record in records {
            sums.w1 += record.surface.w1;
            sums.w2 += record.surface.w2;
            sums.w3 += record.surface.w3;
            sums.w4 += record.surface.w4;
            for (sector, ratio) in &record.groundwater.0 {
                *sums.groundwater.entry(*sector).or_insert(0.0) += ratio;
            }
        }
        sums
    }

    /// Largest distance of a surface sum from 1. NaN if any sum is NaN.
    pub fn max_surface_deviation(&self) -> f64 {
        [self.w1, self.w2, self.w3, self.w4]
            .iter()
            .map(|s| (s - 1.0).abs())
            .fold(0.0, |acc, d| if d.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(d) })
    }
}

impl fmt::Display for WeightSums {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "W1={:.9} W2={:.9} W3={:.9} W4={:.9}",
            self.w1, self.w2, self.w3, self.w4
        )?;
        for (sector, sum) in &self.groundwater {
            write!(f, " GW1[{sector}]={sum:.9}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_document, sub_unit, well};
    use wassi_model::sector::WellStatus;

    const TOLERANCE: f64 = 1e-9;

    fn records_by_id(table: &DisaggregationTable, county: &str) -> BTreeMap<String, CountyDisaggregationRecord> {
        table[county]
            .iter()
            .map(|r| (r.sub_unit.clone(), r.clone()))
            .collect()
    }

    #[test]
    fn test_area_and_crop_scenario() {
        let doc = sample_document();
        let table = compute_weights(&doc).unwrap();
        let records = records_by_id(&table, "C1");
        assert!((records["A"].surface.w1 - 0.25).abs() < TOLERANCE);
        assert!((records["B"].surface.w1 - 0.75).abs() < TOLERANCE);
        assert!((records["A"].surface.w2 - 0.8).abs() < TOLERANCE);
        assert!((records["B"].surface.w2 - 0.2).abs() < TOLERANCE);
    }

    #[test]
    fn test_surface_weights_sum_to_one() {
        let table = compute_weights(&sample_document()).unwrap();
        for records in table.values() {
            let sums = WeightSums::of(records);
            assert!(sums.max_surface_deviation() < TOLERANCE, "{sums}");
        }
    }

    #[test]
    fn test_stream_order_normalised_by_county_total() {
        let table = compute_weights(&sample_document()).unwrap();
        let records = records_by_id(&table, "C1");
        // stream orders 1 and 3
        assert!((records["A"].surface.w3 - 0.25).abs() < TOLERANCE);
        assert!((records["B"].surface.w3 - 0.75).abs() < TOLERANCE);
    }

    #[test]
    fn test_groundwater_ratios_sum_to_one_when_fully_populated() {
        let table = compute_weights(&sample_document()).unwrap();
        let sums = WeightSums::of(&table["C1"]);
        assert!((sums.groundwater[&Sector::Irrigation] - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_sub_unit_without_sector_wells_contributes_nothing() {
        let table = compute_weights(&sample_document()).unwrap();
        let records = records_by_id(&table, "C1");
        // only A has domestic wells
        assert_eq!(records["A"].groundwater.ratio(Sector::Domestic), Some(1.0));
        assert_eq!(records["B"].groundwater.ratio(Sector::Domestic), None);
        assert_eq!(records["B"].component(wassi_model::weights::WeightComponent::GW1, Sector::Domestic), 0.0);
    }

    #[test]
    fn test_inactive_wells_ignored() {
        let mut doc = sample_document();
        doc.sub_units
            .get_mut("B")
            .unwrap()
            .wells
            .0
            .push(well(Sector::Irrigation, WellStatus::Inactive, 50));
        let table = compute_weights(&doc).unwrap();
        let sums = WeightSums::of(&table["C1"]);
        assert!((sums.groundwater[&Sector::Irrigation] - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_missing_county_crop_year() {
        let mut doc = sample_document();
        doc.counties.get_mut("C1").unwrap().land_use.crop_area.clear();
        let err = compute_weights(&doc).unwrap_err();
        assert_eq!(
            err,
            WassiError::MissingData {
                entity: "county C1".to_string(),
                what: "crop area".to_string(),
                year: 2016,
            }
        );
    }

    #[test]
    fn test_missing_sub_unit_developed_year() {
        let mut doc = sample_document();
        doc.sub_units.get_mut("B").unwrap().land_use.developed_area.clear();
        let err = compute_weights(&doc).unwrap_err();
        assert!(matches!(err, WassiError::MissingData { ref entity, .. } if entity == "sub-unit B"));
    }

    #[test]
    fn test_county_without_active_wells() {
        let mut doc = sample_document();
        doc.counties.get_mut("C1").unwrap().wells.0.clear();
        let err = compute_weights(&doc).unwrap_err();
        assert!(matches!(err, WassiError::MissingData { ref what, .. } if what == "active well counts"));
    }

    #[test]
    fn test_sub_unit_without_active_wells() {
        let mut doc = sample_document();
        doc.sub_units.get_mut("B").unwrap().wells.0.clear();
        let err = compute_weights(&doc).unwrap_err();
        assert_eq!(
            err,
            WassiError::MissingData {
                entity: "sub-unit B".to_string(),
                what: "active well counts".to_string(),
                year: 2016,
            }
        );
    }

    #[test]
    fn test_sub_unit_with_only_inactive_wells() {
        let mut doc = sample_document();
        doc.sub_units.get_mut("B").unwrap().wells.0 = vec![well(Sector::Irrigation, WellStatus::Abandoned, 6)];
        let err = compute_weights(&doc).unwrap_err();
        assert!(matches!(err, WassiError::MissingData { ref entity, .. } if entity == "sub-unit B"));
    }

    #[test]
    fn test_county_without_sub_units_is_configuration_error() {
        let mut doc = sample_document();
        let county = doc.counties["C1"].clone();
        doc.counties.insert("C2".to_string(), county);
        let err = compute_weights(&doc).unwrap_err();
        assert!(matches!(err, WassiError::Configuration(_)));
    }

    #[test]
    fn test_zero_stream_orders_yield_nan_not_error() {
        let mut doc = sample_document();
        for sub in doc.sub_units.values_mut() {
            sub.max_stream_order = 0.0;
        }
        let table = compute_weights(&doc).unwrap();
        assert!(table["C1"].iter().all(|r| r.surface.w3.is_nan()));
        assert!(WeightSums::of(&table["C1"]).max_surface_deviation().is_nan());
    }

    #[test]
    fn test_single_sub_unit_gets_everything() {
        let mut doc = sample_document();
        doc.sub_units.remove("B");
        let mut a = sub_unit("C1", "H1", 40.0, 5.0, 2.0);
        a.wells = doc.counties["C1"].wells.clone();
        doc.sub_units.insert("A".to_string(), a);
        doc.counties.get_mut("C1").unwrap().land_use.developed_area.insert(2016, 2.0);
        let table = compute_weights(&doc).unwrap();
        let record = &table["C1"][0];
        assert_eq!(record.surface.w1, 1.0);
        assert_eq!(record.surface.w2, 1.0);
        assert_eq!(record.surface.w3, 1.0);
        assert_eq!(record.surface.w4, 1.0);
    }

    #[test]
    fn test_sums_display() {
        let table = compute_weights(&sample_document()).unwrap();
        let text = WeightSums::of(&table["C1"]).to_string();
        assert!(text.starts_with("W1=1.000000000"));
        assert!(text.contains("GW1[Irrigation]=1.000000000"));
    }
}

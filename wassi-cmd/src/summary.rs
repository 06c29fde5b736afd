//! Counts describing a document.

use crate::document_io::load_document;
use log::info;
use std::fmt;
use std::path::Path;
use wassi_model::document::Document;
use wassi_model::water_use::{RecordOrigin, SpatialKey};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub counties: usize,
    pub hydrologic_units: usize,
    pub sub_units: usize,
    pub county_records: usize,
    pub hydrologic_unit_records: usize,
    pub sub_unit_records: usize,
    pub disaggregated_records: usize,
    pub weight_records: usize,
    pub stress_values: usize,
    pub non_finite_stress_values: usize,
}

impl Summary {
    pub fn of(doc: &Document) -> Self {
        let mut summary = Summary {
            counties: doc.counties.len(),
            hydrologic_units: doc.hydrologic_units.len(),
            sub_units: doc.sub_units.len(),
            weight_records: doc.analysis.disaggregation.values().map(Vec::len).sum(),
            stress_values: doc.analysis.stress_values.len(),
            non_finite_stress_values: doc
                .analysis
                .stress_values
                .iter()
                .filter(|v| !v.is_finite())
                .count(),
            ..Default::default()
        };
        for record in &doc.water_use {
            match record.location {
                SpatialKey::County(_) => summary.county_records += 1,
                SpatialKey::HydrologicUnit(_) => summary.hydrologic_unit_records += 1,
                SpatialKey::SubUnit(_) => summary.sub_unit_records += 1,
            }
            if record.origin == RecordOrigin::Disaggregated {
                summary.disaggregated_records += 1;
            }
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} counties, {} hydrologic units, {} sub-units",
            self.counties, self.hydrologic_units, self.sub_units
        )?;
        writeln!(
            f,
            "water use: {} county, {} hydrologic unit, {} sub-unit ({} disaggregated)",
            self.county_records, self.hydrologic_unit_records, self.sub_unit_records, self.disaggregated_records
        )?;
        write!(
            f,
            "{} weight records, {} stress values ({} non-finite)",
            self.weight_records, self.stress_values, self.non_finite_stress_values
        )
    }
}

pub fn run_summary(input: &Path) -> anyhow::Result<()> {
    let doc = load_document(input)?;
    info!("Analysis {} (water use {})", doc.analysis.name, doc.analysis.water_use_year);
    if let Some(last_run) = doc.analysis.last_run {
        info!("Last run {}", last_run.format("%Y-%m-%d %H:%M:%S"));
    }
    for line in Summary::of(&doc).to_string().lines() {
        info!("{line}");
    }
    Ok(())
}

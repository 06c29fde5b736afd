//! CSV export of stress values and sub-county water use.

use crate::document_io::load_document;
use anyhow::{bail, Context};
use log::info;
use std::io::Write;
use std::path::Path;
use wassi_model::document::Document;
use wassi_model::water_use::{RecordOrigin, SpatialKey};
use wassi_utils::floats::format_lossless;

/// Stress values as `huc,sector,source,value`.
pub fn write_stress_csv<W: Write>(doc: &Document, writer: W) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["huc", "sector", "source", "value"])?;
    for value in &doc.analysis.stress_values {
        wtr.write_record([
            value.hydrologic_unit.as_str(),
            value.sector.name(),
            value.source.name(),
            format_lossless(value.value).as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(doc.analysis.stress_values.len())
}

/// Hydrologic-unit and sub-unit records, one row each.
pub fn write_water_use_csv<W: Write>(doc: &Document, writer: W) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "scale",
        "unit",
        "sector",
        "source",
        "water_type",
        "consumptive",
        "year",
        "value",
        "origin",
    ])?;
    let mut count = 0;
    for record in doc.water_use.iter().filter(|r| !r.location.is_county()) {
        let scale = match record.location {
            SpatialKey::HydrologicUnit(_) => "hydrologic_unit",
            _ => "sub_unit",
        };
        let origin = match record.origin {
            RecordOrigin::Reported => "reported",
            RecordOrigin::Disaggregated => "disaggregated",
        };
        wtr.write_record([
            scale,
            record.location.id(),
            record.sector.name(),
            record.source.name(),
            record.water_type.name(),
            if record.consumptive { "true" } else { "false" },
            record.year.to_string().as_str(),
            format_lossless(record.value).as_str(),
            origin,
        ])?;
        count += 1;
    }
    wtr.flush()?;
    Ok(count)
}

pub fn run_export(input: &Path, stress_csv: Option<&Path>, water_use_csv: Option<&Path>) -> anyhow::Result<()> {
    if stress_csv.is_none() && water_use_csv.is_none() {
        bail!("nothing to export: pass --stress-csv and/or --water-use-csv");
    }
    let doc = load_document(input)?;
    if let Some(path) = stress_csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let rows = write_stress_csv(&doc, file)?;
        info!("Wrote {} stress values to {}", rows, path.display());
    }
    if let Some(path) = water_use_csv {
        let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let rows = write_water_use_csv(&doc, file)?;
        info!("Wrote {} water-use records to {}", rows, path.display());
    }
    Ok(())
}

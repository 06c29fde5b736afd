//! Import of county water-use tables.
//!
//! Expected headers (any order, extra columns ignored):
//! `county,sector,source,water_type,consumptive,year,value`

use crate::document_io::{load_document, save_document};
use crate::DocumentArgs;
use anyhow::{anyhow, bail, Context};
use csv::StringRecord;
use log::{info, warn};
use std::io::Read;
use std::path::Path;
use wassi_model::document::Document;
use wassi_model::sector::{Sector, WaterSource, WaterType};
use wassi_model::water_use::{RecordOrigin, SpatialKey, WaterUseRecord};
use wassi_utils::parse::{parse_flag, parse_optional_f64};

struct Columns {
    county: usize,
    sector: usize,
    source: usize,
    water_type: usize,
    consumptive: usize,
    year: usize,
    value: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> anyhow::Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("missing column {name:?}"))
        };
        Ok(Columns {
            county: find("county")?,
            sector: find("sector")?,
            source: find("source")?,
            water_type: find("water_type")?,
            consumptive: find("consumptive")?,
            year: find("year")?,
            value: find("value")?,
        })
    }
}

fn field<'r>(row: &'r StringRecord, index: usize, name: &str) -> anyhow::Result<&'r str> {
    row.get(index)
        .map(str::trim)
        .ok_or_else(|| anyhow!("missing {name}"))
}

/// `None` when the value cell is blank or a null marker.
fn parse_row(row: &StringRecord, columns: &Columns) -> anyhow::Result<Option<WaterUseRecord>> {
    let county = field(row, columns.county, "county")?.to_string();
    if county.is_empty() {
        bail!("empty county");
    }
    let sector: Sector = field(row, columns.sector, "sector")?.parse()?;
    let source: WaterSource = field(row, columns.source, "source")?.parse()?;
    let water_type: WaterType = field(row, columns.water_type, "water_type")?.parse()?;
    let consumptive = parse_flag(field(row, columns.consumptive, "consumptive")?)?;
    let year: i32 = field(row, columns.year, "year")?
        .parse()
        .context("invalid year")?;
    let Some(value) = parse_optional_f64(field(row, columns.value, "value")?)? else {
        return Ok(None);
    };
    Ok(Some(WaterUseRecord {
        id: format!(
            "{county}/{sector}/{source}/{water_type}/{year}/{}",
            if consumptive { "consumptive" } else { "withdrawal" }
        ),
        value,
        sector,
        source,
        water_type,
        consumptive,
        location: SpatialKey::County(county),
        year,
        origin: RecordOrigin::Reported,
    }))
}

/// Parse county-scale records from CSV text.
pub fn read_county_water_use<R: Read>(reader: R) -> anyhow::Result<Vec<WaterUseRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::locate(rdr.headers()?)?;
    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let row = result?;
        // header is line 1
        let line = i + 2;
        match parse_row(&row, &columns).with_context(|| format!("line {line}"))? {
            Some(record) => records.push(record),
            None => warn!("Skipping line {line}: no value"),
        }
    }
    Ok(records)
}

/// Append `records` to the document; every county must already exist.
pub fn append_county_water_use(mut doc: Document, records: Vec<WaterUseRecord>) -> anyhow::Result<Document> {
    if let Some(unknown) = records
        .iter()
        .find(|r| !doc.counties.contains_key(r.location.id()))
    {
        bail!(
            "water-use record {} references unknown county {}",
            unknown.id,
            unknown.location.id()
        );
    }
    doc.water_use.extend(records);
    Ok(doc)
}

pub fn run_import(args: &DocumentArgs, csv_path: &Path) -> anyhow::Result<()> {
    let doc = load_document(&args.input)?;
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("opening water-use CSV {}", csv_path.display()))?;
    let records = read_county_water_use(file)
        .with_context(|| format!("reading water-use CSV {}", csv_path.display()))?;
    let count = records.len();
    let doc = append_county_water_use(doc, records)?;
    info!("Imported {} county water-use records from {}", count, csv_path.display());
    save_document(&doc, args.output_path())
}

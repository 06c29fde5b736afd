//! Fixture documents for command tests.

use wassi_model::analysis::Analysis;
use wassi_model::document::Document;
use wassi_model::sector::{Sector, WaterSource, WaterType, WellStatus};
use wassi_model::spatial::{County, HydrologicUnit, LandUse, SubUnit, WellCount, WellInventory};
use wassi_model::water_use::{RecordOrigin, SpatialKey, WaterUseRecord};

pub const YEAR: i32 = 2015;

fn land_use(crop: f64, developed: f64) -> LandUse {
    LandUse {
        crop_area: [(YEAR, crop)].into(),
        developed_area: [(YEAR, developed)].into(),
    }
}

fn wells(counts: &[(Sector, u32)]) -> WellInventory {
    WellInventory(
        counts
            .iter()
            .map(|(sector, count)| WellCount {
                year: YEAR,
                sector: *sector,
                status: WellStatus::Active,
                count: *count,
            })
            .collect(),
    )
}

pub fn county_record(sector: Sector, source: WaterSource, value: f64) -> WaterUseRecord {
    WaterUseRecord {
        id: format!("C1/{sector}/{source}"),
        value,
        sector,
        source,
        water_type: WaterType::Fresh,
        consumptive: false,
        location: SpatialKey::County("C1".to_string()),
        year: YEAR,
        origin: RecordOrigin::Reported,
    }
}

/// County C1 over sub-units A (in H1) and B (in H2) with 12 MGD of
/// surface irrigation and 3 MGD of groundwater domestic use.
pub fn sample_document() -> Document {
    let mut doc = Document::new(Analysis::new("cmd-fixture", YEAR));
    doc.counties.insert(
        "C1".to_string(),
        County {
            name: Some("Fixture County".to_string()),
            area_km2: 40.0,
            land_use: land_use(5.0, 4.0),
            wells: wells(&[(Sector::Irrigation, 10), (Sector::Domestic, 3)]),
        },
    );
    for id in ["H1", "H2"] {
        doc.hydrologic_units.insert(
            id.to_string(),
            HydrologicUnit {
                name: None,
                area_km2: 57.4878743558,
                mean_annual_flow_cfs: Some(20.489),
                recharge_mm: Some(160.67391304347825),
            },
        );
    }
    doc.sub_units.insert(
        "A".to_string(),
        SubUnit {
            county: "C1".to_string(),
            hydrologic_unit: "H1".to_string(),
            area_km2: 10.0,
            max_stream_order: 1.0,
            land_use: land_use(4.0, 1.0),
            wells: wells(&[(Sector::Irrigation, 4), (Sector::Domestic, 3)]),
        },
    );
    doc.sub_units.insert(
        "B".to_string(),
        SubUnit {
            county: "C1".to_string(),
            hydrologic_unit: "H2".to_string(),
            area_km2: 30.0,
            max_stream_order: 3.0,
            land_use: land_use(1.0, 3.0),
            wells: wells(&[(Sector::Irrigation, 6)]),
        },
    );
    doc.water_use.push(county_record(Sector::Irrigation, WaterSource::Surface, 12.0));
    doc.water_use.push(county_record(Sector::Domestic, WaterSource::Groundwater, 3.0));
    doc
}

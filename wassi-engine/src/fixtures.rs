//! Small documents shared by the engine tests.

use wassi_model::analysis::Analysis;
use wassi_model::document::Document;
use wassi_model::sector::{Sector, WaterSource, WaterType, WellStatus};
use wassi_model::spatial::{County, HydrologicUnit, LandUse, SubUnit, WellCount, WellInventory};
use wassi_model::water_use::{RecordOrigin, SpatialKey, WaterUseRecord};

pub const YEAR: i32 = 2016;

pub fn well(sector: Sector, status: WellStatus, count: u32) -> WellCount {
    WellCount {
        year: YEAR,
        sector,
        status,
        count,
    }
}

fn land_use(crop: f64, developed: f64) -> LandUse {
    LandUse {
        crop_area: [(YEAR, crop)].into(),
        developed_area: [(YEAR, developed)].into(),
    }
}

pub fn sub_unit(county: &str, hydrologic_unit: &str, area: f64, crop: f64, developed: f64) -> SubUnit {
    SubUnit {
        county: county.to_string(),
        hydrologic_unit: hydrologic_unit.to_string(),
        area_km2: area,
        max_stream_order: 1.0,
        land_use: land_use(crop, developed),
        wells: WellInventory::default(),
    }
}

pub fn county_record(id: &str, sector: Sector, source: WaterSource, value: f64) -> WaterUseRecord {
    WaterUseRecord {
        id: id.to_string(),
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

/// County C1 (40 km²) split into sub-unit A (10 km², in H1) and B (30 km², in H2).
///
/// | unit | area | crop | developed | stream order | irrigation wells | domestic wells |
/// |------|------|------|-----------|--------------|------------------|----------------|
/// | C1   | 40   | 5    | 4         |              | 10               | 3              |
/// | A    | 10   | 4    | 1         | 1            | 4                | 3              |
/// | B    | 30   | 1    | 3         | 3            | 6                |                |
pub fn sample_document() -> Document {
    let mut doc = Document::new(Analysis::new("fixture", YEAR));
    doc.counties.insert(
        "C1".to_string(),
        County {
            name: Some("Fixture County".to_string()),
            area_km2: 40.0,
            land_use: land_use(5.0, 4.0),
            wells: WellInventory(vec![
                well(Sector::Irrigation, WellStatus::Active, 10),
                well(Sector::Domestic, WellStatus::Active, 3),
                well(Sector::Domestic, WellStatus::Abandoned, 7),
            ]),
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

    let mut a = sub_unit("C1", "H1", 10.0, 4.0, 1.0);
    a.wells = WellInventory(vec![
        well(Sector::Irrigation, WellStatus::Active, 4),
        well(Sector::Domestic, WellStatus::Active, 3),
    ]);
    let mut b = sub_unit("C1", "H2", 30.0, 1.0, 3.0);
    b.max_stream_order = 3.0;
    b.wells = WellInventory(vec![well(Sector::Irrigation, WellStatus::Active, 6)]);
    doc.sub_units.insert("A".to_string(), a);
    doc.sub_units.insert("B".to_string(), b);
    doc
}

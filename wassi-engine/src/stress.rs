//! Water supply stress ratios per hydrologic unit.
//!
//! With `f = 1 - e` (the share of streamflow not reserved for ecology),
//! `Q` mean flow and `R` recharge in MGD:
//!
//! | ratio        | formula                                   |
//! |--------------|-------------------------------------------|
//! | overall      | `total / (f·(Q + surface) + R)`            |
//! | surface      | `surface / (f·(Q + surface))`              |
//! | groundwater  | `groundwater / R`                          |
//! | sector `k`   | `k / (f·(Q + k surface) + R)`              |
//!
//! Zero denominators give infinities or NaN, which are reported as they are.

use log::{info, warn};
use std::collections::BTreeMap;
use wassi_model::document::Document;
use wassi_model::error::Result;
use wassi_model::sector::{Sector, WaterSource};
use wassi_model::stress::StressValue;
use wassi_model::water_use::{SpatialKey, WaterUseRecord};
use wassi_utils::units::{cfs_to_mgd, mm_km2_per_year_to_mgd};

/// Available supply of one hydrologic unit in million gallons per day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Supply {
    pub mean_flow_mgd: f64,
    pub recharge_mgd: f64,
}

/// Withdrawal of one sector, total and from surface water.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectorWithdrawal {
    pub total: f64,
    pub surface: f64,
}

/// Withdrawals of one hydrologic unit in MGD.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Withdrawals {
    pub total: f64,
    pub surface: f64,
    pub groundwater: f64,
    pub by_sector: BTreeMap<Sector, SectorWithdrawal>,
}

impl Withdrawals {
    /// Add one leaf record (specific sector and source).
    pub fn add(&mut self, sector: Sector, source: WaterSource, value: f64) {
        let entry = self.by_sector.entry(sector).or_default();
        self.total += value;
        entry.total += value;
        match source {
            WaterSource::Surface => {
                self.surface += value;
                entry.surface += value;
            }
            WaterSource::Groundwater => self.groundwater += value,
            WaterSource::All => {}
        }
    }

    pub fn sector(&self, sector: Sector) -> SectorWithdrawal {
        self.by_sector.get(&sector).copied().unwrap_or_default()
    }
}

/// Withdrawals per hydrologic unit for one year.
///
/// Counts non-consumptive records of a specific water type, sector and
/// source, keyed to a hydrologic unit or to one of its sub-units. Summary
/// records and county records are not counted.
pub fn withdrawals_by_unit(doc: &Document, year: i32) -> BTreeMap<String, Withdrawals> {
    let mut totals: BTreeMap<String, Withdrawals> = BTreeMap::new();
    let counted = doc.water_use.iter().filter(|r: &&WaterUseRecord| {
        r.year == year && r.is_withdrawal() && r.sector.is_leaf() && r.source != WaterSource::All
    });
    for record in counted {
        let unit = match &record.location {
            SpatialKey::HydrologicUnit(id) => Some(id.as_str()),
            SpatialKey::SubUnit(id) => doc.sub_units.get(id).map(|s| s.hydrologic_unit.as_str()),
            SpatialKey::County(_) => None,
        };
        if let Some(unit) = unit {
            totals
                .entry(unit.to_string())
                .or_default()
                .add(record.sector, record.source, record.value);
        }
    }
    totals
}

/// The stress ratios of one unit as (sector, source, value).
pub fn stress_ratios(
    supply: &Supply,
    withdrawals: &Withdrawals,
    environmental_flow_fraction: f64,
) -> Vec<(Sector, WaterSource, f64)> {
    let flow_scalar = 1.0 - environmental_flow_fraction;
    let q = supply.mean_flow_mgd;
    let r = supply.recharge_mgd;

    let mut ratios = vec![
        (
            Sector::All,
            WaterSource::All,
            withdrawals.total / (flow_scalar * (q + withdrawals.surface) + r),
        ),
        (
            Sector::All,
            WaterSource::Surface,
            withdrawals.surface / (flow_scalar * (q + withdrawals.surface)),
        ),
        (Sector::All, WaterSource::Groundwater, withdrawals.groundwater / r),
    ];
    for sector in Sector::STRESS_SECTORS {
        let w = withdrawals.sector(sector);
        ratios.push((
            sector,
            WaterSource::All,
            w.total / (flow_scalar * (q + w.surface) + r),
        ));
    }
    ratios
}

/// Result of one stress pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StressOutput {
    pub values: Vec<StressValue>,
    /// Units without mean flow or recharge
    pub skipped: Vec<String>,
}

/// Stress values for every hydrologic unit that has flow and recharge data.
pub fn compute_stress(doc: &Document) -> Result<StressOutput> {
    let analysis = &doc.analysis;
    analysis.validate()?;
    let withdrawals = withdrawals_by_unit(doc, analysis.water_use_year);
    let none = Withdrawals::default();
    let mut output = StressOutput::default();

    for (id, unit) in &doc.hydrologic_units {
        let (Some(flow_cfs), Some(recharge_mm)) = (unit.mean_annual_flow_cfs, unit.recharge_mm) else {
            warn!("Skipping hydrologic unit {id}: no mean annual flow or recharge");
            output.skipped.push(id.clone());
            continue;
        };
        let supply = Supply {
            mean_flow_mgd: cfs_to_mgd(flow_cfs),
            recharge_mgd: mm_km2_per_year_to_mgd(recharge_mm, unit.area_km2),
        };
        let unit_withdrawals = withdrawals.get(id).unwrap_or(&none);
        for (sector, source, value) in
            stress_ratios(&supply, unit_withdrawals, analysis.environmental_flow_fraction)
        {
            output.values.push(StressValue {
                hydrologic_unit: id.clone(),
                sector,
                source,
                value,
            });
        }
    }

    let non_finite = output.values.iter().filter(|v| !v.is_finite()).count();
    info!(
        "Computed {} stress values ({} non-finite), skipped {} units",
        output.values.len(),
        non_finite,
        output.skipped.len()
    );
    Ok(output)
}

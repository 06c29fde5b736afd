//! Spatial weights used to apportion county water use to sub-units.

use crate::error::{Result, WassiError};
use crate::sector::{Sector, WaterSource};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One apportionment factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeightComponent {
    /// Share of county area
    W1,
    /// Share of county crop area
    W2,
    /// Share of summed maximum stream order
    W3,
    /// Share of county developed area
    W4,
    /// Share of county active wells for the sector
    GW1,
}

impl WeightComponent {
    pub fn is_surface(&self) -> bool {
        !matches!(self, WeightComponent::GW1)
    }
}

impl fmt::Display for WeightComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WeightComponent::W1 => "W1",
            WeightComponent::W2 => "W2",
            WeightComponent::W3 => "W3",
            WeightComponent::W4 => "W4",
            WeightComponent::GW1 => "GW1",
        };
        f.write_str(name)
    }
}

impl FromStr for WeightComponent {
    type Err = WassiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "W1" => Ok(WeightComponent::W1),
            "W2" => Ok(WeightComponent::W2),
            "W3" => Ok(WeightComponent::W3),
            "W4" => Ok(WeightComponent::W4),
            "GW1" => Ok(WeightComponent::GW1),
            _ => Err(WassiError::UnknownWeightComponent(s.to_string())),
        }
    }
}

#[derive(Deserialize)]
struct RawWeightFactorDefinition {
    source: WaterSource,
    sector: Sector,
    components: Vec<WeightComponent>,
}

/// The weight components combined for one (source, sector) pair.
///
/// Surface definitions name one or more distinct components from W1..W4
/// and are combined by geometric mean. Groundwater definitions are exactly
/// `[GW1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeightFactorDefinition {
    source: WaterSource,
    sector: Sector,
    components: Vec<WeightComponent>,
}

impl<'de> Deserialize<'de> for WeightFactorDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = RawWeightFactorDefinition::deserialize(deserializer)?;
        WeightFactorDefinition::new(raw.source, raw.sector, raw.components).map_err(de::Error::custom)
    }
}

impl WeightFactorDefinition {
    pub fn new(source: WaterSource, sector: Sector, components: Vec<WeightComponent>) -> Result<Self> {
        let invalid = |reason: &str| WassiError::InvalidWeightFactor {
            water_source: source.to_string(),
            sector: sector.to_string(),
            reason: reason.to_string(),
        };
        if sector == Sector::All {
            return Err(invalid("summary sector cannot be disaggregated"));
        }
        match source {
            WaterSource::All => return Err(invalid("summary source cannot be disaggregated")),
            WaterSource::Surface => {
                if components.is_empty() {
                    return Err(invalid("no components"));
                }
                if components.iter().any(|c| !c.is_surface()) {
                    return Err(invalid("surface weights use W1..W4 only"));
                }
                for (i, c) in components.iter().enumerate() {
                    if components[..i].contains(c) {
                        return Err(invalid("component listed twice"));
                    }
                }
            }
            WaterSource::Groundwater => {
                if components != [WeightComponent::GW1] {
                    return Err(invalid("groundwater weights are exactly [GW1]"));
                }
            }
        }
        Ok(Self {
            source,
            sector,
            components,
        })
    }

    pub fn source(&self) -> WaterSource {
        self.source
    }

    pub fn sector(&self) -> Sector {
        self.sector
    }

    pub fn components(&self) -> &[WeightComponent] {
        &self.components
    }

    /// The definitions applied when an analysis declares none.
    pub fn defaults() -> Vec<WeightFactorDefinition> {
        use WeightComponent::*;
        let surface = [
            (Sector::Irrigation, vec![W1, W2, W3]),
            (Sector::PublicSupply, vec![W1, W4]),
            (Sector::Industrial, vec![W1, W4]),
            (Sector::Domestic, vec![W1, W4]),
            (Sector::PowerGeneration, vec![W1, W3]),
            (Sector::Livestock, vec![W1, W2]),
            (Sector::Aquaculture, vec![W1, W3]),
            (Sector::Mining, vec![W1]),
        ];
        let mut defs: Vec<WeightFactorDefinition> = surface
            .into_iter()
            .map(|(sector, components)| WeightFactorDefinition {
                source: WaterSource::Surface,
                sector,
                components,
            })
            .collect();
        defs.extend(Sector::LEAVES.iter().map(|sector| WeightFactorDefinition {
            source: WaterSource::Groundwater,
            sector: *sector,
            components: vec![GW1],
        }));
        defs
    }
}

/// Surface weights of one sub-unit. Each Wi sums to 1 over a county's sub-units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceWeightSet {
    #[serde(with = "crate::lossless")]
    pub w1: f64,
    #[serde(with = "crate::lossless")]
    pub w2: f64,
    #[serde(with = "crate::lossless")]
    pub w3: f64,
    #[serde(with = "crate::lossless")]
    pub w4: f64,
}

impl SurfaceWeightSet {
    /// Value of a surface component; `None` for GW1.
    pub fn component(&self, component: WeightComponent) -> Option<f64> {
        match component {
            WeightComponent::W1 => Some(self.w1),
            WeightComponent::W2 => Some(self.w2),
            WeightComponent::W3 => Some(self.w3),
            WeightComponent::W4 => Some(self.w4),
            WeightComponent::GW1 => None,
        }
    }
}

/// Serialised form of one [`GroundwaterWeightSet`] entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorRatio {
    pub sector: Sector,
    #[serde(with = "crate::lossless")]
    pub ratio: f64,
}

/// Active-well share per sector for one sub-unit.
///
/// A sector missing from the map contributes zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SectorRatio>", into = "Vec<SectorRatio>")]
pub struct GroundwaterWeightSet(pub BTreeMap<Sector, f64>);

impl GroundwaterWeightSet {
    pub fn ratio(&self, sector: Sector) -> Option<f64> {
        self.0.get(&sector).copied()
    }
}

impl From<Vec<SectorRatio>> for GroundwaterWeightSet {
    fn from(ratios: Vec<SectorRatio>) -> Self {
        GroundwaterWeightSet(ratios.into_iter().map(|r| (r.sector, r.ratio)).collect())
    }
}

impl From<GroundwaterWeightSet> for Vec<SectorRatio> {
    fn from(set: GroundwaterWeightSet) -> Self {
        set.0
            .into_iter()
            .map(|(sector, ratio)| SectorRatio { sector, ratio })
            .collect()
    }
}

/// All weights of one sub-unit within its county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyDisaggregationRecord {
    pub sub_unit: String,
    pub surface: SurfaceWeightSet,
    #[serde(default)]
    pub groundwater: GroundwaterWeightSet,
}

impl CountyDisaggregationRecord {
    /// Weight of one component for this sub-unit.
    ///
    /// GW1 needs a sector; a sector without wells yields zero.
    pub fn component(&self, component: WeightComponent, sector: Sector) -> f64 {
        match self.surface.component(component) {
            Some(value) => value,
            None => self.groundwater.ratio(sector).unwrap_or(0.0),
        }
    }
}

/// Weight records per county id.
pub type DisaggregationTable = BTreeMap<String, Vec<CountyDisaggregationRecord>>;

#[cfg(test)]
mod tests {
    use super::*;
    use WeightComponent::*;

    #[test]
    fn test_surface_definition_rejects_gw1_and_duplicates() {
        assert!(WeightFactorDefinition::new(WaterSource::Surface, Sector::Irrigation, vec![W1, GW1]).is_err());
        assert!(WeightFactorDefinition::new(WaterSource::Surface, Sector::Irrigation, vec![W1, W1]).is_err());
        assert!(WeightFactorDefinition::new(WaterSource::Surface, Sector::Irrigation, vec![]).is_err());
        assert!(WeightFactorDefinition::new(WaterSource::Surface, Sector::Irrigation, vec![W1, W2, W3]).is_ok());
    }

    #[test]
    fn test_groundwater_definition_is_gw1_only() {
        assert!(WeightFactorDefinition::new(WaterSource::Groundwater, Sector::Domestic, vec![GW1]).is_ok());
        assert!(WeightFactorDefinition::new(WaterSource::Groundwater, Sector::Domestic, vec![W1]).is_err());
    }

    #[test]
    fn test_summary_source_and_sector_rejected() {
        assert!(WeightFactorDefinition::new(WaterSource::All, Sector::Domestic, vec![W1]).is_err());
        assert!(WeightFactorDefinition::new(WaterSource::Surface, Sector::All, vec![W1]).is_err());
    }

    #[test]
    fn test_defaults_are_valid() {
        for def in WeightFactorDefinition::defaults() {
            let rebuilt = WeightFactorDefinition::new(def.source(), def.sector(), def.components().to_vec());
            assert_eq!(rebuilt.as_ref(), Ok(&def));
        }
    }

    #[test]
    fn test_definition_validated_on_deserialize() {
        let ok = r#"{"source":"Surface Water","sector":"Public Supply","components":["W1","W4"]}"#;
        let def: WeightFactorDefinition = serde_json::from_str(ok).unwrap();
        assert_eq!(def.components(), &[W1, W4]);
        let bad = r#"{"source":"Groundwater","sector":"Domestic","components":["W1"]}"#;
        assert!(serde_json::from_str::<WeightFactorDefinition>(bad).is_err());
    }

    #[test]
    fn test_record_component_lookup() {
        let record = CountyDisaggregationRecord {
            sub_unit: "A".to_string(),
            surface: SurfaceWeightSet {
                w1: 0.25,
                w2: 0.8,
                w3: 0.5,
                w4: 0.1,
            },
            groundwater: GroundwaterWeightSet(BTreeMap::from([(Sector::Irrigation, 0.4)])),
        };
        assert_eq!(record.component(W2, Sector::Domestic), 0.8);
        assert_eq!(record.component(GW1, Sector::Irrigation), 0.4);
        assert_eq!(record.component(GW1, Sector::Domestic), 0.0);
    }

    #[test]
    fn test_groundwater_set_serializes_non_finite() {
        let set = GroundwaterWeightSet(BTreeMap::from([(Sector::Mining, f64::NAN)]));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[{"sector":"Mining","ratio":"NaN"}]"#);
        let back: GroundwaterWeightSet = serde_json::from_str(&json).unwrap();
        assert!(back.ratio(Sector::Mining).unwrap().is_nan());
    }
}

use crate::sector::{Sector, WaterSource};
use serde::{Deserialize, Serialize};

/// One stress ratio for a hydrologic unit.
///
/// `value` may be infinite or NaN when supply is zero; that is a result,
/// not an error, and is serialised as such.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressValue {
    pub hydrologic_unit: String,
    pub sector: Sector,
    pub source: WaterSource,
    #[serde(with = "crate::lossless")]
    pub value: f64,
}

impl StressValue {
    pub fn is_finite(&self) -> bool {
        self.value.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_stress_survives_json() {
        let value = StressValue {
            hydrologic_unit: "030300020101".to_string(),
            sector: Sector::All,
            source: WaterSource::Groundwater,
            value: f64::INFINITY,
        };
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains(r#""value":"inf""#));
        let back: StressValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
        assert!(!back.is_finite());
    }
}

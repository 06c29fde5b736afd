//! Serde helpers that keep infinities and NaN intact.
//!
//! JSON has no literal for non-finite numbers, so they are written as the
//! strings `"inf"`, `"-inf"` and `"NaN"`. Finite values stay numbers.
//!
//! ```
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct Row {
//!     #[serde(with = "wassi_model::lossless")]
//!     value: f64,
//! }
//! ```

use serde::{de, Deserialize, Deserializer, Serializer};
use wassi_utils::floats::{format_lossless, parse_lossless};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_str(&format_lossless(*value))
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => parse_lossless(&s).map_err(de::Error::custom),
    }
}

/// Same encoding for optional values; `null` stays `None`.
pub mod option {
    use super::NumberOrText;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use wassi_utils::floats::parse_lossless;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(n)) => Ok(Some(n)),
            Some(NumberOrText::Text(s)) => parse_lossless(&s).map(Some).map_err(de::Error::custom),
        }
    }
}

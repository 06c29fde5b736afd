/// Error types for WaSSI analyses
use thiserror::Error;

/// Main error type for WaSSI operations.
///
/// Division by zero is not represented here: weights and stress ratios
/// carry infinities and NaN as ordinary values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WassiError {
    /// A required input collection is missing or the configuration is unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A year-tagged dataset is absent for an entity that needs it
    #[error("Missing {what} for {entity} in {year}")]
    MissingData {
        entity: String,
        what: String,
        year: i32,
    },

    /// A water-use record references a county with no weight records
    #[error("No disaggregation weights for county {county}")]
    MissingWeights { county: String },

    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    #[error("Unknown water source: {0}")]
    UnknownWaterSource(String),

    #[error("Unknown water type: {0}")]
    UnknownWaterType(String),

    #[error("Unknown well status: {0}")]
    UnknownWellStatus(String),

    #[error("Unknown weight component: {0}")]
    UnknownWeightComponent(String),

    /// A weight-factor definition that cannot be evaluated
    #[error("Invalid weight factors for {water_source}/{sector}: {reason}")]
    InvalidWeightFactor {
        water_source: String,
        sector: String,
        reason: String,
    },

    /// An entity refers to another entity that is not in the document
    #[error("{kind} {id} references missing {target_kind} {target}")]
    InvalidReference {
        kind: &'static str,
        id: String,
        target_kind: &'static str,
        target: String,
    },
}

/// Type alias for Results using WassiError
pub type Result<T> = std::result::Result<T, WassiError>;

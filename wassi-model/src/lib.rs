//! Core types for multi-sector, multi-source WaSSI analyses.
//!
//! A [`document::Document`] is a complete snapshot of the inputs of one
//! analysis: counties, hydrologic units, the sub-units formed by their
//! intersection, water-use records and the analysis configuration with
//! its derived collections.

pub mod analysis;
pub mod document;
pub mod error;
pub mod lossless;
pub mod sector;
pub mod spatial;
pub mod stress;
pub mod water_use;
pub mod weights;

pub use error::{Result, WassiError};

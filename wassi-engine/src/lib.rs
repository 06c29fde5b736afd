//! The WaSSI computation pipeline.
//!
//! Components run in a fixed order, each reading a document snapshot and
//! returning a derived collection:
//!
//! 1. [`weights`]: surface (W1..W4) and groundwater (GW1) weights per sub-unit
//! 2. [`disaggregation`]: county water use apportioned to sub-units
//! 3. [`stress`]: supply stress ratios per hydrologic unit

pub mod disaggregation;
pub mod stress;
pub mod weights;

#[cfg(test)]
pub(crate) mod fixtures;

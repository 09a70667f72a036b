//! # Structural Calculations
//!
//! Eurocode 2 capacity checks for rectangular concrete beams carrying the
//! code-minimum reinforcement. Calculations follow the pattern:
//!
//! - [`DesignParameters`] - fixed material and detailing inputs (JSON/TOML-serializable)
//! - [`CapacityResult`] - calculation results (JSON-serializable)
//! - `calculate(width_mm, height_mm, &params) -> CapacityResult` - pure calculation function
//!
//! ## Available Calculations
//!
//! - [`capacity`] - minimum steel, bending and shear resistances

pub mod capacity;
pub mod parameters;

pub use capacity::{calculate, CapacityResult};
pub use parameters::DesignParameters;

//! # beamcheck_core - IFC Beam Check Engine
//!
//! `beamcheck_core` reads beams from an IFC building model, works out each
//! beam's rectangular cross-section, and computes the Eurocode 2 capacities of
//! that section with code-minimum reinforcement. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions from records and parameters to results
//! - **Forgiving**: A beam without usable dimensions is reported, not an error
//! - **JSON-First**: All public types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types for the few fatal conditions
//!
//! ## Quick Start
//!
//! ```rust
//! use beamcheck_core::calculations::{calculate, DesignParameters};
//!
//! let result = calculate(300.0, 600.0, &DesignParameters::default());
//! assert_eq!(result.effective_depth_mm, 554.0);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("bending_resistance_knm"));
//! ```
//!
//! ## Modules
//!
//! - [`model`] - Building model records, STEP parser and IFC reader
//! - [`resolver`] - Cross-section dimension fallback chain
//! - [`calculations`] - Minimum-reinforcement capacities
//! - [`report`] - Per-beam rows and summary counts
//! - [`settings`] - Width threshold and design parameters for a run
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Model loading and atomic report saves

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod model;
pub mod report;
pub mod resolver;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use errors::{CheckError, CheckResult};
pub use file_io::{open_model, save_report, ExportFormat};
pub use report::{check_model, BeamCheckReport, BeamRow, CheckSummary, WidthStatus};
pub use settings::CheckSettings;

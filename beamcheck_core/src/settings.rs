//! # Check Settings
//!
//! Everything a run needs besides the model itself: the minimum beam width
//! and the Eurocode 2 design parameters. Settings are read once (defaults,
//! then a config file, then command-line overrides), validated, and shared
//! read-only by every member check.
//!
//! ## Structure
//!
//! ```text
//! CheckSettings
//! ├── min_width_mm: f64 (default 200)
//! └── design: DesignParameters (C30/37, B500, cover 30, ...)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::settings::CheckSettings;
//!
//! let settings: CheckSettings = serde_json::from_str(r#"{ "min_width_mm": 250.0 }"#).unwrap();
//! assert_eq!(settings.min_width_mm, 250.0);
//! assert_eq!(settings.design.fck_mpa, 30.0);
//! assert!(settings.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::DesignParameters;
use crate::errors::{CheckError, CheckResult};

/// Default minimum beam width (mm)
pub const DEFAULT_MIN_WIDTH_MM: f64 = 200.0;

/// Settings for one check run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Beams narrower than this are reported as NOT_OK (mm)
    pub min_width_mm: f64,

    /// Material and detailing parameters for the capacity calculation
    pub design: DesignParameters,
}

impl Default for CheckSettings {
    fn default() -> Self {
        CheckSettings {
            min_width_mm: DEFAULT_MIN_WIDTH_MM,
            design: DesignParameters::default(),
        }
    }
}

impl CheckSettings {
    /// Validate the width threshold and the design parameters.
    pub fn validate(&self) -> CheckResult<()> {
        if !self.min_width_mm.is_finite() || self.min_width_mm <= 0.0 {
            return Err(CheckError::invalid_input(
                "min_width_mm",
                self.min_width_mm.to_string(),
                "Minimum width must be a positive number",
            ));
        }
        self.design.validate()
    }
}

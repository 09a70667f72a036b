//! # Design Parameters
//!
//! Material strengths, partial safety factors and detailing assumptions used
//! by the capacity calculator. One immutable value is built at start-up (from
//! defaults or a config file) and passed by reference into every calculation.
//!
//! ## JSON / TOML Example
//!
//! ```json
//! {
//!   "fck_mpa": 30.0,
//!   "fyk_mpa": 500.0,
//!   "gamma_c": 1.5,
//!   "gamma_s": 1.15,
//!   "nominal_cover_mm": 30.0,
//!   "bar_diameter_mm": 16.0,
//!   "stirrup_diameter_mm": 8.0,
//!   "stirrup_legs": 2,
//!   "strut_angle_deg": 45.0,
//!   "lever_arm_ratio": 0.9,
//!   "rho_l_max": 0.02
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CheckError, CheckResult};

/// Eurocode 2 material and detailing parameters.
///
/// Missing fields fall back to the C30/37 + B500 defaults when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignParameters {
    /// Characteristic concrete compressive strength fck (MPa), e.g. 30 for C30/37
    pub fck_mpa: f64,

    /// Characteristic reinforcement yield strength fyk (MPa), e.g. 500 for B500
    pub fyk_mpa: f64,

    /// Partial safety factor for concrete γc
    pub gamma_c: f64,

    /// Partial safety factor for reinforcement γs
    pub gamma_s: f64,

    /// Nominal concrete cover to the stirrups (mm)
    pub nominal_cover_mm: f64,

    /// Main longitudinal bar diameter (mm)
    pub bar_diameter_mm: f64,

    /// Stirrup bar diameter (mm)
    pub stirrup_diameter_mm: f64,

    /// Number of stirrup legs crossing a shear crack
    pub stirrup_legs: u32,

    /// Compression strut angle θ (degrees)
    pub strut_angle_deg: f64,

    /// Lever arm as a fraction of effective depth (z/d)
    pub lever_arm_ratio: f64,

    /// Upper bound on the longitudinal reinforcement ratio used for V_Rd,c
    pub rho_l_max: f64,
}

impl Default for DesignParameters {
    fn default() -> Self {
        DesignParameters {
            fck_mpa: 30.0,
            fyk_mpa: 500.0,
            gamma_c: 1.5,
            gamma_s: 1.15,
            nominal_cover_mm: 30.0,
            bar_diameter_mm: 16.0,
            stirrup_diameter_mm: 8.0,
            stirrup_legs: 2,
            strut_angle_deg: 45.0,
            lever_arm_ratio: 0.9,
            rho_l_max: 0.02,
        }
    }
}

impl DesignParameters {
    /// Distance from the tension face to the centroid of the main bars (mm)
    pub fn tension_face_offset_mm(&self) -> f64 {
        self.nominal_cover_mm + self.stirrup_diameter_mm + 0.5 * self.bar_diameter_mm
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> CheckResult<()> {
        let positive = [
            ("fck_mpa", self.fck_mpa),
            ("fyk_mpa", self.fyk_mpa),
            ("gamma_c", self.gamma_c),
            ("gamma_s", self.gamma_s),
            ("bar_diameter_mm", self.bar_diameter_mm),
            ("stirrup_diameter_mm", self.stirrup_diameter_mm),
            ("rho_l_max", self.rho_l_max),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(CheckError::invalid_input(
                    field,
                    value.to_string(),
                    "Must be a positive number",
                ));
            }
        }

        if !self.nominal_cover_mm.is_finite() || self.nominal_cover_mm < 0.0 {
            return Err(CheckError::invalid_input(
                "nominal_cover_mm",
                self.nominal_cover_mm.to_string(),
                "Cover cannot be negative",
            ));
        }
        if self.stirrup_legs == 0 {
            return Err(CheckError::invalid_input(
                "stirrup_legs",
                self.stirrup_legs.to_string(),
                "At least one stirrup leg is required",
            ));
        }
        if !(self.strut_angle_deg > 0.0 && self.strut_angle_deg < 90.0) {
            return Err(CheckError::invalid_input(
                "strut_angle_deg",
                self.strut_angle_deg.to_string(),
                "Strut angle must be strictly between 0 and 90 degrees",
            ));
        }
        if !(self.lever_arm_ratio > 0.0 && self.lever_arm_ratio <= 1.0) {
            return Err(CheckError::invalid_input(
                "lever_arm_ratio",
                self.lever_arm_ratio.to_string(),
                "Lever arm ratio z/d must be in (0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DesignParameters::default().validate().is_ok());
    }

    #[test]
    fn test_tension_face_offset() {
        // 30 + 8 + 16/2
        assert_eq!(DesignParameters::default().tension_face_offset_mm(), 46.0);
    }

    #[test]
    fn test_invalid_strut_angle() {
        let params = DesignParameters {
            strut_angle_deg: 90.0,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_invalid_strength() {
        let params = DesignParameters {
            fck_mpa: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_legs_rejected() {
        let params = DesignParameters {
            stirrup_legs: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: DesignParameters = serde_json::from_str(r#"{ "fck_mpa": 35.0 }"#).unwrap();
        assert_eq!(params.fck_mpa, 35.0);
        assert_eq!(params.fyk_mpa, 500.0);
        assert_eq!(params.stirrup_legs, 2);
    }
}

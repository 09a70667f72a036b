//! # Unit Types
//!
//! Lightweight wrappers for the units that cross module boundaries. Everything
//! inside the calculator works in N, mm and MPa (N/mm²); results are reported in
//! kN and kN·m, and model lengths are normalized to millimeters through a single
//! [`UnitScale`] factor.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::units::{KiloNewtonMeters, LengthUnit, NewtonMillimeters, UnitScale};
//!
//! let scale = UnitScale::from(LengthUnit::Meter);
//! assert_eq!(scale.to_mm(0.3), 300.0);
//!
//! let moment: KiloNewtonMeters = NewtonMillimeters(54.0e6).into();
//! assert_eq!(moment.0, 54.0);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Length Units
// ============================================================================

/// Length units a model or a dimension string may be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LengthUnit {
    Millimeter,
    Centimeter,
    Meter,
}

impl LengthUnit {
    /// Millimeters per one unit
    pub fn mm_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeter => 1.0,
            LengthUnit::Centimeter => 10.0,
            LengthUnit::Meter => 1000.0,
        }
    }

    /// Map an SI prefix on the metre (`None` = no prefix) to a supported unit.
    ///
    /// Prefixes other than milli and centi are not supported and return `None`.
    pub fn from_si_prefix(prefix: Option<&str>) -> Option<Self> {
        match prefix {
            None => Some(LengthUnit::Meter),
            Some(p) if p.eq_ignore_ascii_case("MILLI") => Some(LengthUnit::Millimeter),
            Some(p) if p.eq_ignore_ascii_case("CENTI") => Some(LengthUnit::Centimeter),
            Some(_) => None,
        }
    }

    /// Short symbol used in logs and reports
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeter => "mm",
            LengthUnit::Centimeter => "cm",
            LengthUnit::Meter => "m",
        }
    }
}

/// Factor converting a model's native length unit to millimeters.
///
/// Defaults to 1000.0: a model without usable unit metadata is assumed to be
/// in meters.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitScale(pub f64);

impl UnitScale {
    /// Scale for models already in millimeters
    pub const MILLIMETERS: UnitScale = UnitScale(1.0);

    /// Get the raw factor
    pub fn value(self) -> f64 {
        self.0
    }

    /// Convert one model length to millimeters
    pub fn to_mm(self, length: f64) -> f64 {
        length * self.0
    }

    /// Convert a raw (dx, dy) pair to millimeters, preserving axis order
    pub fn pair_to_mm(self, (dx, dy): (f64, f64)) -> (f64, f64) {
        (self.to_mm(dx), self.to_mm(dy))
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        UnitScale::from(LengthUnit::Meter)
    }
}

impl From<LengthUnit> for UnitScale {
    fn from(unit: LengthUnit) -> Self {
        UnitScale(unit.mm_per_unit())
    }
}

// ============================================================================
// Force and Moment Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

/// Moment in newton-millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMillimeters(pub f64);

/// Moment in kilonewton-meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtonMeters(pub f64);

impl From<NewtonMillimeters> for KiloNewtonMeters {
    fn from(nmm: NewtonMillimeters) -> Self {
        KiloNewtonMeters(nmm.0 / 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_is_meters() {
        assert_eq!(UnitScale::default(), UnitScale(1000.0));
    }

    #[test]
    fn test_si_prefix_mapping() {
        assert_eq!(LengthUnit::from_si_prefix(None), Some(LengthUnit::Meter));
        assert_eq!(
            LengthUnit::from_si_prefix(Some("MILLI")),
            Some(LengthUnit::Millimeter)
        );
        assert_eq!(
            LengthUnit::from_si_prefix(Some("CENTI")),
            Some(LengthUnit::Centimeter)
        );
        assert_eq!(LengthUnit::from_si_prefix(Some("KILO")), None);
    }

    #[test]
    fn test_pair_to_mm_keeps_axis_order() {
        let scale = UnitScale::from(LengthUnit::Centimeter);
        assert_eq!(scale.pair_to_mm((60.0, 30.0)), (600.0, 300.0));
    }

    #[test]
    fn test_force_and_moment_conversions() {
        let kn: KiloNewtons = Newtons(52_500.0).into();
        assert_eq!(kn.0, 52.5);
        let knm: KiloNewtonMeters = NewtonMillimeters(1.5e6).into();
        assert_eq!(knm.0, 1.5);
    }

    #[test]
    fn test_serialization() {
        let scale = UnitScale(1.0);
        let json = serde_json::to_string(&scale).unwrap();
        assert_eq!(json, "1.0");
        let roundtrip: UnitScale = serde_json::from_str(&json).unwrap();
        assert_eq!(scale, roundtrip);
    }
}

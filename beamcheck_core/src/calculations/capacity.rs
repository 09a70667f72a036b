//! # Minimum-Reinforcement Capacity (EN 1992-1-1)
//!
//! Closed-form capacities of a rectangular reinforced-concrete section that
//! carries only the code-minimum reinforcement:
//!
//! - minimum tension steel As,min (9.2.1.1)
//! - bending resistance M_Rd with a fixed lever arm z = (z/d)·d
//! - concrete shear resistance V_Rd,c without shear reinforcement (6.2.2)
//! - shear resistance V_Rd,s of minimum stirrups (6.2.3, 9.2.2)
//!
//! Every function is pure. A section without positive width or effective depth
//! has no computable capacity and yields zeros rather than an error.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::calculations::capacity::calculate;
//! use beamcheck_core::calculations::DesignParameters;
//!
//! let params = DesignParameters::default();
//! let result = calculate(300.0, 600.0, &params);
//!
//! assert_eq!(result.effective_depth_mm, 554.0);
//! assert!(result.bending_resistance_knm > 0.0);
//! assert!(result.shear_resistance_concrete_kn > 0.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::DesignParameters;
use crate::units::{KiloNewtonMeters, KiloNewtons, NewtonMillimeters, Newtons};

/// Absolute floor on the minimum tension-reinforcement ratio
const RHO_MIN_FLOOR: f64 = 0.0013;

/// Results of the capacity calculation for one section.
///
/// ## JSON Example
///
/// ```json
/// {
///   "effective_depth_mm": 554.0,
///   "min_steel_area_mm2": 250.3,
///   "bending_resistance_knm": 54.27,
///   "shear_resistance_concrete_kn": 52.78,
///   "shear_resistance_stirrups_kn": 113.99
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapacityResult {
    /// Effective depth d used for all quantities (mm)
    pub effective_depth_mm: f64,

    /// Minimum tension reinforcement As,min (mm²)
    pub min_steel_area_mm2: f64,

    /// Bending resistance with As,min (kN·m)
    pub bending_resistance_knm: f64,

    /// Shear resistance of the concrete alone V_Rd,c (kN)
    pub shear_resistance_concrete_kn: f64,

    /// Shear resistance of minimum stirrups V_Rd,s (kN)
    pub shear_resistance_stirrups_kn: f64,
}

/// Effective depth d = h − c_nom − ø_stirrup − ø_bar/2, never negative (mm)
pub fn effective_depth_mm(height_mm: f64, params: &DesignParameters) -> f64 {
    (height_mm - params.tension_face_offset_mm()).max(0.0)
}

/// Mean axial tensile strength fctm = 0.3·fck^(2/3) (MPa)
pub fn fctm_mpa(fck_mpa: f64) -> f64 {
    0.3 * fck_mpa.powf(2.0 / 3.0)
}

/// Minimum tension-reinforcement ratio ρ_min = max(0.26·fctm/fyk, 0.0013)
pub fn rho_min(params: &DesignParameters) -> f64 {
    (0.26 * fctm_mpa(params.fck_mpa) / params.fyk_mpa).max(RHO_MIN_FLOOR)
}

/// Lever arm z = (z/d)·d (mm)
pub fn lever_arm_mm(effective_depth_mm: f64, params: &DesignParameters) -> f64 {
    params.lever_arm_ratio * effective_depth_mm
}

/// Effective depth of a section that has computable capacity
fn capacity_depth(width_mm: f64, height_mm: f64, params: &DesignParameters) -> Option<f64> {
    let d = effective_depth_mm(height_mm, params);
    (d > 0.0 && width_mm > 0.0).then_some(d)
}

/// Minimum tension reinforcement As,min = ρ_min·b·d (mm²)
pub fn min_steel_area_mm2(width_mm: f64, height_mm: f64, params: &DesignParameters) -> f64 {
    match capacity_depth(width_mm, height_mm, params) {
        Some(d) => rho_min(params) * width_mm * d,
        None => 0.0,
    }
}

/// Bending resistance M_Rd = As,min·(fyk/γs)·z (kN·m)
pub fn bending_resistance_knm(width_mm: f64, height_mm: f64, params: &DesignParameters) -> f64 {
    let Some(d) = capacity_depth(width_mm, height_mm, params) else {
        return 0.0;
    };
    let as_min = rho_min(params) * width_mm * d;
    let fyd = params.fyk_mpa / params.gamma_s;
    let m_rd = NewtonMillimeters(as_min * fyd * lever_arm_mm(d, params));
    KiloNewtonMeters::from(m_rd).0
}

/// Concrete shear resistance V_Rd,c = (0.18/γc)·k·(100·ρ·fck)^(1/3)·b·d (kN)
///
/// The size factor k = 1 + sqrt(200/d) is capped at 2.0 and the
/// reinforcement ratio at `rho_l_max`.
pub fn shear_resistance_concrete_kn(
    width_mm: f64,
    height_mm: f64,
    params: &DesignParameters,
) -> f64 {
    let Some(d) = capacity_depth(width_mm, height_mm, params) else {
        return 0.0;
    };
    let rho = rho_min(params).min(params.rho_l_max);
    let k = (1.0 + (200.0 / d).max(0.0).sqrt()).min(2.0);
    let strength_term = (100.0 * rho * params.fck_mpa).powf(1.0 / 3.0);
    let v_rd_c = Newtons((0.18 / params.gamma_c) * k * strength_term * width_mm * d);
    KiloNewtons::from(v_rd_c).0
}

/// Shear resistance of minimum stirrups V_Rd,s = (Asw/s)·z·(fyk/γs)·cotθ (kN)
///
/// Asw/s is taken at the minimum shear reinforcement ratio
/// 0.08·sqrt(fck)/fyk, multiplied by the number of legs.
pub fn shear_resistance_stirrups_kn(
    width_mm: f64,
    height_mm: f64,
    params: &DesignParameters,
) -> f64 {
    let Some(d) = capacity_depth(width_mm, height_mm, params) else {
        return 0.0;
    };
    let asw_per_s = 0.08 * params.fck_mpa.sqrt() / params.fyk_mpa
        * width_mm
        * f64::from(params.stirrup_legs);
    let cot_theta = 1.0 / params.strut_angle_deg.to_radians().tan();
    let fyd = params.fyk_mpa / params.gamma_s;
    let v_rd_s = Newtons(asw_per_s * lever_arm_mm(d, params) * fyd * cot_theta);
    KiloNewtons::from(v_rd_s).0
}

/// Calculate all capacities for a `width_mm` × `height_mm` section.
pub fn calculate(width_mm: f64, height_mm: f64, params: &DesignParameters) -> CapacityResult {
    CapacityResult {
        effective_depth_mm: effective_depth_mm(height_mm, params),
        min_steel_area_mm2: min_steel_area_mm2(width_mm, height_mm, params),
        bending_resistance_knm: bending_resistance_knm(width_mm, height_mm, params),
        shear_resistance_concrete_kn: shear_resistance_concrete_kn(width_mm, height_mm, params),
        shear_resistance_stirrups_kn: shear_resistance_stirrups_kn(width_mm, height_mm, params),
    }
}

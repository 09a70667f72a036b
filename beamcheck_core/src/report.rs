//! # Beam Check Report
//!
//! Runs the resolver, the width rule and the capacity calculator over every
//! beam of a model and collects one row per beam plus summary counts.
//!
//! A beam whose dimensions cannot be resolved still gets a row: its status
//! is `UNKNOWN` and every numeric column is empty.
//!
//! ## Example
//!
//! ```rust
//! use beamcheck_core::model::{BuildingModel, StructuralMemberRecord};
//! use beamcheck_core::report::{check_model, WidthStatus};
//! use beamcheck_core::settings::CheckSettings;
//! use beamcheck_core::units::UnitScale;
//!
//! let mut beam = StructuralMemberRecord::beam("0K7w3B$Xn5RwF1yH8d2sQp");
//! beam.tag = Some("300x600mm".to_string());
//! let model = BuildingModel::new(None, UnitScale::default(), vec![beam]);
//!
//! let report = check_model(&model, &CheckSettings::default(), "inline");
//! assert_eq!(report.rows[0].width_status, WidthStatus::Ok);
//! assert_eq!(report.summary.ok, 1);
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::calculations::calculate;
use crate::model::{BuildingModel, MemberKind, StructuralMemberRecord};
use crate::resolver::{resolve, SourceTag};
use crate::settings::CheckSettings;
use crate::units::UnitScale;

/// Outcome of the minimum-width rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidthStatus {
    Ok,
    NotOk,
    Unknown,
}

impl WidthStatus {
    pub fn label(self) -> &'static str {
        match self {
            WidthStatus::Ok => "OK",
            WidthStatus::NotOk => "NOT_OK",
            WidthStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for WidthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Apply the minimum-width rule; `None` means the width is not known
pub fn classify_width(width_mm: Option<f64>, min_width_mm: f64) -> WidthStatus {
    match width_mm {
        Some(width) if width >= min_width_mm => WidthStatus::Ok,
        Some(_) => WidthStatus::NotOk,
        None => WidthStatus::Unknown,
    }
}

/// One output row per beam. Numeric fields are `None` for unresolved beams.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamRow {
    /// IFC GlobalId of the beam
    pub id: String,
    pub width_mm: Option<f64>,
    pub height_mm: Option<f64>,
    pub width_status: WidthStatus,
    pub min_steel_area_mm2: Option<f64>,
    pub bending_resistance_knm: Option<f64>,
    pub shear_resistance_concrete_kn: Option<f64>,
    pub shear_resistance_stirrups_kn: Option<f64>,
    pub source_tag: SourceTag,
}

/// Beam counts by width status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total: usize,
    pub ok: usize,
    pub not_ok: usize,
    pub unknown: usize,
}

impl CheckSummary {
    /// Count the statuses of a set of rows
    pub fn from_rows(rows: &[BeamRow]) -> Self {
        rows.iter().fold(CheckSummary::default(), |mut summary, row| {
            summary.total += 1;
            match row.width_status {
                WidthStatus::Ok => summary.ok += 1,
                WidthStatus::NotOk => summary.not_ok += 1,
                WidthStatus::Unknown => summary.unknown += 1,
            }
            summary
        })
    }
}

/// Result of checking every beam of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamCheckReport {
    /// Model file the report was produced from
    pub source_file: String,

    /// IFC schema named in the model header
    pub schema: Option<String>,

    /// Millimeters per model length unit
    pub unit_scale: UnitScale,

    /// Settings the beams were checked against
    pub settings: CheckSettings,

    pub generated_at: DateTime<Utc>,

    /// One row per beam, in model order
    pub rows: Vec<BeamRow>,

    pub summary: CheckSummary,
}

/// Check a single beam.
pub fn check_member(
    member: &StructuralMemberRecord,
    unit_scale: UnitScale,
    settings: &CheckSettings,
) -> BeamRow {
    let resolution = resolve(member, unit_scale);
    let width_mm = resolution.dimensions.map(|d| d.width_mm);
    let height_mm = resolution.dimensions.map(|d| d.height_mm);
    let capacity = resolution
        .dimensions
        .map(|d| calculate(d.width_mm, d.height_mm, &settings.design));

    BeamRow {
        id: member.global_id.clone(),
        width_mm,
        height_mm,
        width_status: classify_width(width_mm, settings.min_width_mm),
        min_steel_area_mm2: capacity.map(|c| c.min_steel_area_mm2),
        bending_resistance_knm: capacity.map(|c| c.bending_resistance_knm),
        shear_resistance_concrete_kn: capacity.map(|c| c.shear_resistance_concrete_kn),
        shear_resistance_stirrups_kn: capacity.map(|c| c.shear_resistance_stirrups_kn),
        source_tag: resolution.source,
    }
}

/// Check every beam of a model, in model order.
pub fn check_model(
    model: &BuildingModel,
    settings: &CheckSettings,
    source_file: impl Into<String>,
) -> BeamCheckReport {
    let unit_scale = model.unit_scale();

    let rows: Vec<BeamRow> = model
        .members_of_kind(MemberKind::Beam)
        .map(|member| {
            let row = check_member(member, unit_scale, settings);
            if row.width_status == WidthStatus::Unknown {
                warn!(global_id = row.id.as_str(); "No usable cross-section found");
            }
            row
        })
        .collect();

    let summary = CheckSummary::from_rows(&rows);
    info!(
        total = summary.total,
        ok = summary.ok,
        not_ok = summary.not_ok,
        unknown = summary.unknown;
        "Beam check complete"
    );

    BeamCheckReport {
        source_file: source_file.into(),
        schema: model.schema().map(str::to_string),
        unit_scale,
        settings: *settings,
        generated_at: Utc::now(),
        rows,
        summary,
    }
}

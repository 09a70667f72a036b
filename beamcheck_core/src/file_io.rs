//! # File I/O Module
//!
//! Reading building models and writing check reports:
//! - **Model input**: IFC files in the STEP clear-text encoding
//! - **Report output**: CSV (one row per beam) or pretty-printed JSON
//! - **Atomic saves**: write to `.tmp`, sync, rename to prevent half-written
//!   reports
//!
//! ## Example
//!
//! ```rust,no_run
//! use beamcheck_core::file_io::{open_model, save_report, ExportFormat};
//! use beamcheck_core::report::check_model;
//! use beamcheck_core::settings::CheckSettings;
//! use std::path::Path;
//!
//! let model = open_model(Path::new("building.ifc"))?;
//! let report = check_model(&model, &CheckSettings::default(), "building.ifc");
//!
//! let out = Path::new("building.beam_check.csv");
//! save_report(&report, out, ExportFormat::from_path(out))?;
//! # Ok::<(), beamcheck_core::errors::CheckError>(())
//! ```

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::{CheckError, CheckResult};
use crate::model::{ifc, step, BuildingModel, MemberKind};
use crate::report::{BeamCheckReport, BeamRow};

/// CSV header, in output column order
pub const CSV_COLUMNS: [&str; 9] = [
    "id",
    "width_mm",
    "height_mm",
    "width_status",
    "min_steel_area_mm2",
    "bending_resistance_knm",
    "shear_resistance_concrete_kn",
    "shear_resistance_stirrups_kn",
    "source_tag",
];

/// Open and read an IFC model.
///
/// # Returns
///
/// * `Ok(BuildingModel)` - Parsed model
/// * `Err(CheckError::ModelUnreadable)` - Missing, unreadable or syntactically
///   invalid file
pub fn open_model(path: &Path) -> CheckResult<BuildingModel> {
    let bytes = fs::read(path).map_err(|e| {
        CheckError::model_unreadable(path.display().to_string(), e.to_string())
    })?;
    let source = String::from_utf8_lossy(&bytes);

    let file = step::parse_step(&source).map_err(|e| {
        CheckError::model_unreadable(path.display().to_string(), e.to_string())
    })?;
    let model = ifc::read_model(&file);

    info!(
        path = path.display().to_string(),
        schema = model.schema().unwrap_or("unknown"),
        beams = model.members_of_kind(MemberKind::Beam).count(),
        unit_scale = model.unit_scale().value();
        "Opened model"
    );
    Ok(model)
}

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.json` selects JSON; any other extension selects CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }
}

/// Save a report with atomic write semantics.
///
/// The save process:
/// 1. Render the report as CSV or JSON
/// 2. Write to a temporary file (`<name>.tmp`)
/// 3. Sync to disk (fsync)
/// 4. Rename the temporary file over `path`
pub fn save_report(report: &BeamCheckReport, path: &Path, format: ExportFormat) -> CheckResult<()> {
    let contents = match format {
        ExportFormat::Csv => render_csv(report),
        ExportFormat::Json => {
            serde_json::to_string_pretty(report).map_err(|e| CheckError::SerializationError {
                reason: e.to_string(),
            })?
        }
    };

    let tmp_path = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    };

    let written = write_synced(&tmp_path, contents.as_bytes()).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| {
            CheckError::file_error("rename to final", path.display().to_string(), e.to_string())
        })
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }

    debug!(path = path.display().to_string(), rows = report.rows.len(); "Saved report");
    Ok(())
}

fn write_synced(tmp_path: &Path, bytes: &[u8]) -> CheckResult<()> {
    let mut tmp_file = File::create(tmp_path).map_err(|e| {
        CheckError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(bytes).map_err(|e| {
        CheckError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        CheckError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })
}

/// Render the report rows as CSV with a header line
pub fn render_csv(report: &BeamCheckReport) -> String {
    let mut out = CSV_COLUMNS.join(",");
    out.push('\n');
    for row in &report.rows {
        push_csv_row(&mut out, row);
    }
    out
}

fn push_csv_row(out: &mut String, row: &BeamRow) {
    let number = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();
    let cells = [
        quote_csv(&row.id),
        number(row.width_mm),
        number(row.height_mm),
        row.width_status.label().to_string(),
        number(row.min_steel_area_mm2),
        number(row.bending_resistance_knm),
        number(row.shear_resistance_concrete_kn),
        number(row.shear_resistance_stirrups_kn),
        row.source_tag.label().to_string(),
    ];
    let _ = writeln!(out, "{}", cells.join(","));
}

/// Quote a field when it contains a separator, quote or line break
fn quote_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

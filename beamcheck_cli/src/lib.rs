//! CLI logic for the beamcheck tool.
//!
//! Loads settings, opens the IFC model, checks every beam, prints the results
//! and writes the report file.

mod args;
mod config;

pub use args::Args;

use std::path::{Path, PathBuf};

use log::info;

use beamcheck_core::report::{check_model, BeamCheckReport, BeamRow, CheckSummary};
use beamcheck_core::{open_model, save_report, CheckResult, ExportFormat};

/// Run the beamcheck CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CheckError` for:
/// - Configuration loading errors
/// - Invalid settings
/// - A model that cannot be opened (before any beam is checked)
/// - Report write errors
pub fn run(args: &Args) -> CheckResult<BeamCheckReport> {
    info!(input_path = args.input; "Checking beams");

    let mut settings = config::load_config(args.config.as_ref())?;
    if let Some(min_width) = args.min_width {
        settings.min_width_mm = min_width;
    }
    settings.validate()?;

    let input = Path::new(&args.input);
    let model = open_model(input)?;
    let report = check_model(&model, &settings, args.input.as_str());

    if !args.summary_only {
        for row in &report.rows {
            println!("{}", format_row(row));
        }
    }
    println!();
    println!("{}", format_summary(&report.summary, settings.min_width_mm));

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_path(input));
    save_report(&report, &output, ExportFormat::from_path(&output))?;

    println!();
    println!("Report saved to {}", output.display());
    info!(output_file = output.display().to_string(); "Report exported successfully");

    Ok(report)
}

/// `<stem>.beam_check.csv` next to the input model
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("beam_check.csv")
}

/// Console lines for one beam
pub fn format_row(row: &BeamRow) -> String {
    let dims = row.width_mm.zip(row.height_mm);
    let (Some((b, h)), Some(as_min), Some(m_rd), Some(v_rdc), Some(v_rds)) = (
        dims,
        row.min_steel_area_mm2,
        row.bending_resistance_knm,
        row.shear_resistance_concrete_kn,
        row.shear_resistance_stirrups_kn,
    ) else {
        return format!("- {}: no usable cross-section found", row.id);
    };

    format!(
        "- {}: b={:.0} mm, h={:.0} mm -> width check: {} ({})\n    \
         As,min ≈ {:.0} mm², M_Rd ≈ {:.1} kNm\n    \
         Shear: V_Rd,c ≈ {:.1} kN, V_Rd,s ≈ {:.1} kN",
        row.id,
        b,
        h,
        row.width_status,
        row.source_tag,
        as_min,
        m_rd,
        v_rdc,
        v_rds
    )
}

/// Console summary block
pub fn format_summary(summary: &CheckSummary, min_width_mm: f64) -> String {
    format!(
        "--- Beam check summary ---\n\
         Total beams: {}\n\
         Width OK (≥ {min_width_mm:.0} mm): {}\n\
         Width NOT OK (< {min_width_mm:.0} mm): {}\n\
         Unknown dimensions: {}",
        summary.total, summary.ok, summary.not_ok, summary.unknown
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamcheck_core::report::WidthStatus;
    use beamcheck_core::resolver::SourceTag;

    fn row() -> BeamRow {
        BeamRow {
            id: "1kTvXnbbzCWw8lcMd1dR4o".to_string(),
            width_mm: Some(300.0),
            height_mm: Some(600.0),
            width_status: WidthStatus::Ok,
            min_steel_area_mm2: Some(250.32),
            bending_resistance_knm: Some(54.27),
            shear_resistance_concrete_kn: Some(52.78),
            shear_resistance_stirrups_kn: Some(113.99),
            source_tag: SourceTag::Profile { raw: (600.0, 300.0) },
        }
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("models/tower.ifc")),
            PathBuf::from("models/tower.beam_check.csv")
        );
    }

    #[test]
    fn test_format_resolved_row() {
        let text = format_row(&row());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "- 1kTvXnbbzCWw8lcMd1dR4o: b=300 mm, h=600 mm -> width check: OK (profile)"
        );
        assert_eq!(lines[1], "    As,min ≈ 250 mm², M_Rd ≈ 54.3 kNm");
        assert_eq!(lines[2], "    Shear: V_Rd,c ≈ 52.8 kN, V_Rd,s ≈ 114.0 kN");
    }

    #[test]
    fn test_format_unknown_row() {
        let unknown = BeamRow {
            width_mm: None,
            height_mm: None,
            width_status: WidthStatus::Unknown,
            min_steel_area_mm2: None,
            bending_resistance_knm: None,
            shear_resistance_concrete_kn: None,
            shear_resistance_stirrups_kn: None,
            source_tag: SourceTag::Unknown,
            ..row()
        };
        assert_eq!(
            format_row(&unknown),
            "- 1kTvXnbbzCWw8lcMd1dR4o: no usable cross-section found"
        );
    }

    #[test]
    fn test_format_summary() {
        let summary = CheckSummary {
            total: 10,
            ok: 7,
            not_ok: 2,
            unknown: 1,
        };
        let text = format_summary(&summary, 200.0);
        assert!(text.starts_with("--- Beam check summary ---\nTotal beams: 10\n"));
        assert!(text.contains("Width OK (≥ 200 mm): 7"));
        assert!(text.contains("Width NOT OK (< 200 mm): 2"));
        assert!(text.ends_with("Unknown dimensions: 1"));
    }
}

use std::{fs, path::PathBuf};

use tempfile::tempdir;

use beamcheck_cli::{run, Args};
use beamcheck_core::{CheckError, WidthStatus};

/// Fixture models live at the workspace root, not in the crate
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

fn args(input: PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        min_width: None,
        summary_only: true,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_sample_model_to_csv() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("beams_mm.beam_check.csv");

    let report = run(&args(fixture("beams_mm.ifc"), output.clone())).expect("run succeeds");

    assert_eq!(report.summary.total, 10);
    assert_eq!(report.summary.ok, 7);
    assert_eq!(report.summary.not_ok, 2);
    assert_eq!(report.summary.unknown, 1);

    let csv = fs::read_to_string(&output).expect("report written");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("id,width_mm,height_mm,width_status,"));
    assert!(lines[1].starts_with("1kTvXnbbzCWw8lcMd1dR4o,300,600,OK,250.32"));
    assert_eq!(lines[6], "1Ee3Ww5Qq7Aa9Zz1Xx3Cc5,,,UNKNOWN,,,,,unknown");
}

#[test]
fn e2e_sample_model_to_json() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("report.json");

    run(&args(fixture("beams_mm.ifc"), output.clone())).expect("run succeeds");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("report written"))
            .expect("valid JSON");
    assert_eq!(json["summary"]["total"], 10);
    assert_eq!(json["rows"][2]["width_status"], "NOT_OK");
    assert_eq!(json["rows"][4]["source_tag"]["source"], "name_parse");
    assert_eq!(json["rows"][4]["source_tag"]["text"], "30x60cm");
}

#[test]
fn e2e_config_file_and_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("beamcheck.toml");
    fs::write(&config, "min_width_mm = 250.0\n").unwrap();

    let mut from_config = args(fixture("beams_mm.ifc"), temp_dir.path().join("a.csv"));
    from_config.config = Some(config.to_string_lossy().to_string());
    let report = run(&from_config).expect("run succeeds");
    assert_eq!(report.settings.min_width_mm, 250.0);
    assert_eq!(report.summary.ok, 4);
    assert_eq!(report.summary.not_ok, 5);

    let mut overridden = from_config;
    overridden.output = Some(temp_dir.path().join("b.csv").to_string_lossy().to_string());
    overridden.min_width = Some(150.0);
    let report = run(&overridden).expect("run succeeds");
    assert_eq!(report.summary.ok, 9);
    assert_eq!(report.summary.not_ok, 0);
    assert!(report
        .rows
        .iter()
        .all(|r| r.width_status != WidthStatus::NotOk));
}

#[test]
fn e2e_missing_model_is_fatal() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output = temp_dir.path().join("out.csv");

    let err = run(&args(temp_dir.path().join("missing.ifc"), output.clone())).unwrap_err();

    assert!(matches!(err, CheckError::ModelUnreadable { .. }));
    assert!(!output.exists());
}

#[test]
fn e2e_invalid_min_width_is_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let mut invalid = args(fixture("beams_mm.ifc"), temp_dir.path().join("out.csv"));
    invalid.min_width = Some(-1.0);

    let err = run(&invalid).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_INPUT");
}

use frel_algo::{FeederInput, RawSegmentRow};
use frel_batch::{load_batch_manifest, run_batch, BatchRunnerConfig, RunStatus};
use frel_core::{load_config_from_path, ReliabilityConfig};
use std::fs;
use tempfile::tempdir;

fn feeder(id: &str, main_users: u64) -> FeederInput {
    FeederInput::new(id)
        .with_group(
            "main",
            vec![
                RawSegmentRow::new("M-1", 1.2, main_users, true, "PD_VLY-300: 100%"),
                RawSegmentRow::new("M-2", 0.6, 0, true, "PD_VLY-300: 100%"),
            ],
        )
        .with_group(
            "branch",
            vec![RawSegmentRow::new(
                "B-1",
                3.4,
                25,
                false,
                "PD_JKLYJ-150: 60%\nNone: 10%\nPD_VLY: 30%",
            )],
        )
}

#[test]
fn batch_writes_manifest_with_summary_tables() {
    let dir = tempdir().unwrap();
    let manifest_path = dir.path().join("runs").join("batch_manifest.json");

    let mut config = BatchRunnerConfig::new(
        ReliabilityConfig::default(),
        vec![feeder("F-A", 120), feeder("F-B", 40), FeederInput::new("F-C")],
    );
    config.threads = 2;
    config.manifest_path = Some(manifest_path.clone());

    let summary = run_batch(&config).unwrap();
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failure, 1);
    assert_eq!(summary.manifest_path.as_deref(), Some(manifest_path.as_path()));

    let manifest = load_batch_manifest(&manifest_path).unwrap();
    assert_eq!(manifest.num_feeders, 3);
    assert_eq!(manifest.success, 2);
    assert_eq!(manifest.failure, 1);

    let first = &manifest.feeders[0];
    assert_eq!(first.feeder_id, "F-A");
    assert_eq!(first.status, RunStatus::Ok);
    let labels: Vec<&str> = first.summary.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, ["Main line", "Branch line", "Whole feeder"]);
    assert_eq!(first.summary[2].total_users, 145);

    let report = summary.records[0].report.as_ref().unwrap();
    assert_eq!(first.summary[2].label, report.feeder.label);
    assert!((first.summary[2].saidi_total - report.feeder.saidi_total).abs() < 1e-12);
    assert!((first.summary[2].asai_percent - report.feeder.asai_percent).abs() < 1e-9);

    let failed = &manifest.feeders[2];
    assert_eq!(failed.status, RunStatus::Error);
    assert!(failed.summary.is_empty());
    assert!(failed.error.as_ref().unwrap().contains("main"));
}

#[test]
fn batch_runs_with_configuration_loaded_from_disk() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("reliability.json");
    fs::write(
        &config_path,
        r#"{
            "constants": {
                "Cable_Fault_Rate": 0.09282879,
                "Overhead_Fault_Rate": 0.15337829,
                "Auto_Isolation_Time": 0.557,
                "Manual_Isolation_Time": 2.0,
                "Cable_Repair_Time": 3.073,
                "Scheduled_Outage_Rate": 0.0221,
                "Scheduled_Total_Time": 5.475,
                "Annual_Power_Hours": 8784
            },
            "groups": [{"key": "main", "label": "Trunk"}],
            "feeder_label": "Feeder total"
        }"#,
    )
    .unwrap();
    let reliability = load_config_from_path(&config_path).unwrap();
    assert_eq!(reliability.constants.annual_hours, 8784.0);

    let input = FeederInput::new("F-LEAP").with_group(
        "main",
        vec![RawSegmentRow::new("S-1", 2.0, 100, true, "PD_VLY-300: 100%")],
    );
    let summary = run_batch(&BatchRunnerConfig::new(reliability, vec![input])).unwrap();
    let report = summary.records[0].report.as_ref().unwrap();

    assert_eq!(report.feeder.label, "Feeder total");
    assert_eq!(report.groups[0].summary.label, "Trunk");
    let expected = (1.0 - report.feeder.saidi_total / 8784.0) * 100.0;
    assert!((report.feeder.asai_percent - expected).abs() < 1e-6);
}

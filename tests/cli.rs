use std::fs;

use assert_cmd::Command;
use orrery::config::load_config;
use predicates::prelude::*;

#[test]
fn windows_writes_charts_and_tables() {
    let dir = tempfile::tempdir().expect("tempdir");

    Command::cargo_bin("orrery")
        .expect("orrery bin")
        .args([
            "windows",
            "--ephemeris",
            "elements",
            "--start-year",
            "2033",
            "--end-year",
            "2035",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2033: closest approach on 2033-"))
        .stdout(predicate::str::contains("2035: closest approach on"));

    for name in ["launch_windows.png", "travel_times.png"] {
        let metadata = fs::metadata(dir.path().join(name)).expect("png metadata");
        assert!(metadata.len() > 0, "{name} should not be empty");
    }

    let csv = fs::read_to_string(dir.path().join("launch_windows.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4, "header plus three years");
    assert!(csv.starts_with("year,closest_date,distance_au"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("launch_windows.json")).unwrap())
            .unwrap();
    assert_eq!(json["backend"], "elements");
    assert_eq!(json["windows"].as_array().unwrap().len(), 3);
    assert_eq!(json["closest"]["year"], 2035);
}

#[test]
fn inverted_year_range_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("orrery")
        .unwrap()
        .args([
            "windows",
            "--ephemeris",
            "elements",
            "--start-year",
            "2040",
            "--end-year",
            "2030",
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("precedes"));
    assert!(!dir.path().join("launch_windows.png").exists());
}

#[test]
fn out_of_range_cadence_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    for step in ["1e8", "1e-7"] {
        Command::cargo_bin("orrery")
            .unwrap()
            .args([
                "windows",
                "--ephemeris",
                "elements",
                "--start-year",
                "2030",
                "--end-year",
                "2030",
                "--step-days",
                step,
                "--output-dir",
                dir.path().to_str().unwrap(),
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("step_days must lie in"))
            .stderr(predicate::str::contains("panicked").not());
    }
}

#[test]
fn missing_kernels_point_at_the_fetcher() {
    let dir = tempfile::tempdir().expect("tempdir");
    Command::cargo_bin("orrery")
        .unwrap()
        .args([
            "windows",
            "--kernel-dir",
            dir.path().to_str().unwrap(),
            "--output-dir",
            dir.path().to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fetch_kernels"));
}

#[cfg(not(feature = "viz"))]
#[test]
fn animation_requires_viz_feature() {
    Command::cargo_bin("orrery")
        .unwrap()
        .arg("animate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("viz"));
}

#[test]
fn shipped_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/configs/orrery.toml");
    let config = load_config(path).expect("shipped config should load");
    assert_eq!(config, orrery::config::OrreryConfig::default());
}

//! Export helpers for launch-window sweeps (CSV table and JSON summary).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use orrery_approach::LaunchWindow;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One CSV row / JSON entry per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowRecord {
    pub year: i32,
    pub closest_date: String,
    pub distance_au: f64,
    pub earth_radius_au: f64,
    pub mars_radius_au: f64,
    pub transfer_semi_major_axis_au: f64,
    pub transfer_days: f64,
    pub transfer_label: String,
}

impl From<&LaunchWindow> for WindowRecord {
    fn from(w: &LaunchWindow) -> Self {
        let (months, days) = w.transfer.months_and_days();
        Self {
            year: w.approach.year,
            closest_date: w.approach.date().format("%Y-%m-%d").to_string(),
            distance_au: w.approach.distance_au,
            earth_radius_au: w.earth_radius_au,
            mars_radius_au: w.mars_radius_au,
            transfer_semi_major_axis_au: w.transfer.transfer_semi_major_axis_au,
            transfer_days: w.transfer.duration_days,
            transfer_label: format!("{months}m{days}d"),
        }
    }
}

/// Metadata stored alongside the per-year entries in the JSON summary.
#[derive(Debug, Clone, Serialize)]
pub struct SweepMetadata<'a> {
    pub backend: &'a str,
    pub reference_frame: &'a str,
    pub step_days: f64,
}

#[derive(Serialize)]
struct Summary<'a> {
    #[serde(flatten)]
    meta: &'a SweepMetadata<'a>,
    closest: Option<&'a WindowRecord>,
    windows: &'a [WindowRecord],
}

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

/// Convert sweep output into export records, preserving year order.
pub fn records(windows: &[LaunchWindow]) -> Vec<WindowRecord> {
    windows.iter().map(WindowRecord::from).collect()
}

/// Write the records as CSV with a header row.
pub fn write_csv(writer: impl Write, records: &[WindowRecord]) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a pretty-printed JSON summary, including the closest year overall.
pub fn write_json(
    writer: impl Write,
    meta: &SweepMetadata<'_>,
    records: &[WindowRecord],
) -> Result<(), ExportError> {
    let closest = records
        .iter()
        .min_by(|a, b| a.distance_au.total_cmp(&b.distance_au));
    let summary = Summary {
        meta,
        closest,
        windows: records,
    };
    serde_json::to_writer_pretty(writer, &summary)?;
    Ok(())
}

/// Write both artifacts to disk.
pub fn write_artifacts(
    csv_path: &Path,
    json_path: &Path,
    meta: &SweepMetadata<'_>,
    windows: &[LaunchWindow],
) -> Result<(), ExportError> {
    let records = records(windows);
    write_csv(writer_for_path(csv_path)?, &records)?;
    let mut json = writer_for_path(json_path)?;
    write_json(&mut json, meta, &records)?;
    json.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, distance_au: f64) -> WindowRecord {
        WindowRecord {
            year,
            closest_date: format!("{year}-07-01"),
            distance_au,
            earth_radius_au: 1.0,
            mars_radius_au: 1.5,
            transfer_semi_major_axis_au: 1.25,
            transfer_days: 255.6,
            transfer_label: "8m15d".into(),
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[record(2033, 0.42), record(2034, 0.9)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "year,closest_date,distance_au,earth_radius_au,mars_radius_au,transfer_semi_major_axis_au,transfer_days,transfer_label"
        );
        assert!(lines.next().unwrap().starts_with("2033,2033-07-01,0.42,"));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn json_summary_names_closest_year() {
        let meta = SweepMetadata {
            backend: "elements",
            reference_frame: "ECLIPJ2000",
            step_days: 1.0,
        };
        let mut buf = Vec::new();
        write_json(&mut buf, &meta, &[record(2033, 0.42), record(2035, 0.38)]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["backend"], "elements");
        assert_eq!(value["closest"]["year"], 2035);
        assert_eq!(value["windows"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_sweep_has_no_closest_entry() {
        let meta = SweepMetadata {
            backend: "spice",
            reference_frame: "ECLIPJ2000",
            step_days: 1.0,
        };
        let mut buf = Vec::new();
        write_json(&mut buf, &meta, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["closest"].is_null());
    }
}

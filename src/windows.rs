//! The `windows` run: sweep the years, then write charts and tables.

use std::path::PathBuf;

use orrery_approach::{ApproachError, LaunchWindow, SweepSettings, sweep};
use orrery_config::{EphemerisBackend, EphemerisConfig, WindowsConfig};
use orrery_ephem::spice::REFERENCE_FRAME;
use orrery_ephem::{EphemerisError, KeplerianEphemeris, PositionSource, SpiceEphemeris};
use orrery_export::{ExportError, SweepMetadata, write_artifacts};
use orrery_plot::{PlotError, render_distance_chart, render_transfer_chart};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum WindowsError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Approach(#[from] ApproachError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Files written by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifacts {
    pub distance_chart: PathBuf,
    pub transfer_chart: PathBuf,
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// Open the configured backend.
pub fn open_source(config: &EphemerisConfig) -> Result<Box<dyn PositionSource>, EphemerisError> {
    match config.backend {
        EphemerisBackend::Spice => {
            let eph = SpiceEphemeris::load(&config.kernel_dir)?;
            info!(kernel_dir = %eph.kernel_dir().display(), "using SPICE ephemeris");
            Ok(Box::new(eph))
        }
        EphemerisBackend::Elements => Ok(Box::new(KeplerianEphemeris::new())),
    }
}

/// One stdout line per year.
pub fn summary_line(window: &LaunchWindow) -> String {
    format!(
        "{}: closest approach on {} at {:.3} AU",
        window.approach.year,
        window.approach.date().format("%Y-%m-%d"),
        window.approach.distance_au
    )
}

/// Sweep the configured years and write both charts, the CSV and the JSON.
pub fn run_windows<S>(
    source: &S,
    config: &WindowsConfig,
) -> Result<(Vec<LaunchWindow>, Artifacts), WindowsError>
where
    S: PositionSource + ?Sized,
{
    let settings = SweepSettings {
        start_year: config.start_year,
        end_year: config.end_year,
        step_days: config.step_days,
    };
    let windows = sweep(source, &settings)?;

    let artifacts = Artifacts {
        distance_chart: config.distance_chart_path(),
        transfer_chart: config.transfer_chart_path(),
        csv: config.csv_path(),
        json: config.json_path(),
    };
    let size = (config.chart_width, config.chart_height);
    render_distance_chart(&artifacts.distance_chart, &windows, size)?;
    render_transfer_chart(&artifacts.transfer_chart, &windows, size)?;

    let meta = SweepMetadata {
        backend: source.label(),
        reference_frame: REFERENCE_FRAME,
        step_days: config.step_days,
    };
    write_artifacts(&artifacts.csv, &artifacts.json, &meta, &windows)?;
    info!(
        years = windows.len(),
        output_dir = %config.output_dir.display(),
        "launch windows written"
    );
    Ok((windows, artifacts))
}

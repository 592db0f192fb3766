//! `orrery windows` computes Earth–Mars closest approaches and plots them;
//! `orrery` (or `orrery animate`) opens the animated orbit view.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use orrery::config::{EphemerisBackend, OrreryConfig, load_config};
use orrery::windows::{open_source, run_windows, summary_line};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "orrery", version, about = "Earth–Mars launch windows and orbit animation")]
struct Cli {
    /// What to run; without one the animation opens.
    #[arg(value_enum)]
    mode: Option<Mode>,

    /// TOML or YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// First year of the sweep.
    #[arg(long)]
    start_year: Option<i32>,

    /// Last year of the sweep (inclusive).
    #[arg(long)]
    end_year: Option<i32>,

    /// Sampling cadence within each year, in days.
    #[arg(long)]
    step_days: Option<f64>,

    /// Directory receiving charts and tables.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Position source.
    #[arg(long, value_enum)]
    ephemeris: Option<BackendArg>,

    /// Directory holding the SPICE kernels.
    #[arg(long)]
    kernel_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    Windows,
    Animate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendArg {
    Spice,
    Elements,
}

impl From<BackendArg> for EphemerisBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Spice => EphemerisBackend::Spice,
            BackendArg::Elements => EphemerisBackend::Elements,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match cli.mode.unwrap_or(Mode::Animate) {
        Mode::Windows => windows(&config),
        Mode::Animate => animate(&config),
    }
}

/// Command-line flags override the config file, which overrides defaults.
fn resolve_config(cli: &Cli) -> Result<OrreryConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => OrreryConfig::default(),
    };

    let windows = &mut config.windows;
    if let Some(year) = cli.start_year {
        windows.start_year = year;
    }
    if let Some(year) = cli.end_year {
        windows.end_year = year;
    }
    if let Some(step) = cli.step_days {
        windows.step_days = step;
    }
    if let Some(dir) = &cli.output_dir {
        windows.output_dir = dir.clone();
    }
    if let Some(backend) = cli.ephemeris {
        config.ephemeris.backend = backend.into();
    }
    if let Some(dir) = &cli.kernel_dir {
        config.ephemeris.kernel_dir = dir.clone();
    }

    config.validate()?;
    Ok(config)
}

fn windows(config: &OrreryConfig) -> Result<()> {
    let source = open_source(&config.ephemeris).with_context(|| {
        format!(
            "failed to open the ephemeris (run `fetch_kernels` or pass `--ephemeris elements`); kernel dir {}",
            config.ephemeris.kernel_dir.display()
        )
    })?;
    let (windows, artifacts) = run_windows(source.as_ref(), &config.windows)?;

    for window in &windows {
        println!("{}", summary_line(window));
    }
    println!();
    println!("Distance chart: {}", artifacts.distance_chart.display());
    println!("Transfer chart: {}", artifacts.transfer_chart.display());
    println!("Table:          {}", artifacts.csv.display());
    println!("Summary:        {}", artifacts.json.display());
    Ok(())
}

#[cfg(feature = "viz")]
fn animate(config: &OrreryConfig) -> Result<()> {
    use std::time::Duration;

    use orrery::animation::OrbitAnimation;

    let today = chrono::Utc::now().date_naive();
    let animation = OrbitAnimation::from_config(&config.animation, today)?;
    let source = open_source(&config.ephemeris)?;
    let interval = Duration::from_millis(config.animation.interval_ms);
    orrery::viewer::run(animation, source, interval)?;
    Ok(())
}

#[cfg(not(feature = "viz"))]
fn animate(_config: &OrreryConfig) -> Result<()> {
    anyhow::bail!(
        "the animation needs the `viz` feature; rebuild with `--features viz` or run `orrery windows`"
    )
}

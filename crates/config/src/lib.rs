//! Run configuration for the Orrery tools.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! standard 2025–2045 daily sweep against the SPICE kernels in `data/spice`.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use orrery_core::constants::{MAX_STEP_DAYS, MIN_STEP_DAYS};
use serde::Deserialize;
use thiserror::Error;

/// Top-level configuration document.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct OrreryConfig {
    pub windows: WindowsConfig,
    pub ephemeris: EphemerisConfig,
    pub animation: AnimationConfig,
}

/// Launch-window sweep and artifact settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsConfig {
    pub start_year: i32,
    pub end_year: i32,
    pub step_days: f64,
    pub output_dir: PathBuf,
    pub distance_chart: String,
    pub transfer_chart: String,
    pub csv: String,
    pub json: String,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for WindowsConfig {
    fn default() -> Self {
        Self {
            start_year: 2025,
            end_year: 2045,
            step_days: 1.0,
            output_dir: PathBuf::from("."),
            distance_chart: "launch_windows.png".to_string(),
            transfer_chart: "travel_times.png".to_string(),
            csv: "launch_windows.csv".to_string(),
            json: "launch_windows.json".to_string(),
            chart_width: 1200,
            chart_height: 600,
        }
    }
}

impl WindowsConfig {
    pub fn distance_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.distance_chart)
    }

    pub fn transfer_chart_path(&self) -> PathBuf {
        self.output_dir.join(&self.transfer_chart)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(&self.csv)
    }

    pub fn json_path(&self) -> PathBuf {
        self.output_dir.join(&self.json)
    }
}

/// Which position source to query.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EphemerisBackend {
    /// JPL DE421 through CSPICE.
    #[default]
    Spice,
    /// Mean Keplerian elements; needs no kernel files.
    Elements,
}

/// Ephemeris source settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EphemerisConfig {
    pub backend: EphemerisBackend,
    pub kernel_dir: PathBuf,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            backend: EphemerisBackend::Spice,
            kernel_dir: PathBuf::from("data/spice"),
        }
    }
}

/// Display color and name of an animated body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BodyStyle {
    pub name: String,
    pub color: [u8; 3],
}

impl BodyStyle {
    fn new(name: &str, color: [u8; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
        }
    }
}

/// Orbit animation settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AnimationConfig {
    /// Simulated days advanced per frame.
    pub days_per_frame: f64,
    /// Wall-clock milliseconds between frames.
    pub interval_ms: u64,
    pub trail_length: usize,
    pub star_count: usize,
    pub star_seed: u64,
    /// Half-width of the square view, in AU before radial exaggeration.
    pub axis_limit_au: f64,
    /// First simulated day (`YYYY-MM-DD`); today when absent.
    pub start_date: Option<String>,
    pub bodies: Vec<BodyStyle>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            days_per_frame: 5.0,
            interval_ms: 50,
            trail_length: 50,
            star_count: 500,
            star_seed: 7,
            axis_limit_au: 40.0,
            start_date: None,
            bodies: vec![
                BodyStyle::new("mercury", [128, 128, 128]),
                BodyStyle::new("venus", [255, 165, 0]),
                BodyStyle::new("earth", [0, 0, 255]),
                BodyStyle::new("mars", [255, 0, 0]),
                BodyStyle::new("jupiter barycenter", [139, 69, 19]),
                BodyStyle::new("saturn barycenter", [255, 215, 0]),
                BodyStyle::new("uranus barycenter", [173, 216, 230]),
                BodyStyle::new("neptune barycenter", [128, 0, 128]),
            ],
        }
    }
}

impl AnimationConfig {
    /// Parsed `start_date`, if one is configured.
    pub fn start_date(&self) -> Result<Option<NaiveDate>, ConfigError> {
        self.start_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    ConfigError::Invalid(format!("animation.start_date `{raw}` is not YYYY-MM-DD"))
                })
            })
            .transpose()
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl OrreryConfig {
    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.windows;
        if w.end_year < w.start_year {
            return Err(ConfigError::Invalid(format!(
                "windows.end_year ({}) precedes windows.start_year ({})",
                w.end_year, w.start_year
            )));
        }
        if !(MIN_STEP_DAYS..=MAX_STEP_DAYS).contains(&w.step_days) {
            return Err(ConfigError::Invalid(format!(
                "windows.step_days must lie in [{MIN_STEP_DAYS}, {MAX_STEP_DAYS}] (got {})",
                w.step_days
            )));
        }
        if w.chart_width == 0 || w.chart_height == 0 {
            return Err(ConfigError::Invalid("chart dimensions must be non-zero".into()));
        }

        let a = &self.animation;
        if !(a.days_per_frame.is_finite() && a.days_per_frame > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.days_per_frame must be positive (got {})",
                a.days_per_frame
            )));
        }
        if !(a.axis_limit_au.is_finite() && a.axis_limit_au > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "animation.axis_limit_au must be positive (got {})",
                a.axis_limit_au
            )));
        }
        if a.interval_ms == 0 || a.trail_length == 0 {
            return Err(ConfigError::Invalid(
                "animation.interval_ms and animation.trail_length must be non-zero".into(),
            ));
        }
        a.start_date()?;
        Ok(())
    }
}

/// Load and validate a configuration file; `.toml` is read as TOML, anything else as YAML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<OrreryConfig, ConfigError> {
    let path = path.as_ref();
    let config: OrreryConfig = if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    config.validate()?;
    Ok(config)
}

//! Heliocentric planet positions for the Orrery workspace.
//!
//! Two backends answer the same [`PositionSource`] query: [`SpiceEphemeris`]
//! reads JPL DE421 through the CSPICE toolkit, and [`KeplerianEphemeris`]
//! evaluates mean orbital elements without any kernel files.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDateTime;
use orrery_core::vector::Vector3;
use thiserror::Error;

pub mod elements;
pub mod kernels;
pub mod spice;

pub use elements::{KeplerianEphemeris, MeanElements};
pub use spice::{KernelSummary, SpiceEphemeris, StateVector};

/// Errors surfaced while loading or querying an ephemeris.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("kernel `{name}` is missing at {path}")]
    MissingKernel { name: &'static str, path: PathBuf },
    #[error("kernel `{name}` path contains invalid UTF-8: {path}")]
    InvalidKernelPath { name: &'static str, path: PathBuf },
    #[error("failed to read metadata for kernel `{name}`: {source}")]
    Io {
        name: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("kernels already loaded from {loaded}, cannot reload from {requested}")]
    KernelDirMismatch { loaded: PathBuf, requested: PathBuf },
    #[error("invalid epoch string `{epoch}`")]
    InvalidEpoch { epoch: String },
    #[error("epoch {epoch} is outside the element fit ({first_year}-{last_year})")]
    EpochOutOfRange {
        epoch: String,
        first_year: i32,
        last_year: i32,
    },
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    #[error("SPICE kernel call failed: {message}")]
    Spice { message: String },
}

/// Bodies the calculator can place, from Mercury out to Neptune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl Body {
    pub const ALL: [Body; 8] = [
        Body::Mercury,
        Body::Venus,
        Body::Earth,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Earth => "Earth",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
        }
    }

    /// NAIF ID of the system barycenter.
    pub fn naif_id(self) -> i32 {
        match self {
            Self::Mercury => 1,
            Self::Venus => 2,
            Self::Earth => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
        }
    }

    /// SPICE target name used for heliocentric queries.
    pub fn spice_target(self) -> &'static str {
        match self {
            Self::Mercury => "MERCURY BARYCENTER",
            Self::Venus => "VENUS BARYCENTER",
            Self::Earth => "EARTH BARYCENTER",
            Self::Mars => "MARS BARYCENTER",
            Self::Jupiter => "JUPITER BARYCENTER",
            Self::Saturn => "SATURN BARYCENTER",
            Self::Uranus => "URANUS BARYCENTER",
            Self::Neptune => "NEPTUNE BARYCENTER",
        }
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Body {
    type Err = EphemerisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let target = normalize_heliocentric_target_name(s.trim());
        Body::ALL
            .into_iter()
            .find(|body| body.spice_target() == target)
            .ok_or_else(|| EphemerisError::UnknownBody(s.to_string()))
    }
}

/// Normalize a SPICE target name for heliocentric queries.
///
/// Major planets map to their system barycenters so every body is queried the
/// same way (e.g. `earth` and `EARTH BARYCENTER` are the same target). Other
/// names are upper-cased and passed through.
pub fn normalize_heliocentric_target_name(name: &str) -> String {
    let upper = name.to_ascii_uppercase();
    if upper.contains("BARYCENTER") {
        return upper;
    }
    match upper.as_str() {
        "MERCURY" | "VENUS" | "EARTH" | "MARS" | "JUPITER" | "SATURN" | "URANUS" | "NEPTUNE"
        | "PLUTO" => format!("{upper} BARYCENTER"),
        _ => upper,
    }
}

/// Anything that can place a body relative to the Sun at a UTC instant.
///
/// Positions are in AU, ecliptic and equinox of J2000.
pub trait PositionSource {
    fn heliocentric_position_au(
        &self,
        body: Body,
        epoch: NaiveDateTime,
    ) -> Result<Vector3, EphemerisError>;

    /// Short backend name for logs.
    fn label(&self) -> &'static str;
}

impl<S: PositionSource + ?Sized> PositionSource for Box<S> {
    fn heliocentric_position_au(
        &self,
        body: Body,
        epoch: NaiveDateTime,
    ) -> Result<Vector3, EphemerisError> {
        (**self).heliocentric_position_au(body, epoch)
    }

    fn label(&self) -> &'static str {
        (**self).label()
    }
}

//! Hohmann transfer-time estimate between two coplanar circular orbits.
//!
//! The transfer ellipse touches both orbits, so its semi-major axis is the mean
//! of the two radii and the one-way flight is half its Keplerian period. The
//! estimate ignores eccentricity and inclination of the real orbits.

use std::f64::consts::PI;

use orrery_core::constants::{EARTH_SEMI_MAJOR_AXIS_AU, GM_SUN_AU3_DAY2, MARS_SEMI_MAJOR_AXIS_AU};
use thiserror::Error;

/// Errors raised for non-physical transfer inputs.
#[derive(Debug, Error, PartialEq)]
pub enum TransferError {
    #[error("{which} radius must be positive and finite (got {value} AU)")]
    NonPhysicalRadius { which: &'static str, value: f64 },
}

/// One-way Hohmann transfer estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannEstimate {
    pub origin_radius_au: f64,
    pub destination_radius_au: f64,
    pub transfer_semi_major_axis_au: f64,
    pub duration_days: f64,
}

impl HohmannEstimate {
    /// Split the duration into 30-day months and remaining whole days.
    pub fn months_and_days(&self) -> (u32, u32) {
        let days = self.duration_days.max(0.0);
        let months = (days / 30.0).floor();
        let rem = (days - months * 30.0).floor();
        (months as u32, rem as u32)
    }
}

/// Estimate the Hohmann transfer between circular orbits of radius `r1_au` and `r2_au`.
///
/// The estimate is symmetric: outbound and inbound legs take the same time.
pub fn hohmann(r1_au: f64, r2_au: f64) -> Result<HohmannEstimate, TransferError> {
    check_radius("origin", r1_au)?;
    check_radius("destination", r2_au)?;
    let a_t = 0.5 * (r1_au + r2_au);
    Ok(HohmannEstimate {
        origin_radius_au: r1_au,
        destination_radius_au: r2_au,
        transfer_semi_major_axis_au: a_t,
        duration_days: half_period_days(a_t),
    })
}

/// Estimate using the mean semi-major axes of Earth and Mars.
pub fn earth_to_mars_mean() -> HohmannEstimate {
    let a_t = 0.5 * (EARTH_SEMI_MAJOR_AXIS_AU + MARS_SEMI_MAJOR_AXIS_AU);
    HohmannEstimate {
        origin_radius_au: EARTH_SEMI_MAJOR_AXIS_AU,
        destination_radius_au: MARS_SEMI_MAJOR_AXIS_AU,
        transfer_semi_major_axis_au: a_t,
        duration_days: half_period_days(a_t),
    }
}

/// Half the heliocentric orbital period (days) for semi-major axis `a_au`.
pub fn half_period_days(a_au: f64) -> f64 {
    PI * (a_au.powi(3) / GM_SUN_AU3_DAY2).sqrt()
}

fn check_radius(which: &'static str, value: f64) -> Result<(), TransferError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TransferError::NonPhysicalRadius { which, value })
    }
}

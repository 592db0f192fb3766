//! Core units, constants, and shared primitives for the Orrery workspace.

/// Physical constants. Distances in AU and times in days unless stated otherwise.
pub mod constants {
    /// Kilometres per astronomical unit.
    pub const AU_KM: f64 = 149_597_870.7;
    /// Seconds per Julian day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per Julian century.
    pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;
    /// Heliocentric gravitational parameter (Gaussian constant squared), AU^3/day^2.
    pub const GM_SUN_AU3_DAY2: f64 = 0.000_295_912_208_285_591_1;
    /// Mean semi-major axis of Earth's orbit (AU).
    pub const EARTH_SEMI_MAJOR_AXIS_AU: f64 = 1.0;
    /// Mean semi-major axis of Mars' orbit (AU).
    pub const MARS_SEMI_MAJOR_AXIS_AU: f64 = 1.524;
    /// Finest accepted sampling cadence (days).
    pub const MIN_STEP_DAYS: f64 = 1.0e-3;
    /// Coarsest accepted sampling cadence (days); one sample per year.
    pub const MAX_STEP_DAYS: f64 = 366.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_KM;

    /// Convert kilometres to astronomical units.
    #[inline]
    pub fn km_to_au(v: f64) -> f64 {
        v / AU_KM
    }
}

/// Calendar and epoch arithmetic shared across crates.
pub mod time {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

    use super::constants::{DAYS_PER_JULIAN_CENTURY, SECONDS_PER_DAY};

    /// The J2000.0 epoch, 2000-01-01 12:00:00.
    pub fn j2000() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap_or_default()
    }

    /// Fractional days elapsed since J2000.0. The UTC/TT offset is ignored.
    pub fn days_since_j2000(epoch: NaiveDateTime) -> f64 {
        let delta = epoch - j2000();
        match delta.num_microseconds() {
            Some(us) => us as f64 / 1.0e6 / SECONDS_PER_DAY,
            None => delta.num_seconds() as f64 / SECONDS_PER_DAY,
        }
    }

    /// Julian centuries elapsed since J2000.0.
    pub fn centuries_since_j2000(epoch: NaiveDateTime) -> f64 {
        days_since_j2000(epoch) / DAYS_PER_JULIAN_CENTURY
    }

    /// Midnight at the start of a calendar date.
    #[inline]
    pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    /// Offset an epoch by a fractional number of days, at microsecond resolution.
    ///
    /// `None` when `days` is not finite or the result leaves chrono's calendar.
    pub fn add_days(epoch: NaiveDateTime, days: f64) -> Option<NaiveDateTime> {
        let micros = days * SECONDS_PER_DAY * 1.0e6;
        if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
            return None;
        }
        epoch.checked_add_signed(TimeDelta::microseconds(micros.round() as i64))
    }

}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector; units depend on context (AU for positions here).
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }
}

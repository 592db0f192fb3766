//! Annual Earth–Mars closest-approach search and launch-window sweep.
//!
//! Each year is scanned at a fixed cadence starting at 00:00 UTC on January 1.
//! The running minimum keeps the first sample that reached it, so exact ties
//! resolve to the earliest date.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use orrery_core::constants::{MAX_STEP_DAYS, MIN_STEP_DAYS};
use orrery_core::time::{add_days, start_of_day};
use orrery_core::vector::{Vector3, distance, norm};
use orrery_ephem::{Body, EphemerisError, PositionSource};
use orrery_impulsive::{HohmannEstimate, TransferError, hohmann};
use thiserror::Error;
use tracing::{debug, info};

/// Default spacing between samples (days).
pub const DEFAULT_STEP_DAYS: f64 = 1.0;

/// Errors raised while sweeping years.
#[derive(Debug, Error)]
pub enum ApproachError {
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("sampling step must lie in [0.001, 366] days (got {0})")]
    InvalidStep(f64),
    #[error("year range {start}..={end} is empty")]
    InvalidRange { start: i32, end: i32 },
    #[error("year {0} is outside the supported calendar")]
    InvalidYear(i32),
}

/// Positions of both planets at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub epoch: NaiveDateTime,
    pub earth_au: Vector3,
    pub mars_au: Vector3,
    pub distance_au: f64,
}

/// Minimum Earth–Mars separation found within one calendar year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestApproach {
    pub year: i32,
    pub epoch: NaiveDateTime,
    pub distance_au: f64,
}

impl ClosestApproach {
    pub fn date(&self) -> NaiveDate {
        self.epoch.date()
    }
}

/// A closest approach together with the transfer estimate for that date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchWindow {
    pub approach: ClosestApproach,
    pub earth_radius_au: f64,
    pub mars_radius_au: f64,
    pub transfer: HohmannEstimate,
}

/// Year range and cadence for a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSettings {
    pub start_year: i32,
    pub end_year: i32,
    pub step_days: f64,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            start_year: 2025,
            end_year: 2045,
            step_days: DEFAULT_STEP_DAYS,
        }
    }
}

/// Query both planets at `epoch` and measure their separation.
pub fn sample<S>(source: &S, epoch: NaiveDateTime) -> Result<SamplePoint, ApproachError>
where
    S: PositionSource + ?Sized,
{
    let earth_au = source.heliocentric_position_au(Body::Earth, epoch)?;
    let mars_au = source.heliocentric_position_au(Body::Mars, epoch)?;
    Ok(SamplePoint {
        epoch,
        earth_au,
        mars_au,
        distance_au: distance(&earth_au, &mars_au),
    })
}

/// Sample instants inside `year`, `step_days` apart, starting January 1 00:00.
pub fn sample_epochs(year: i32, step_days: f64) -> Result<Vec<NaiveDateTime>, ApproachError> {
    if !(MIN_STEP_DAYS..=MAX_STEP_DAYS).contains(&step_days) {
        return Err(ApproachError::InvalidStep(step_days));
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(ApproachError::InvalidYear(year))?;
    let start = start_of_day(start);

    let mut epochs = Vec::with_capacity((366.0 / step_days).ceil() as usize);
    let mut k = 0u32;
    while let Some(epoch) = add_days(start, f64::from(k) * step_days) {
        if epoch.year() != year {
            break;
        }
        epochs.push(epoch);
        k += 1;
    }
    Ok(epochs)
}

/// Find the date in `year` minimizing the Earth–Mars distance.
pub fn closest_approach<S>(
    source: &S,
    year: i32,
    step_days: f64,
) -> Result<ClosestApproach, ApproachError>
where
    S: PositionSource + ?Sized,
{
    let epochs = sample_epochs(year, step_days)?;
    let mut best: Option<ClosestApproach> = None;
    for epoch in &epochs {
        let point = sample(source, *epoch)?;
        if best.is_none_or(|b| point.distance_au < b.distance_au) {
            best = Some(ClosestApproach {
                year,
                epoch: point.epoch,
                distance_au: point.distance_au,
            });
        }
    }
    debug!(year, samples = epochs.len(), backend = source.label(), "year scanned");
    // January 1 is always inside the year, so at least one sample exists.
    best.ok_or(ApproachError::InvalidYear(year))
}

/// Attach heliocentric radii and the Hohmann estimate to a closest approach.
pub fn launch_window<S>(
    source: &S,
    approach: ClosestApproach,
) -> Result<LaunchWindow, ApproachError>
where
    S: PositionSource + ?Sized,
{
    let point = sample(source, approach.epoch)?;
    let earth_radius_au = norm(&point.earth_au);
    let mars_radius_au = norm(&point.mars_au);
    let transfer = hohmann(earth_radius_au, mars_radius_au)?;
    Ok(LaunchWindow {
        approach,
        earth_radius_au,
        mars_radius_au,
        transfer,
    })
}

/// Scan every year in the settings' range, oldest first.
pub fn sweep<S>(source: &S, settings: &SweepSettings) -> Result<Vec<LaunchWindow>, ApproachError>
where
    S: PositionSource + ?Sized,
{
    if settings.end_year < settings.start_year {
        return Err(ApproachError::InvalidRange {
            start: settings.start_year,
            end: settings.end_year,
        });
    }
    for year in [settings.start_year, settings.end_year] {
        if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
            return Err(ApproachError::InvalidYear(year));
        }
    }
    let span = i64::from(settings.end_year) - i64::from(settings.start_year) + 1;
    let mut windows = Vec::with_capacity(span.min(256) as usize);
    for year in settings.start_year..=settings.end_year {
        let approach = closest_approach(source, year, settings.step_days)?;
        let window = launch_window(source, approach)?;
        info!(
            year,
            date = %approach.date(),
            distance_au = approach.distance_au,
            transfer_days = window.transfer.duration_days,
            "closest approach"
        );
        windows.push(window);
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    use orrery_core::time::days_since_j2000;

    /// Coplanar circular orbits with both planets aligned at J2000.
    struct CircularOrbits;

    impl PositionSource for CircularOrbits {
        fn heliocentric_position_au(
            &self,
            body: Body,
            epoch: NaiveDateTime,
        ) -> Result<Vector3, EphemerisError> {
            let (radius, period) = match body {
                Body::Earth => (1.0, 365.25),
                Body::Mars => (1.524, 686.98),
                other => return Err(EphemerisError::UnknownBody(other.name().to_string())),
            };
            let angle = TAU * days_since_j2000(epoch) / period;
            Ok([radius * angle.cos(), radius * angle.sin(), 0.0])
        }

        fn label(&self) -> &'static str {
            "circular"
        }
    }

    /// Planets frozen in place, so every sample ties.
    struct Frozen;

    impl PositionSource for Frozen {
        fn heliocentric_position_au(
            &self,
            body: Body,
            _epoch: NaiveDateTime,
        ) -> Result<Vector3, EphemerisError> {
            Ok(match body {
                Body::Mars => [1.5, 0.0, 0.0],
                _ => [1.0, 0.0, 0.0],
            })
        }

        fn label(&self) -> &'static str {
            "frozen"
        }
    }

    #[test]
    fn daily_epochs_cover_exactly_the_year() {
        assert_eq!(sample_epochs(2025, 1.0).unwrap().len(), 365);
        let leap = sample_epochs(2028, 1.0).unwrap();
        assert_eq!(leap.len(), 366);
        assert_eq!(leap[0].to_string(), "2028-01-01 00:00:00");
        assert_eq!(leap[365].date(), NaiveDate::from_ymd_opt(2028, 12, 31).unwrap());
        assert_eq!(sample_epochs(2025, 10.0).unwrap().len(), 37);
    }

    #[test]
    fn rejects_bad_steps_and_ranges() {
        assert!(matches!(sample_epochs(2025, 0.0), Err(ApproachError::InvalidStep(_))));
        assert!(matches!(sample_epochs(2025, f64::NAN), Err(ApproachError::InvalidStep(_))));
        let settings = SweepSettings {
            start_year: 2030,
            end_year: 2029,
            step_days: 1.0,
        };
        assert!(matches!(
            sweep(&CircularOrbits, &settings),
            Err(ApproachError::InvalidRange { .. })
        ));
    }

    #[test]
    fn step_bounds_are_enforced_at_both_ends() {
        assert!(matches!(sample_epochs(2030, 1.0e8), Err(ApproachError::InvalidStep(_))));
        assert!(matches!(sample_epochs(2030, 1.0e-7), Err(ApproachError::InvalidStep(_))));
        assert!(matches!(
            closest_approach(&CircularOrbits, 2030, 1.0e8),
            Err(ApproachError::InvalidStep(_))
        ));

        assert_eq!(sample_epochs(2030, MAX_STEP_DAYS).unwrap().len(), 1);
        assert!(matches!(sample_epochs(2030, 400.0), Err(ApproachError::InvalidStep(_))));
        assert_eq!(sample_epochs(2030, MIN_STEP_DAYS).unwrap().len(), 365_000);
    }

    #[test]
    fn sampling_stops_at_the_calendar_edge() {
        // The second sample would fall past chrono's last representable day.
        let last = NaiveDate::MAX.year();
        let epochs = sample_epochs(last, MAX_STEP_DAYS).unwrap();
        assert_eq!(epochs.len(), 1);
        assert_eq!(epochs[0].year(), last);
    }

    #[test]
    fn extreme_year_ranges_are_rejected_without_overflow() {
        let settings = SweepSettings {
            start_year: i32::MIN,
            end_year: i32::MAX,
            step_days: 1.0,
        };
        assert!(matches!(
            sweep(&CircularOrbits, &settings),
            Err(ApproachError::InvalidYear(i32::MIN))
        ));
    }

    #[test]
    fn minimum_is_not_above_any_sample() {
        for year in [2025, 2026, 2033] {
            let best = closest_approach(&CircularOrbits, year, 1.0).unwrap();
            for epoch in sample_epochs(year, 1.0).unwrap() {
                let point = sample(&CircularOrbits, epoch).unwrap();
                assert!(best.distance_au <= point.distance_au);
            }
            assert!(best.distance_au >= 0.524 - 1e-9);
            assert_eq!(best.year, year);
        }
    }

    #[test]
    fn ties_resolve_to_first_date() {
        let best = closest_approach(&Frozen, 2031, 1.0).unwrap();
        assert_eq!(best.date(), NaiveDate::from_ymd_opt(2031, 1, 1).unwrap());
        assert!((best.distance_au - 0.5).abs() < 1e-12);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let a = closest_approach(&CircularOrbits, 2035, 1.0).unwrap();
        let b = closest_approach(&CircularOrbits, 2035, 1.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sweep_is_ordered_and_uses_radii_for_transfers() {
        let settings = SweepSettings {
            start_year: 2025,
            end_year: 2028,
            step_days: 2.0,
        };
        let windows = sweep(&CircularOrbits, &settings).unwrap();
        let years: Vec<i32> = windows.iter().map(|w| w.approach.year).collect();
        assert_eq!(years, vec![2025, 2026, 2027, 2028]);
        for w in &windows {
            assert!((w.earth_radius_au - 1.0).abs() < 1e-9);
            assert!((w.mars_radius_au - 1.524).abs() < 1e-9);
            assert!((w.transfer.duration_days - 259.0).abs() < 3.0);
        }
    }

    #[test]
    fn ephemeris_errors_propagate() {
        struct Broken;
        impl PositionSource for Broken {
            fn heliocentric_position_au(
                &self,
                _body: Body,
                epoch: NaiveDateTime,
            ) -> Result<Vector3, EphemerisError> {
                Err(EphemerisError::InvalidEpoch {
                    epoch: epoch.to_string(),
                })
            }
            fn label(&self) -> &'static str {
                "broken"
            }
        }
        assert!(matches!(
            closest_approach(&Broken, 2030, 1.0),
            Err(ApproachError::Ephemeris(EphemerisError::InvalidEpoch { .. }))
        ));
    }
}

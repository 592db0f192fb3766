use chrono::NaiveDate;
use orrery::approach::{SweepSettings, closest_approach, sample, sample_epochs, sweep};
use orrery::constants::{EARTH_SEMI_MAJOR_AXIS_AU, MARS_SEMI_MAJOR_AXIS_AU};
use orrery::ephemeris::KeplerianEphemeris;
use orrery::impulsive::{earth_to_mars_mean, half_period_days, hohmann};

fn full_range() -> SweepSettings {
    SweepSettings::default()
}

#[test]
fn every_year_has_a_plausible_minimum() {
    let eph = KeplerianEphemeris::new();
    let windows = sweep(&eph, &full_range()).unwrap();
    assert_eq!(windows.len(), 21);
    for (w, year) in windows.iter().zip(2025..=2045) {
        assert_eq!(w.approach.year, year);
        assert!(
            (0.37..=2.7).contains(&w.approach.distance_au),
            "{year}: {} AU",
            w.approach.distance_au
        );
        assert!((0.98..=1.02).contains(&w.earth_radius_au));
        assert!((1.38..=1.67).contains(&w.mars_radius_au));
    }
}

#[test]
fn reported_minimum_beats_every_sample() {
    let eph = KeplerianEphemeris::new();
    for year in [2026, 2033, 2044] {
        let best = closest_approach(&eph, year, 1.0).unwrap();
        for epoch in sample_epochs(year, 1.0).unwrap() {
            let d = sample(&eph, epoch).unwrap().distance_au;
            assert!(best.distance_au <= d, "{year}: {} > {d} on {epoch}", best.distance_au);
        }
    }
}

#[test]
fn year_2033_is_a_near_minimum_opposition() {
    let eph = KeplerianEphemeris::new();
    let approach = closest_approach(&eph, 2033, 1.0).unwrap();
    assert!(approach.distance_au < 0.5, "got {} AU", approach.distance_au);
    let date = approach.date();
    assert!(
        date >= NaiveDate::from_ymd_opt(2033, 6, 20).unwrap()
            && date <= NaiveDate::from_ymd_opt(2033, 7, 20).unwrap(),
        "2033 minimum fell on {date}"
    );

    let far = closest_approach(&eph, 2026, 1.0).unwrap();
    assert!(far.distance_au > approach.distance_au);
}

#[test]
fn repeated_sweeps_are_identical() {
    let eph = KeplerianEphemeris::new();
    let settings = SweepSettings {
        start_year: 2030,
        end_year: 2033,
        step_days: 1.0,
    };
    let first = sweep(&eph, &settings).unwrap();
    let second = sweep(&eph, &settings).unwrap();
    let key = |ws: &[orrery::approach::LaunchWindow]| {
        ws.iter()
            .map(|w| (w.approach.epoch, w.approach.distance_au))
            .collect::<Vec<_>>()
    };
    assert_eq!(key(&first), key(&second));
}

#[test]
fn mean_orbit_hohmann_is_about_259_days() {
    let est = hohmann(EARTH_SEMI_MAJOR_AXIS_AU, MARS_SEMI_MAJOR_AXIS_AU).unwrap();
    assert!((est.duration_days - 259.0).abs() < 1.0, "{}", est.duration_days);
    assert_eq!(est.months_and_days(), (8, 18));
    assert_eq!(earth_to_mars_mean().duration_days, est.duration_days);
}

#[test]
fn hohmann_is_symmetric_and_scales_with_three_halves_power() {
    let there = hohmann(1.0, 1.524).unwrap();
    let back = hohmann(1.524, 1.0).unwrap();
    assert_eq!(there.duration_days, back.duration_days);

    let base = half_period_days(1.262);
    let doubled = half_period_days(2.0 * 1.262);
    assert!((doubled / base - 2.0_f64.powf(1.5)).abs() < 1e-12);
}

//! Toolkit-independent model of the solar-system orbit animation.
//!
//! Each frame advances simulated time, places every tracked body in the
//! ecliptic plane, compresses its heliocentric distance logarithmically so the
//! inner and outer planets share one view, and appends the result to a
//! fixed-length trail. Front ends only read the model and draw it.

use std::collections::VecDeque;

use chrono::{NaiveDate, NaiveDateTime};
use orrery_config::{AnimationConfig, ConfigError};
use orrery_core::time::{add_days, start_of_day};
use orrery_ephem::{Body, EphemerisError, PositionSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum AnimationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
    #[error("simulated clock left the calendar after {0}")]
    ClockOverflow(NaiveDateTime),
}

/// Map a heliocentric point so its radius becomes `ln(1+r) / ln(1+R) * R`.
///
/// Angles are preserved, the origin stays put, and `R` maps to itself.
pub fn radial_exaggerate(x: f64, y: f64, max_radius: f64) -> (f64, f64) {
    let r = x.hypot(y);
    if r == 0.0 {
        return (0.0, 0.0);
    }
    let r_new = r.ln_1p() / max_radius.ln_1p() * max_radius;
    let theta = y.atan2(x);
    (r_new * theta.cos(), r_new * theta.sin())
}

/// Uniform background stars in the square `[-limit, limit]²`, reproducible per seed.
pub fn star_field(count: usize, limit: f64, seed: u64) -> Vec<[f64; 2]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| [rng.gen_range(-limit..=limit), rng.gen_range(-limit..=limit)])
        .collect()
}

/// A body's marker and recent path, in exaggerated plot coordinates.
#[derive(Debug, Clone)]
pub struct Track {
    pub body: Body,
    pub color: [u8; 3],
    trail: VecDeque<[f64; 2]>,
}

impl Track {
    fn new(body: Body, color: [u8; 3], capacity: usize) -> Self {
        Self {
            body,
            color,
            trail: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Latest position, once at least one frame has been drawn.
    pub fn position(&self) -> Option<[f64; 2]> {
        self.trail.back().copied()
    }

    /// Trail points, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.trail.iter().copied()
    }

    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    fn push(&mut self, point: [f64; 2], limit: usize) {
        self.trail.push_back(point);
        while self.trail.len() > limit {
            self.trail.pop_front();
        }
    }
}

/// Frame-stepping settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSettings {
    pub days_per_frame: f64,
    pub trail_length: usize,
    pub axis_limit_au: f64,
}

/// Animation state: simulated clock, tracks, and the static star field.
#[derive(Debug, Clone)]
pub struct OrbitAnimation {
    epoch: NaiveDateTime,
    settings: AnimationSettings,
    tracks: Vec<Track>,
    stars: Vec<[f64; 2]>,
}

impl OrbitAnimation {
    pub fn new(
        start: NaiveDateTime,
        settings: AnimationSettings,
        bodies: &[(Body, [u8; 3])],
        stars: Vec<[f64; 2]>,
    ) -> Self {
        let tracks = bodies
            .iter()
            .map(|&(body, color)| Track::new(body, color, settings.trail_length))
            .collect();
        Self {
            epoch: start,
            settings,
            tracks,
            stars,
        }
    }

    /// Build from configuration; `today` is used when no start date is configured.
    pub fn from_config(config: &AnimationConfig, today: NaiveDate) -> Result<Self, AnimationError> {
        let start = start_of_day(config.start_date()?.unwrap_or(today));
        let bodies = config
            .bodies
            .iter()
            .map(|style| Ok((style.name.parse::<Body>()?, style.color)))
            .collect::<Result<Vec<_>, EphemerisError>>()?;
        let settings = AnimationSettings {
            days_per_frame: config.days_per_frame,
            trail_length: config.trail_length,
            axis_limit_au: config.axis_limit_au,
        };
        let stars = star_field(config.star_count, config.axis_limit_au, config.star_seed);
        Ok(Self::new(start, settings, &bodies, stars))
    }

    /// Step the clock one frame and place every body at the new epoch.
    pub fn advance<S>(&mut self, source: &S) -> Result<(), AnimationError>
    where
        S: PositionSource + ?Sized,
    {
        let epoch = add_days(self.epoch, self.settings.days_per_frame)
            .ok_or(AnimationError::ClockOverflow(self.epoch))?;
        let limit = self.settings.axis_limit_au;

        let mut points = Vec::with_capacity(self.tracks.len());
        for track in &self.tracks {
            let [x, y, _] = source.heliocentric_position_au(track.body, epoch)?;
            let (px, py) = radial_exaggerate(x, y, limit);
            points.push([px, py]);
        }
        // Commit only once every body resolved, so a failed frame leaves state untouched.
        for (track, point) in self.tracks.iter_mut().zip(points) {
            track.push(point, self.settings.trail_length);
        }
        self.epoch = epoch;
        debug!(%epoch, "frame advanced");
        Ok(())
    }

    pub fn epoch(&self) -> NaiveDateTime {
        self.epoch
    }

    /// `Date: YYYY-MM-DD` caption for the current frame.
    pub fn date_label(&self) -> String {
        format!("Date: {}", self.epoch().format("%Y-%m-%d"))
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn stars(&self) -> &[[f64; 2]] {
        &self.stars
    }

    pub fn axis_limit(&self) -> f64 {
        self.settings.axis_limit_au
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_ephem::KeplerianEphemeris;

    fn animation(trail_length: usize) -> OrbitAnimation {
        let start = start_of_day(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        OrbitAnimation::new(
            start,
            AnimationSettings {
                days_per_frame: 5.0,
                trail_length,
                axis_limit_au: 40.0,
            },
            &[(Body::Earth, [0, 0, 255]), (Body::Neptune, [128, 0, 128])],
            Vec::new(),
        )
    }

    #[test]
    fn exaggeration_keeps_angle_and_endpoints() {
        assert_eq!(radial_exaggerate(0.0, 0.0, 40.0), (0.0, 0.0));
        let (x, y) = radial_exaggerate(40.0, 0.0, 40.0);
        assert!((x - 40.0).abs() < 1e-9 && y.abs() < 1e-9);

        let (x, y) = radial_exaggerate(1.0, 1.0, 40.0);
        assert!((y.atan2(x) - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        let r = x.hypot(y);
        assert!(r > 2.0_f64.sqrt(), "inner orbits are spread out (r = {r})");
    }

    #[test]
    fn exaggeration_is_monotonic() {
        let mut last = 0.0;
        for i in 1..200 {
            let (x, _) = radial_exaggerate(i as f64 * 0.25, 0.0, 40.0);
            assert!(x > last);
            last = x;
        }
    }

    #[test]
    fn star_field_is_reproducible_and_bounded() {
        let a = star_field(500, 40.0, 7);
        let b = star_field(500, 40.0, 7);
        assert_eq!(a, b);
        assert_eq!(a.len(), 500);
        assert!(a.iter().all(|[x, y]| x.abs() <= 40.0 && y.abs() <= 40.0));
        assert_ne!(a, star_field(500, 40.0, 8));
    }

    #[test]
    fn trails_are_capped() {
        let eph = KeplerianEphemeris::new();
        let mut anim = animation(3);
        assert!(anim.tracks()[0].position().is_none());
        for _ in 0..10 {
            anim.advance(&eph).unwrap();
        }
        for track in anim.tracks() {
            assert_eq!(track.trail_len(), 3);
            assert_eq!(track.trail().last(), track.position());
        }
        assert_eq!(anim.date_label(), "Date: 2030-02-20");
    }

    #[test]
    fn earth_plots_inside_neptune() {
        let eph = KeplerianEphemeris::new();
        let mut anim = animation(5);
        anim.advance(&eph).unwrap();
        let [ex, ey] = anim.tracks()[0].position().unwrap();
        let [nx, ny] = anim.tracks()[1].position().unwrap();
        let earth_r = ex.hypot(ey);
        let neptune_r = nx.hypot(ny);
        assert!(earth_r > 5.0 && earth_r < 10.0, "earth_r = {earth_r}");
        assert!(neptune_r > 35.0 && neptune_r < 40.0, "neptune_r = {neptune_r}");
    }

    #[test]
    fn failed_frame_leaves_state_untouched() {
        let eph = KeplerianEphemeris::new();
        let start = start_of_day(NaiveDate::from_ymd_opt(2050, 12, 30).unwrap());
        let mut anim = OrbitAnimation::new(
            start,
            AnimationSettings {
                days_per_frame: 5.0,
                trail_length: 4,
                axis_limit_au: 40.0,
            },
            &[(Body::Mars, [255, 0, 0])],
            Vec::new(),
        );
        assert!(matches!(anim.advance(&eph), Err(AnimationError::Ephemeris(_))));
        assert_eq!(anim.epoch(), start);
        assert_eq!(anim.tracks()[0].trail_len(), 0);
    }

    #[test]
    fn clock_overflow_is_an_error() {
        let start = NaiveDate::MAX.and_hms_opt(0, 0, 0).unwrap();
        let mut anim = OrbitAnimation::new(
            start,
            AnimationSettings {
                days_per_frame: 5.0,
                trail_length: 4,
                axis_limit_au: 40.0,
            },
            &[(Body::Mars, [255, 0, 0])],
            Vec::new(),
        );
        assert!(matches!(
            anim.advance(&KeplerianEphemeris::new()),
            Err(AnimationError::ClockOverflow(at)) if at == start
        ));
        assert_eq!(anim.epoch(), start);
    }

    #[test]
    fn builds_from_default_config() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let anim = OrbitAnimation::from_config(&AnimationConfig::default(), today).unwrap();
        assert_eq!(anim.tracks().len(), 8);
        assert_eq!(anim.stars().len(), 500);
        assert_eq!(anim.epoch(), start_of_day(today));
        assert_eq!(anim.tracks()[3].body, Body::Mars);

        let mut cfg = AnimationConfig::default();
        cfg.bodies[0].name = "vulcan".into();
        assert!(matches!(
            OrbitAnimation::from_config(&cfg, today),
            Err(AnimationError::Ephemeris(EphemerisError::UnknownBody(_)))
        ));
    }
}

//! Offline heliocentric positions from JPL's approximate Keplerian elements.
//!
//! Mean elements at J2000 plus linear rates per Julian century, fitted for
//! 1800–2050 (Standish, "Keplerian Elements for Approximate Positions of the
//! Major Planets"). Positions are in the ecliptic and equinox of J2000, the same
//! frame the SPICE backend queries, and are good to a few thousandths of an AU
//! for the inner planets over the fit interval.

use std::f64::consts::TAU;

use chrono::{Datelike, NaiveDateTime};
use orrery_core::time::centuries_since_j2000;
use orrery_core::vector::Vector3;

use crate::{Body, EphemerisError, PositionSource};

/// First calendar year covered by the element fit.
pub const FIRST_VALID_YEAR: i32 = 1800;
/// Last calendar year covered by the element fit.
pub const LAST_VALID_YEAR: i32 = 2050;

/// Mean orbital elements at J2000 and their rates per Julian century.
///
/// Angles are in degrees; `a` in AU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanElements {
    pub a: f64,
    pub e: f64,
    pub inclination: f64,
    pub mean_longitude: f64,
    pub longitude_of_perihelion: f64,
    pub longitude_of_node: f64,
    pub a_rate: f64,
    pub e_rate: f64,
    pub inclination_rate: f64,
    pub mean_longitude_rate: f64,
    pub longitude_of_perihelion_rate: f64,
    pub longitude_of_node_rate: f64,
}

impl MeanElements {
    /// Element set for `body`. Earth uses the Earth–Moon barycenter fit.
    pub fn for_body(body: Body) -> Self {
        #[rustfmt::skip]
        let row = match body {
            Body::Mercury => [
                0.387_099_27, 0.205_635_93, 7.004_979_02, 252.250_323_50, 77.457_796_28, 48.330_765_93,
                0.000_000_37, 0.000_019_06, -0.005_947_49, 149_472.674_111_75, 0.160_476_89, -0.125_340_81,
            ],
            Body::Venus => [
                0.723_335_66, 0.006_776_72, 3.394_676_05, 181.979_099_50, 131.602_467_18, 76.679_842_55,
                0.000_003_90, -0.000_041_07, -0.000_788_90, 58_517.815_387_29, 0.002_683_29, -0.277_694_18,
            ],
            Body::Earth => [
                1.000_002_61, 0.016_711_23, -0.000_015_31, 100.464_571_66, 102.937_681_93, 0.0,
                0.000_005_62, -0.000_043_92, -0.012_946_68, 35_999.372_449_81, 0.323_273_64, 0.0,
            ],
            Body::Mars => [
                1.523_710_34, 0.093_394_10, 1.849_691_42, -4.553_432_05, -23.943_629_59, 49.559_538_91,
                0.000_018_47, 0.000_078_82, -0.008_131_31, 19_140.302_684_99, 0.444_410_88, -0.292_573_43,
            ],
            Body::Jupiter => [
                5.202_887_00, 0.048_386_24, 1.304_396_95, 34.396_440_51, 14.728_479_83, 100.473_909_09,
                -0.000_116_07, -0.000_132_53, -0.001_837_14, 3_034.746_127_75, 0.212_526_68, 0.204_691_06,
            ],
            Body::Saturn => [
                9.536_675_94, 0.053_861_79, 2.485_991_87, 49.954_244_23, 92.598_878_31, 113.662_424_48,
                -0.001_250_60, -0.000_509_91, 0.001_936_09, 1_222.493_622_01, -0.418_972_16, -0.288_677_94,
            ],
            Body::Uranus => [
                19.189_164_64, 0.047_257_44, 0.772_637_83, 313.238_104_51, 170.954_276_30, 74.016_925_03,
                -0.001_961_76, -0.000_043_97, -0.002_429_39, 428.482_027_85, 0.408_052_81, 0.042_405_89,
            ],
            Body::Neptune => [
                30.069_922_76, 0.008_590_48, 1.770_043_47, -55.120_029_69, 44.964_762_27, 131.784_225_74,
                0.000_262_91, 0.000_051_05, 0.000_353_72, 218.459_453_25, -0.322_414_64, -0.012_627_24,
            ],
        };
        Self {
            a: row[0],
            e: row[1],
            inclination: row[2],
            mean_longitude: row[3],
            longitude_of_perihelion: row[4],
            longitude_of_node: row[5],
            a_rate: row[6],
            e_rate: row[7],
            inclination_rate: row[8],
            mean_longitude_rate: row[9],
            longitude_of_perihelion_rate: row[10],
            longitude_of_node_rate: row[11],
        }
    }

    /// Heliocentric ecliptic J2000 position (AU) at `t` Julian centuries past J2000.
    pub fn position_au(&self, t: f64) -> Vector3 {
        let a = self.a + self.a_rate * t;
        let e = self.e + self.e_rate * t;
        let i = (self.inclination + self.inclination_rate * t).to_radians();
        let l = self.mean_longitude + self.mean_longitude_rate * t;
        let varpi = self.longitude_of_perihelion + self.longitude_of_perihelion_rate * t;
        let node = (self.longitude_of_node + self.longitude_of_node_rate * t).to_radians();

        let omega = varpi.to_radians() - node;
        let mean_anomaly = wrap_pi((l - varpi).to_radians());
        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        let x_orb = a * (ecc_anomaly.cos() - e);
        let y_orb = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

        let (sin_w, cos_w) = omega.sin_cos();
        let (sin_n, cos_n) = node.sin_cos();
        let (sin_i, cos_i) = i.sin_cos();

        [
            (cos_w * cos_n - sin_w * sin_n * cos_i) * x_orb
                + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y_orb,
            (cos_w * sin_n + sin_w * cos_n * cos_i) * x_orb
                + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y_orb,
            (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb,
        ]
    }
}

/// Position source evaluating [`MeanElements`] for each body.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl PositionSource for KeplerianEphemeris {
    fn heliocentric_position_au(
        &self,
        body: Body,
        epoch: NaiveDateTime,
    ) -> Result<Vector3, EphemerisError> {
        let year = epoch.year();
        if !(FIRST_VALID_YEAR..=LAST_VALID_YEAR).contains(&year) {
            return Err(EphemerisError::EpochOutOfRange {
                epoch: epoch.to_string(),
                first_year: FIRST_VALID_YEAR,
                last_year: LAST_VALID_YEAR,
            });
        }
        let t = centuries_since_j2000(epoch);
        Ok(MeanElements::for_body(body).position_au(t))
    }

    fn label(&self) -> &'static str {
        "elements"
    }
}

/// Newton iteration on Kepler's equation `M = E - e sin E`.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

fn wrap_pi(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > std::f64::consts::PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

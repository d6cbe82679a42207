//! Low-precision lunar position and illuminated fraction.
//!
//! Truncated lunar theory from the Astronomical Almanac: about 0.3° in longitude, 0.2° in
//! latitude and 0.003° in horizontal parallax over the present century. The illuminated
//! fraction derived from it is accurate to a few thousandths, well inside the margin of a
//! full-moon cut.
use hifitime::Epoch;

use super::{sun::sun_position, EclipticPosition};
use crate::constants::{EARTH_RADIUS_KM, RADEG};
use crate::time::julian_centuries;

/// Sum of `amplitude · sin(phase0 + rate · t)` terms, angles in degrees.
fn periodic_sin(terms: &[(f64, f64, f64)], t: f64) -> f64 {
    terms
        .iter()
        .map(|(amp, phase0, rate)| amp * ((phase0 + rate * t) * RADEG).sin())
        .sum()
}

fn periodic_cos(terms: &[(f64, f64, f64)], t: f64) -> f64 {
    terms
        .iter()
        .map(|(amp, phase0, rate)| amp * ((phase0 + rate * t) * RADEG).cos())
        .sum()
}

const LONGITUDE_TERMS: [(f64, f64, f64); 6] = [
    (6.29, 135.0, 477_198.87),
    (-1.27, 259.3, -413_335.36),
    (0.66, 235.7, 890_534.22),
    (0.21, 269.9, 954_397.74),
    (-0.19, 357.5, 35_999.05),
    (-0.11, 186.5, 966_404.03),
];

const LATITUDE_TERMS: [(f64, f64, f64); 4] = [
    (5.13, 93.3, 483_202.02),
    (0.28, 228.2, 960_400.89),
    (-0.28, 318.3, 6_003.15),
    (-0.17, 217.6, -407_332.21),
];

const PARALLAX_TERMS: [(f64, f64, f64); 4] = [
    (0.0518, 134.9, 477_198.85),
    (0.0095, 259.2, -413_335.38),
    (0.0078, 235.7, 890_534.23),
    (0.0028, 269.9, 954_397.70),
];

/// Geocentric ecliptic position of the Moon at `epoch`.
pub fn moon_position(epoch: &Epoch) -> EclipticPosition {
    let t = julian_centuries(epoch);

    let longitude = 218.32 + 481_267.881 * t + periodic_sin(&LONGITUDE_TERMS, t);
    let latitude = periodic_sin(&LATITUDE_TERMS, t);
    let parallax = 0.9508 + periodic_cos(&PARALLAX_TERMS, t);

    EclipticPosition {
        longitude: longitude.rem_euclid(360.0),
        latitude,
        distance_km: EARTH_RADIUS_KM / (parallax * RADEG).sin(),
    }
}

/// Fraction of the lunar disk illuminated by the Sun at `epoch`, in `[0, 1]`.
///
/// The phase angle `i` (Sun–Moon–Earth) follows from the geocentric elongation `ψ` and the two
/// distances; the illuminated fraction is `(1 + cos i) / 2`.
pub fn illuminated_fraction(epoch: &Epoch) -> f64 {
    let moon = moon_position(epoch);
    let sun = sun_position(epoch);

    let cos_elongation =
        (moon.latitude * RADEG).cos() * ((moon.longitude - sun.longitude) * RADEG).cos();
    let elongation = cos_elongation.clamp(-1.0, 1.0).acos();

    let phase_angle = (sun.distance_km * elongation.sin())
        .atan2(moon.distance_km - sun.distance_km * elongation.cos());

    ((1.0 + phase_angle.cos()) / 2.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod moon_test {
    use super::*;

    #[test]
    fn test_full_moon() {
        // Full moon: 2023-04-06 04:34 UTC
        let epoch = Epoch::from_gregorian_utc(2023, 4, 6, 4, 34, 0, 0);
        assert!(illuminated_fraction(&epoch) > 0.99);

        let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 4, 6);
        assert!(illuminated_fraction(&epoch) > 0.95);
    }

    #[test]
    fn test_new_moon() {
        // New moon: 2023-04-20 04:12 UTC
        let epoch = Epoch::from_gregorian_utc(2023, 4, 20, 4, 12, 0, 0);
        assert!(illuminated_fraction(&epoch) < 0.01);
    }

    #[test]
    fn test_first_quarter() {
        // First quarter: 2023-04-27 21:20 UTC
        let epoch = Epoch::from_gregorian_utc(2023, 4, 27, 21, 20, 0, 0);
        let k = illuminated_fraction(&epoch);
        assert!((0.45..0.55).contains(&k), "first quarter fraction {k}");
    }

    #[test]
    fn test_distance_range() {
        for day in 1..=28 {
            let epoch = Epoch::from_gregorian_utc_at_midnight(2023, 2, day);
            let d = moon_position(&epoch).distance_km;
            assert!((356_000.0..407_000.0).contains(&d), "lunar distance {d}");
        }
    }
}

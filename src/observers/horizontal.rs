//! Equatorial → horizontal transform.
//!
//! The target direction is built in the hour-angle frame (x toward the meridian, z toward the
//! celestial pole) and rotated about the east-west axis by `φ − 90°`, so that the z component of
//! the rotated vector is the sine of the altitude:
//!
//! ```text
//! sin(alt) = sin φ · sin δ + cos φ · cos δ · cos H
//! ```
//!
//! Atmospheric refraction is ignored; the horizon is the geometric one (altitude 0°).
use std::f64::consts::FRAC_PI_2;

use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};

use super::ObservingSite;
use crate::constants::{Degree, RADEG};
use crate::time::local_sidereal_time;

/// Hour angle of a right ascension at `epoch` for `site`, in degrees within `[-180, 180)`.
pub fn hour_angle(site: &ObservingSite, ra: Degree, epoch: &Epoch) -> Degree {
    let h = local_sidereal_time(epoch, site.longitude()) - ra;
    (h + 180.0).rem_euclid(360.0) - 180.0
}

/// Unit vector of a direction in the hour-angle frame.
fn hour_angle_direction(hour_angle: Degree, dec: Degree) -> Vector3<f64> {
    let (h, d) = (hour_angle * RADEG, dec * RADEG);
    Vector3::new(d.cos() * h.cos(), d.cos() * h.sin(), d.sin())
}

/// Altitude above the geometric horizon, in degrees.
///
/// Arguments
/// ---------
/// * `site`: the observing site (only longitude and latitude are used)
/// * `ra`, `dec`: equatorial coordinates of date, in degrees
/// * `epoch`: the instant (UTC)
///
/// Return
/// ------
/// * altitude in degrees within `[-90, 90]`
pub fn altitude(site: &ObservingSite, ra: Degree, dec: Degree, epoch: &Epoch) -> Degree {
    let direction = hour_angle_direction(hour_angle(site, ra, epoch), dec);

    let to_horizon = Rotation3::from_axis_angle(
        &Vector3::y_axis(),
        site.latitude() * RADEG - FRAC_PI_2,
    );
    let local = to_horizon * direction;

    local.z.clamp(-1.0, 1.0).asin() / RADEG
}

/// Airmass `sec(z)` for a given altitude, `None` when the direction is on or below the horizon.
pub fn airmass_from_altitude(altitude: Degree) -> Option<f64> {
    if altitude <= 0.0 {
        return None;
    }
    Some(1.0 / (altitude * RADEG).sin())
}

/// Airmass of an equatorial position at `epoch` for `site`, `None` below the horizon.
pub fn airmass(site: &ObservingSite, ra: Degree, dec: Degree, epoch: &Epoch) -> Option<f64> {
    airmass_from_altitude(altitude(site, ra, dec, epoch))
}

#[cfg(test)]
mod horizontal_test {
    use super::*;
    use approx::assert_relative_eq;

    fn epoch() -> Epoch {
        Epoch::from_gregorian_utc(2023, 4, 15, 10, 0, 0, 0)
    }

    #[test]
    fn test_transit_at_zenith() {
        let site = ObservingSite::mauna_kea();
        let lst = local_sidereal_time(&epoch(), site.longitude());

        assert_relative_eq!(hour_angle(&site, lst, &epoch()), 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            altitude(&site, lst, site.latitude(), &epoch()),
            90.0,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            airmass(&site, lst, site.latitude(), &epoch()).unwrap(),
            1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_meridian_altitude() {
        // On the meridian, alt = 90° − |φ − δ|
        let site = ObservingSite::mauna_kea();
        let lst = local_sidereal_time(&epoch(), site.longitude());
        let alt = altitude(&site, lst, -10.2974, &epoch());
        assert_relative_eq!(alt, 60.0, epsilon = 1e-6);
        assert_relative_eq!(
            airmass(&site, lst, -10.2974, &epoch()).unwrap(),
            2.0 / 3f64.sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_matches_spherical_formula() {
        let site = ObservingSite::new(-17.8892, 28.7624, 2396.0, "Roque de los Muchachos")
            .unwrap();
        let (ra, dec) = (83.633, 22.0145);
        let h = hour_angle(&site, ra, &epoch()) * RADEG;
        let (phi, d) = (site.latitude() * RADEG, dec * RADEG);
        let expected = (phi.sin() * d.sin() + phi.cos() * d.cos() * h.cos()).asin() / RADEG;

        assert_relative_eq!(altitude(&site, ra, dec, &epoch()), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_never_rises() {
        // δ = −80° never climbs above 90 − (19.7 + 80) ≈ −9.7° at Mauna Kea
        let site = ObservingSite::mauna_kea();
        for hour in 0..24 {
            let t = Epoch::from_gregorian_utc(2023, 4, 15, hour, 0, 0, 0);
            assert!(airmass(&site, 120.0, -80.0, &t).is_none());
        }
    }

    #[test]
    fn test_airmass_from_altitude() {
        assert_eq!(airmass_from_altitude(0.0), None);
        assert_eq!(airmass_from_altitude(-5.0), None);
        assert_relative_eq!(airmass_from_altitude(30.0).unwrap(), 2.0, epsilon = 1e-12);
    }
}

//! # Geometry and lunar collaborators
//!
//! The scheduler needs three numeric answers from the sky and never computes them itself:
//!
//! | Trait | Question |
//! |---|---|
//! | [`SkyGeometry::airmass`] | airmass of a target at an instant from a site, or `None` below the horizon |
//! | [`SkyGeometry::is_night`] | whether the site is in night at an instant |
//! | [`LunarPhase::illumination`] | illuminated fraction of the Moon at an instant |
//!
//! Implementations must be **deterministic**: the same inputs always give bit-identical outputs.
//!
//! [`AnalyticEphemeris`] is the in-process implementation of both traits. It combines the
//! horizontal transform of [`crate::observers::horizontal`] with low-precision solar
//! ([`sun`]) and lunar ([`moon`]) theories, and defines night as the Sun's centre below the
//! geometric horizon.
//!
//! ## Example
//!
//! ```rust
//! use hifitime::Epoch;
//! use obsnight::ephemeris::{AnalyticEphemeris, LunarPhase, SkyGeometry};
//! use obsnight::observers::ObservingSite;
//!
//! let eph = AnalyticEphemeris::default();
//! let site = ObservingSite::mauna_kea();
//! let midnight_hst = Epoch::from_gregorian_utc(2023, 4, 1, 10, 0, 0, 0);
//!
//! assert!(eph.is_night(&site, &midnight_hst));
//! assert!(eph.illumination(&midnight_hst) > 0.5);
//! ```
pub mod moon;
pub mod sun;

use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};

use crate::constants::{Degree, RADEG};
use crate::observers::{horizontal, ObservingSite};
use crate::targets::Target;
use crate::time::julian_centuries;

/// Geometry collaborator of the scheduler.
pub trait SkyGeometry {
    /// Airmass of `target` at `epoch` seen from `site`; `None` when it is below the horizon.
    fn airmass(&self, site: &ObservingSite, target: &Target, epoch: &Epoch) -> Option<f64>;

    /// Whether `site` is in night at `epoch`.
    fn is_night(&self, site: &ObservingSite, epoch: &Epoch) -> bool;
}

/// Lunar collaborator of the scheduler.
pub trait LunarPhase {
    /// Illuminated fraction of the Moon at `epoch`, in `[0, 1]`.
    fn illumination(&self, epoch: &Epoch) -> f64;
}

impl<G: SkyGeometry + ?Sized> SkyGeometry for &G {
    fn airmass(&self, site: &ObservingSite, target: &Target, epoch: &Epoch) -> Option<f64> {
        (**self).airmass(site, target, epoch)
    }

    fn is_night(&self, site: &ObservingSite, epoch: &Epoch) -> bool {
        (**self).is_night(site, epoch)
    }
}

impl<L: LunarPhase + ?Sized> LunarPhase for &L {
    fn illumination(&self, epoch: &Epoch) -> f64 {
        (**self).illumination(epoch)
    }
}

/// Geocentric ecliptic coordinates of date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EclipticPosition {
    /// Ecliptic longitude, degrees within `[0, 360)`.
    pub longitude: Degree,
    /// Ecliptic latitude, degrees.
    pub latitude: Degree,
    /// Geocentric distance, kilometers.
    pub distance_km: f64,
}

impl EclipticPosition {
    /// Rotate into equatorial `(ra, dec)` in degrees, using the mean obliquity at `epoch`.
    pub fn equatorial(&self, epoch: &Epoch) -> (Degree, Degree) {
        let (lon, lat) = (self.longitude * RADEG, self.latitude * RADEG);
        let ecliptic = Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());

        let to_equator =
            Rotation3::from_axis_angle(&Vector3::x_axis(), mean_obliquity(epoch) * RADEG);
        let eq = to_equator * ecliptic;

        let ra = eq.y.atan2(eq.x) / RADEG;
        let dec = eq.z.clamp(-1.0, 1.0).asin() / RADEG;
        (ra.rem_euclid(360.0), dec)
    }
}

/// Mean obliquity of the ecliptic, degrees.
pub fn mean_obliquity(epoch: &Epoch) -> Degree {
    23.439_291 - 0.013_004_2 * julian_centuries(epoch)
}

/// In-process geometry and lunar collaborator.
///
/// `sun_horizon` is the solar altitude (degrees) below which the site counts as in night;
/// `0.0` is geometric sunset, `-18.0` astronomical twilight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyticEphemeris {
    pub sun_horizon: Degree,
}

impl Default for AnalyticEphemeris {
    fn default() -> Self {
        AnalyticEphemeris { sun_horizon: 0.0 }
    }
}

impl AnalyticEphemeris {
    /// Altitude of the Sun's centre above the geometric horizon, degrees.
    pub fn sun_altitude(&self, site: &ObservingSite, epoch: &Epoch) -> Degree {
        let (ra, dec) = sun::sun_position(epoch).equatorial(epoch);
        horizontal::altitude(site, ra, dec, epoch)
    }
}

impl SkyGeometry for AnalyticEphemeris {
    fn airmass(&self, site: &ObservingSite, target: &Target, epoch: &Epoch) -> Option<f64> {
        horizontal::airmass(site, target.ra, target.dec, epoch)
    }

    fn is_night(&self, site: &ObservingSite, epoch: &Epoch) -> bool {
        self.sun_altitude(site, epoch) < self.sun_horizon
    }
}

impl LunarPhase for AnalyticEphemeris {
    fn illumination(&self, epoch: &Epoch) -> f64 {
        moon::illuminated_fraction(epoch)
    }
}

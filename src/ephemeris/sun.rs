//! Low-precision solar position.
//!
//! Astronomical Almanac approximation, good to about 0.01° between 1950 and 2050, which is far
//! below what a day/night decision needs.
use hifitime::Epoch;

use super::EclipticPosition;
use crate::constants::{AU_KM, JD2000, RADEG};

/// Geocentric ecliptic position of the Sun at `epoch`.
pub fn sun_position(epoch: &Epoch) -> EclipticPosition {
    let n = epoch.to_jde_utc_days() - JD2000;

    let mean_longitude = 280.460 + 0.985_647_4 * n;
    let g = (357.528 + 0.985_600_3 * n) * RADEG;

    let longitude = mean_longitude + 1.915 * g.sin() + 0.020 * (2.0 * g).sin();
    let distance_au = 1.000_14 - 0.016_71 * g.cos() - 0.000_14 * (2.0 * g).cos();

    EclipticPosition {
        longitude: longitude.rem_euclid(360.0),
        latitude: 0.0,
        distance_km: distance_au * AU_KM,
    }
}

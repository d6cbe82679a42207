//! # Observing site & horizontal geometry
//!
//! This module holds the fixed observatory description used by the scheduler:
//!
//! - [`ObservingSite`](crate::observers::ObservingSite) stores the **geodetic longitude and latitude**,
//!   the **elevation**, a human-readable **name** and the site's **UTC offset** (used to derive the
//!   local civil hour of a sample instant).
//! - [`horizontal`](crate::observers::horizontal) converts equatorial coordinates (RA, Dec) into
//!   **altitude** and **airmass** at a given instant for a given site.
//!
//! ## Conventions
//!
//! - Longitudes are **east positive**, in degrees (Mauna Kea is `-155.0903`).
//! - Elevations are in **meters** above the reference ellipsoid.
//! - `utc_offset` is in **hours**; `0.0` means the civil clock is UTC.
//!
//! ## Quick start
//!
//! ```rust
//! use obsnight::observers::ObservingSite;
//!
//! let site = ObservingSite::new(-155.0903, 19.7026, 4205.0, "Mauna Kea")?
//!     .with_utc_offset(-10.0)?;
//! assert_eq!(site, ObservingSite::mauna_kea());
//! # Ok::<(), obsnight::obsnight_errors::ObsNightError>(())
//! ```
//!
//! ## Invariants
//!
//! - Every numeric field is wrapped in `NotNan<f64>`: NaN geometry is rejected at construction.
//! - Latitude lies within `[-90, 90]`, longitude within `[-180, 360]`, UTC offset within `[-14, 14]`.
pub mod horizontal;

use ordered_float::NotNan;

use crate::constants::{
    Degree, Hour, Meter, MAUNA_KEA_ELEVATION, MAUNA_KEA_LATITUDE, MAUNA_KEA_LONGITUDE,
    MAUNA_KEA_UTC_OFFSET,
};
use crate::obsnight_errors::ObsNightError;

/// Fixed observatory location.
///
/// Units
/// -----
/// * `longitude`: degrees (east positive).
/// * `latitude`: geodetic degrees.
/// * `elevation`: meters.
/// * `utc_offset`: hours from UTC of the local civil clock.
///
/// See also
/// ------------
/// * [`horizontal::altitude`] – Altitude of an equatorial position above this site's horizon.
/// * [`crate::time::civil_hour`] – Local civil hour from `utc_offset`.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct ObservingSite {
    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: NotNan<f64>,

    /// Geodetic latitude in **degrees**.
    pub latitude: NotNan<f64>,

    /// Height above the reference ellipsoid in **meters**.
    pub elevation: NotNan<f64>,

    /// Human-readable site name.
    pub name: String,

    /// Offset of the local civil clock from UTC, in **hours**.
    pub utc_offset: NotNan<f64>,
}

impl ObservingSite {
    /// Create a site from geodetic coordinates, with a UTC civil clock.
    ///
    /// Arguments
    /// -----------------
    /// * `longitude`: Geodetic longitude in **degrees** (east positive).
    /// * `latitude`: Geodetic latitude in **degrees**.
    /// * `elevation`: Height above the reference ellipsoid in **meters**.
    /// * `name`: Site name.
    ///
    /// Errors
    /// ----------
    /// * [`ObsNightError::InvalidSite`] if a value is NaN or out of range.
    pub fn new(
        longitude: Degree,
        latitude: Degree,
        elevation: Meter,
        name: impl Into<String>,
    ) -> Result<Self, ObsNightError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(ObsNightError::InvalidSite(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !(-180.0..=360.0).contains(&longitude) {
            return Err(ObsNightError::InvalidSite(format!(
                "longitude {longitude} outside [-180, 360]"
            )));
        }

        Ok(ObservingSite {
            longitude: NotNan::new(longitude)?,
            latitude: NotNan::new(latitude)?,
            elevation: NotNan::new(elevation)?,
            name: name.into(),
            utc_offset: NotNan::new(0.0)?,
        })
    }

    /// Return the same site with its civil clock set `utc_offset` hours from UTC.
    pub fn with_utc_offset(mut self, utc_offset: Hour) -> Result<Self, ObsNightError> {
        if !(-14.0..=14.0).contains(&utc_offset) {
            return Err(ObsNightError::InvalidSite(format!(
                "UTC offset {utc_offset} h outside [-14, 14]"
            )));
        }
        self.utc_offset = NotNan::new(utc_offset)?;
        Ok(self)
    }

    /// The reference deployment: Mauna Kea, on Hawaii standard time.
    pub fn mauna_kea() -> Self {
        ObservingSite::new(
            MAUNA_KEA_LONGITUDE,
            MAUNA_KEA_LATITUDE,
            MAUNA_KEA_ELEVATION,
            "Mauna Kea",
        )
        .and_then(|site| site.with_utc_offset(MAUNA_KEA_UTC_OFFSET))
        .expect("Mauna Kea constants are a valid site")
    }

    pub fn longitude(&self) -> Degree {
        self.longitude.into_inner()
    }

    pub fn latitude(&self) -> Degree {
        self.latitude.into_inner()
    }

    pub fn utc_offset(&self) -> Hour {
        self.utc_offset.into_inner()
    }
}

#[cfg(test)]
mod observers_test {
    use super::*;

    #[test]
    fn test_site_constructor() {
        let site = ObservingSite::new(289.25058, -30.2446, 2647., "Rubin Observatory").unwrap();
        assert_eq!(site.longitude(), 289.25058);
        assert_eq!(site.latitude(), -30.2446);
        assert_eq!(site.utc_offset(), 0.0);
        assert_eq!(site.name, "Rubin Observatory");
    }

    #[test]
    fn test_mauna_kea_preset() {
        let site = ObservingSite::mauna_kea();
        assert_eq!(site.longitude(), -155.0903);
        assert_eq!(site.latitude(), 19.7026);
        assert_eq!(site.elevation.into_inner(), 4205.0);
        assert_eq!(site.utc_offset(), -10.0);
    }

    #[test]
    fn test_invalid_sites() {
        assert!(matches!(
            ObservingSite::new(0.0, 91.0, 0.0, "nowhere"),
            Err(ObsNightError::InvalidSite(_))
        ));
        assert!(matches!(
            ObservingSite::new(f64::NAN, 0.0, 0.0, "nowhere"),
            Err(ObsNightError::InvalidSite(_))
        ));
        assert!(matches!(
            ObservingSite::new(0.0, 0.0, f64::NAN, "nowhere"),
            Err(ObsNightError::InvalidSite(_))
        ));

        let site = ObservingSite::new(0.0, 0.0, 0.0, "equator").unwrap();
        assert!(site.with_utc_offset(20.0).is_err());
    }
}

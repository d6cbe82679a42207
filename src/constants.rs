//! # Constants and type definitions for obsnight
//!
//! This module centralizes the **unit conversions**, **reference defaults** and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Angular and temporal conversions (degrees ↔ radians, hours ↔ degrees, days ↔ seconds)
//! - Julian date reference epochs
//! - Default parameters of the exposure-time solver (target S/N, wavelength, iteration bound)
//! - Default parameters of the observability scheduler (hourly sampling, night band, full-moon threshold)
//! - Reference observatory (Mauna Kea) geodetic values, used only as *default configuration*

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Hours of right ascension → degrees
pub const HOUR_TO_DEG: f64 = 15.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of J2000.0 (2000-01-01 12:00:00)
pub const JD2000: f64 = 2_451_545.0;

/// Days in a Julian century
pub const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Earth equatorial radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6_378.137;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU_KM: f64 = 149_597_870.7;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle or time in hours
pub type Hour = f64;
/// Duration in seconds
pub type Second = f64;
/// Wavelength in Ångström
pub type Angstrom = f64;
/// Distance in meters
pub type Meter = f64;

// -------------------------------------------------------------------------------------------------
// Exposure-time solver defaults
// -------------------------------------------------------------------------------------------------

/// Signal-to-noise ratio the solver aims for by default
pub const DEFAULT_TARGET_SN: f64 = 50.0;

/// Reference wavelength at which the S/N is read
pub const DEFAULT_WAVELENGTH: Angstrom = 6000.0;

/// Upper bound on the number of measurement rounds
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// Absolute S/N error accepted as converged
pub const DEFAULT_SN_TOLERANCE: f64 = 0.5;

/// Exposure time of the first measurement round
pub const DEFAULT_INITIAL_EXPOSURE: Second = 100.0;

/// Seeing (arcsec) submitted with every measurement
pub const DEFAULT_SEEING: f64 = 0.7;

/// Slit width (arcsec) submitted with every measurement
pub const DEFAULT_SLIT_WIDTH: f64 = 1.0;

/// Airmass submitted with every measurement
pub const DEFAULT_MEASUREMENT_AIRMASS: f64 = 1.8;

// -------------------------------------------------------------------------------------------------
// Observability scheduler defaults
// -------------------------------------------------------------------------------------------------

/// Illumination fraction above which a night is discarded
pub const FULL_MOON_THRESHOLD: f64 = 0.95;

/// Number of evenly spaced samples per day
pub const DEFAULT_HOURLY_RESOLUTION: u32 = 24;

/// First civil hour of the nighttime band (inclusive)
pub const NIGHT_BAND_START_HOUR: u8 = 17;

/// Last civil hour of the nighttime band (exclusive)
pub const NIGHT_BAND_END_HOUR: u8 = 5;

// -------------------------------------------------------------------------------------------------
// Reference deployment
// -------------------------------------------------------------------------------------------------

/// Mauna Kea geodetic longitude, degrees east
pub const MAUNA_KEA_LONGITUDE: Degree = -155.0903;

/// Mauna Kea geodetic latitude, degrees
pub const MAUNA_KEA_LATITUDE: Degree = 19.7026;

/// Mauna Kea elevation, meters
pub const MAUNA_KEA_ELEVATION: Meter = 4205.0;

/// Hawaii standard time offset from UTC, hours
pub const MAUNA_KEA_UTC_OFFSET: Hour = -10.0;

/// First day of the reference observing window (inclusive)
pub const DEFAULT_WINDOW_START: &str = "2023-04-01";

/// End of the reference observing window (exclusive)
pub const DEFAULT_WINDOW_END: &str = "2023-06-14";

//! # Planner configuration
//!
//! A single TOML document, every section and key optional:
//!
//! ```toml
//! [site]
//! name = "Mauna Kea"
//! longitude = -155.0903
//! latitude = 19.7026
//! elevation = 4205.0
//! utc_offset_hours = -10.0
//!
//! [window]
//! start = "2023-04-01"
//! end = "2023-06-14"
//!
//! [solver]
//! target_sn = 50.0
//! wavelength = 6000.0
//! max_iterations = 10
//! tolerance = 0.5
//! initial_exposure = 100.0
//!
//! [instrument]
//! seeing = 0.7
//! slit_width = 1.0
//! airmass = 1.8
//!
//! [scheduler]
//! hourly_resolution = 24
//! full_moon_threshold = 0.95
//! night_start_hour = 17
//! night_end_hour = 5
//! ```
//!
//! Values are only checked when turned into domain types ([`PlannerConfig::site`],
//! [`PlannerConfig::date_range`], [`PlannerConfig::scheduler_params`]).
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Degree, Hour, Meter, DEFAULT_HOURLY_RESOLUTION, DEFAULT_WINDOW_END, DEFAULT_WINDOW_START,
    FULL_MOON_THRESHOLD, MAUNA_KEA_ELEVATION, MAUNA_KEA_LATITUDE, MAUNA_KEA_LONGITUDE,
    MAUNA_KEA_UTC_OFFSET, NIGHT_BAND_END_HOUR, NIGHT_BAND_START_HOUR,
};
use crate::exposure::solver::SolverParams;
use crate::exposure::InstrumentSetup;
use crate::observers::ObservingSite;
use crate::obsnight_errors::ObsNightError;
use crate::scheduler::{NightBand, SchedulerParams};
use crate::time::DateRange;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub longitude: Degree,
    pub latitude: Degree,
    pub elevation: Meter,
    pub utc_offset_hours: Hour,
}

impl Default for SiteSection {
    fn default() -> Self {
        SiteSection {
            name: "Mauna Kea".to_string(),
            longitude: MAUNA_KEA_LONGITUDE,
            latitude: MAUNA_KEA_LATITUDE,
            elevation: MAUNA_KEA_ELEVATION,
            utc_offset_hours: MAUNA_KEA_UTC_OFFSET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    /// First candidate night, `YYYY-MM-DD`.
    pub start: String,
    /// Exclusive end of the window, `YYYY-MM-DD`.
    pub end: String,
}

impl Default for WindowSection {
    fn default() -> Self {
        WindowSection {
            start: DEFAULT_WINDOW_START.to_string(),
            end: DEFAULT_WINDOW_END.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSection {
    pub hourly_resolution: u32,
    pub full_moon_threshold: f64,
    pub night_start_hour: u8,
    pub night_end_hour: u8,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        SchedulerSection {
            hourly_resolution: DEFAULT_HOURLY_RESOLUTION,
            full_moon_threshold: FULL_MOON_THRESHOLD,
            night_start_hour: NIGHT_BAND_START_HOUR,
            night_end_hour: NIGHT_BAND_END_HOUR,
        }
    }
}

/// Every tunable of a planning run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub site: SiteSection,
    pub window: WindowSection,
    pub solver: SolverParams,
    pub instrument: InstrumentSetup,
    pub scheduler: SchedulerSection,
}

impl PlannerConfig {
    /// Errors
    /// ------
    /// * [`ObsNightError::ConfigParse`] on malformed TOML or mistyped values
    pub fn from_toml_str(content: &str) -> Result<Self, ObsNightError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file.
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::IoError`] if the file cannot be read
    /// * [`ObsNightError::ConfigParse`] if its content is not a valid configuration
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ObsNightError> {
        let content = std::fs::read_to_string(path)?;
        PlannerConfig::from_toml_str(&content)
    }

    pub fn site(&self) -> Result<ObservingSite, ObsNightError> {
        ObservingSite::new(
            self.site.longitude,
            self.site.latitude,
            self.site.elevation,
            self.site.name.clone(),
        )?
        .with_utc_offset(self.site.utc_offset_hours)
    }

    pub fn date_range(&self) -> Result<DateRange, ObsNightError> {
        DateRange::from_calendar_dates(&self.window.start, &self.window.end)
    }

    pub fn scheduler_params(&self) -> Result<SchedulerParams, ObsNightError> {
        let params = SchedulerParams {
            hourly_resolution: self.scheduler.hourly_resolution,
            full_moon_threshold: self.scheduler.full_moon_threshold,
            night_band: NightBand {
                start_hour: self.scheduler.night_start_hour,
                end_hour: self.scheduler.night_end_hour,
            },
        };
        params.validate()?;
        Ok(params)
    }
}

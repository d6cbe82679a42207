//! # Calendar windows and sidereal time
//!
//! Time handling for the scheduler, built on [`hifitime::Epoch`]:
//!
//! - [`DateRange`]: a half-open `[start, end)` window discretized into whole days,
//! - [`DateRange::sample_instant`]: the `k`-th evenly spaced sample of day `j`,
//! - [`civil_hour`]: the local civil hour at a site given its UTC offset,
//! - [`gmst`] / [`local_sidereal_time`]: mean sidereal time used by the horizontal
//!   coordinate transform.
//!
//! UT1 is approximated by UTC everywhere; the sub-second difference is irrelevant at the
//! hourly sampling the scheduler uses.
use std::sync::LazyLock;

use hifitime::{Epoch, Unit};
use regex::Regex;

use crate::constants::{Degree, Hour, DAYS_PER_JULIAN_CENTURY, JD2000, SECONDS_PER_DAY};
use crate::obsnight_errors::ObsNightError;

static CALENDAR_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?\s*$")
        .expect("calendar date pattern is valid")
});

/// Parse a calendar date `YYYY-MM-DD`, optionally followed by `THH:MM[:SS]`, as a UTC epoch.
///
/// Arguments
/// ---------
/// * `date`: the date string, e.g. `"2023-04-01"` or `"2023-04-01T06:00:00"`
///
/// Return
/// ------
/// * the corresponding UTC [`Epoch`], or [`ObsNightError::InvalidDate`]
pub fn parse_calendar_date(date: &str) -> Result<Epoch, ObsNightError> {
    let invalid = || ObsNightError::InvalidDate(date.to_string());
    let caps = CALENDAR_DATE.captures(date).ok_or_else(invalid)?;

    let field = |idx: usize| -> Result<u32, ObsNightError> {
        caps.get(idx)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
    };

    let year = caps[1].parse::<i32>().map_err(|_| invalid())?;
    let (month, day) = (field(2)?, field(3)?);
    let (hour, minute, second) = (field(4)?, field(5)?, field(6)?);

    if !(1..=12).contains(&month)
        || !(1..=31).contains(&day)
        || hour > 23
        || minute > 59
        || second > 59
    {
        return Err(invalid());
    }

    // Day-of-month against the actual month length, leap years included
    Epoch::maybe_from_gregorian_utc(
        year,
        month as u8,
        day as u8,
        hour as u8,
        minute as u8,
        second as u8,
        0,
    )
    .map_err(|_| invalid())
}

/// Format an epoch as its UTC calendar date `YYYY-MM-DD`.
pub fn format_calendar_date(epoch: &Epoch) -> String {
    let (y, m, d, _, _, _, _) = epoch.to_gregorian_utc();
    format!("{y:04}-{m:02}-{d:02}")
}

/// Local civil hour (0..=23) of `epoch` at a site whose clock runs `utc_offset` hours from UTC.
///
/// With `utc_offset = 0.0` this is the UTC hour.
pub fn civil_hour(epoch: &Epoch, utc_offset: Hour) -> u8 {
    let local = *epoch + Unit::Hour * utc_offset;
    local.to_gregorian_utc().3
}

/// Julian centuries elapsed since J2000.0 at `epoch` (UTC Julian date).
pub fn julian_centuries(epoch: &Epoch) -> f64 {
    (epoch.to_jde_utc_days() - JD2000) / DAYS_PER_JULIAN_CENTURY
}

/// Greenwich Mean Sidereal Time, in degrees within `[0, 360)`.
///
/// Uses the IAU 1982 expression in terms of days since J2000.0 (Meeus, eq. 12.4),
/// evaluated directly at the instant so no separate 0h term is needed.
pub fn gmst(epoch: &Epoch) -> Degree {
    let d = epoch.to_jde_utc_days() - JD2000;
    let t = d / DAYS_PER_JULIAN_CENTURY;

    let theta = 280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
        - t * t * t / 38_710_000.0;

    theta.rem_euclid(360.0)
}

/// Local Mean Sidereal Time at east `longitude`, in degrees within `[0, 360)`.
pub fn local_sidereal_time(epoch: &Epoch, longitude: Degree) -> Degree {
    (gmst(epoch) + longitude).rem_euclid(360.0)
}

/// A half-open observing window `[start, end)` discretized into whole calendar days.
///
/// Day `j` starts at `start + j days`. The number of days is the whole part of
/// `end - start` expressed in days; a trailing partial day is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    start: Epoch,
    end: Epoch,
    n_days: usize,
}

impl DateRange {
    /// Build a window from two epochs.
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidDateRange`] if `end <= start` or the window holds less
    ///   than one whole day.
    pub fn new(start: Epoch, end: Epoch) -> Result<Self, ObsNightError> {
        if end <= start {
            return Err(ObsNightError::InvalidDateRange(format!(
                "end {} is not after start {}",
                format_calendar_date(&end),
                format_calendar_date(&start)
            )));
        }

        let span_days = (end - start).to_unit(Unit::Day);
        let n_days = span_days.trunc() as usize;
        if n_days < 1 {
            return Err(ObsNightError::InvalidDateRange(format!(
                "window of {span_days:.3} days holds no whole day"
            )));
        }

        Ok(DateRange {
            start,
            end,
            n_days,
        })
    }

    /// Build a window from two calendar dates (`YYYY-MM-DD`, UTC midnight).
    pub fn from_calendar_dates(start: &str, end: &str) -> Result<Self, ObsNightError> {
        DateRange::new(parse_calendar_date(start)?, parse_calendar_date(end)?)
    }

    pub fn start(&self) -> Epoch {
        self.start
    }

    pub fn end(&self) -> Epoch {
        self.end
    }

    pub fn n_days(&self) -> usize {
        self.n_days
    }

    /// Start instant of day `day`.
    pub fn day_start(&self, day: usize) -> Epoch {
        self.start + Unit::Day * day as f64
    }

    /// The `sample`-th of `resolution` evenly spaced instants within day `day`.
    ///
    /// Sample 0 is the day start; with `resolution = 24` consecutive samples are one hour apart.
    pub fn sample_instant(&self, day: usize, sample: u32, resolution: u32) -> Epoch {
        let step = SECONDS_PER_DAY / resolution as f64;
        self.day_start(day) + Unit::Second * (sample as f64 * step)
    }

    /// Iterate over the start instants of every day in the window.
    pub fn days(&self) -> impl Iterator<Item = Epoch> + '_ {
        (0..self.n_days).map(move |day| self.day_start(day))
    }
}

//! # Observability scheduler
//!
//! Picks the single night of a date window on which a set of targets is, on average, best
//! placed in the sky, while avoiding nights near full moon.
//!
//! ## Sweep
//!
//! For every day `j` of the window and every sample `k` of `hourly_resolution` evenly spaced
//! instants of that day, a sample is **valid** when its local civil hour falls in the
//! [`NightBand`] *or* the [`SkyGeometry`] reports astronomical night at the site. For every
//! target and every valid sample where the target is above the horizon, the airmass is folded
//! into the [`AirmassGrid`] cell `(target, j)`, which only ever decreases from `+∞`.
//!
//! ## Aggregation and selection
//!
//! * The night aggregate is the arithmetic mean of the grid column over all targets, so a single
//!   unobservable target makes the whole night `+∞`.
//! * Nights whose lunar illumination (sampled at the day's start) is strictly above the
//!   full-moon threshold are forced to `+∞`.
//! * The best night is the first day reaching the minimum aggregate; ties go to the earliest.
//!   When every aggregate is `+∞` the sweep fails with [`ObsNightError::NoObservableNight`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use obsnight::observers::ObservingSite;
//! use obsnight::scheduler::select_best_night;
//! use obsnight::targets::Target;
//! use obsnight::time::{format_calendar_date, DateRange};
//!
//! let site = ObservingSite::mauna_kea();
//! let range = DateRange::from_calendar_dates("2023-04-01", "2023-06-14").unwrap();
//! let targets = vec![Target::new("M87", 187.7059, 12.3911, Some(8.6))];
//!
//! let best = select_best_night(&targets, &site, &range, 24).unwrap();
//! println!("{}", format_calendar_date(&best));
//! ```
pub mod airmass_grid;
pub mod moon_series;
pub mod night_band;

use hifitime::Epoch;
use itertools::iproduct;
use tracing::{debug, info, warn};

pub use airmass_grid::AirmassGrid;
pub use moon_series::MoonPhaseSeries;
pub use night_band::NightBand;

use crate::constants::{DEFAULT_HOURLY_RESOLUTION, FULL_MOON_THRESHOLD};
use crate::ephemeris::{AnalyticEphemeris, LunarPhase, SkyGeometry};
use crate::observers::ObservingSite;
use crate::obsnight_errors::ObsNightError;
use crate::targets::Target;
use crate::time::{civil_hour, format_calendar_date, DateRange};

/// Sampling and exclusion parameters of the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerParams {
    /// Samples per day; 24 means one per hour.
    pub hourly_resolution: u32,
    /// Illuminated fraction above which a night is discarded.
    pub full_moon_threshold: f64,
    pub night_band: NightBand,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        SchedulerParams {
            hourly_resolution: DEFAULT_HOURLY_RESOLUTION,
            full_moon_threshold: FULL_MOON_THRESHOLD,
            night_band: NightBand::default(),
        }
    }
}

impl SchedulerParams {
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidParameter`] for a zero resolution, a NaN threshold or a band
    ///   hour outside `0..24`
    pub fn validate(&self) -> Result<(), ObsNightError> {
        if self.hourly_resolution == 0 {
            return Err(ObsNightError::InvalidParameter(
                "hourly_resolution must be at least 1".to_string(),
            ));
        }
        if self.full_moon_threshold.is_nan() {
            return Err(ObsNightError::InvalidParameter(
                "full_moon_threshold is NaN".to_string(),
            ));
        }
        if self.night_band.start_hour > 23 || self.night_band.end_hour > 24 {
            return Err(ObsNightError::InvalidParameter(format!(
                "night band [{}, {}) is not a civil hour range",
                self.night_band.start_hour, self.night_band.end_hour
            )));
        }
        Ok(())
    }
}

/// Full outcome of a sweep: the grid, the lunar series, the per-night aggregate and the pick.
#[derive(Debug, Clone, PartialEq)]
pub struct NightSchedule {
    pub range: DateRange,
    pub grid: AirmassGrid,
    pub moon_phases: MoonPhaseSeries,
    /// Mean best airmass per night, `+∞` for unobservable or moon-excluded nights.
    pub aggregate: Vec<f64>,
    pub best_day: usize,
    pub best_date: Epoch,
}

impl NightSchedule {
    pub fn best_aggregate(&self) -> f64 {
        self.aggregate[self.best_day]
    }

    pub fn excluded_days(&self) -> Vec<usize> {
        self.moon_phases.excluded_days()
    }

    /// Best airmass of each target on the selected night, in target order.
    pub fn best_night_airmasses(&self) -> Vec<f64> {
        self.grid.day_column(self.best_day).collect()
    }
}

/// Index of the first strict minimum among finite values, `None` if every value is `+∞`.
fn first_finite_minimum(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (day, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((day, value)),
        }
    }
    best.map(|(day, _)| day)
}

/// Night selector over a sky-geometry and a lunar collaborator.
#[derive(Debug, Clone)]
pub struct ObservabilityScheduler<G, L> {
    geometry: G,
    lunar: L,
    params: SchedulerParams,
}

impl ObservabilityScheduler<AnalyticEphemeris, AnalyticEphemeris> {
    /// Scheduler backed by the in-process analytic ephemeris for both collaborators.
    pub fn analytic(params: SchedulerParams) -> Result<Self, ObsNightError> {
        ObservabilityScheduler::new(
            AnalyticEphemeris::default(),
            AnalyticEphemeris::default(),
            params,
        )
    }
}

impl<G: SkyGeometry, L: LunarPhase> ObservabilityScheduler<G, L> {
    /// Arguments
    /// ---------
    /// * `geometry`: airmass and night-state source
    /// * `lunar`: illuminated-fraction source
    /// * `params`: sampling, threshold and band
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidParameter`] if `params` fails [`SchedulerParams::validate`]
    pub fn new(geometry: G, lunar: L, params: SchedulerParams) -> Result<Self, ObsNightError> {
        params.validate()?;
        Ok(ObservabilityScheduler {
            geometry,
            lunar,
            params,
        })
    }

    pub fn params(&self) -> &SchedulerParams {
        &self.params
    }

    /// Valid sample instants of every day, computed once and shared by all targets.
    fn valid_instants(&self, site: &ObservingSite, range: &DateRange) -> Vec<Vec<Epoch>> {
        let resolution = self.params.hourly_resolution;
        (0..range.n_days())
            .map(|day| {
                (0..resolution)
                    .map(|k| range.sample_instant(day, k, resolution))
                    .filter(|epoch| {
                        self.params
                            .night_band
                            .contains(civil_hour(epoch, site.utc_offset()))
                            || self.geometry.is_night(site, epoch)
                    })
                    .collect()
            })
            .collect()
    }

    /// Fill the minimum-airmass grid over the whole window.
    pub fn airmass_grid(
        &self,
        targets: &[Target],
        site: &ObservingSite,
        range: &DateRange,
    ) -> AirmassGrid {
        let valid = self.valid_instants(site, range);
        let mut grid = AirmassGrid::new(targets.len(), range.n_days());

        for ((t, target), day) in iproduct!(targets.iter().enumerate(), 0..range.n_days()) {
            for epoch in &valid[day] {
                if let Some(airmass) = self.geometry.airmass(site, target, epoch) {
                    grid.fold(t, day, airmass);
                }
            }
        }
        grid
    }

    /// Run the sweep and select the best night.
    ///
    /// Arguments
    /// ---------
    /// * `targets`: the resolved targets, at least one
    /// * `site`: observer location and civil time offset
    /// * `range`: the candidate nights
    ///
    /// Return
    /// ------
    /// * The complete [`NightSchedule`], whose `best_date` is the start instant of the chosen day
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidParameter`] for an empty target list
    /// * [`ObsNightError::NoObservableNight`] if no night has a finite aggregate
    pub fn schedule(
        &self,
        targets: &[Target],
        site: &ObservingSite,
        range: &DateRange,
    ) -> Result<NightSchedule, ObsNightError> {
        if targets.is_empty() {
            return Err(ObsNightError::InvalidParameter(
                "at least one target is required to schedule a night".to_string(),
            ));
        }

        let grid = self.airmass_grid(targets, site, range);
        let moon_phases =
            MoonPhaseSeries::compute(range, &self.lunar, self.params.full_moon_threshold);

        let aggregate: Vec<f64> = (0..range.n_days())
            .map(|day| {
                let value = if moon_phases.is_excluded(day) {
                    f64::INFINITY
                } else {
                    grid.mean_for_day(day)
                };
                debug!(
                    day,
                    illumination = moon_phases.fraction(day),
                    mean_airmass = value,
                    "night aggregated"
                );
                value
            })
            .collect();

        let excluded = moon_phases.excluded_days();
        if !excluded.is_empty() {
            warn!(
                count = excluded.len(),
                threshold = self.params.full_moon_threshold,
                "nights excluded by full moon"
            );
        }

        let Some(best_day) = first_finite_minimum(&aggregate) else {
            warn!(
                n_targets = targets.len(),
                n_days = range.n_days(),
                "no observable night in window"
            );
            return Err(ObsNightError::NoObservableNight {
                start: format_calendar_date(&range.start()),
                end: format_calendar_date(&range.end()),
            });
        };

        let best_date = range.day_start(best_day);
        info!(
            best_day,
            date = %format_calendar_date(&best_date),
            mean_airmass = aggregate[best_day],
            "best night selected"
        );

        Ok(NightSchedule {
            range: *range,
            grid,
            moon_phases,
            aggregate,
            best_day,
            best_date,
        })
    }
}

/// Best night of `range` for `targets` at `site`, using the analytic ephemeris and the default
/// threshold and band.
///
/// See also
/// --------
/// * [`ObservabilityScheduler::schedule`] for the full schedule and custom collaborators
pub fn select_best_night(
    targets: &[Target],
    site: &ObservingSite,
    range: &DateRange,
    hourly_resolution: u32,
) -> Result<Epoch, ObsNightError> {
    let params = SchedulerParams {
        hourly_resolution,
        ..SchedulerParams::default()
    };
    ObservabilityScheduler::analytic(params)?
        .schedule(targets, site, range)
        .map(|schedule| schedule.best_date)
}

#[cfg(test)]
mod scheduler_test {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    /// Airmass keyed by (target name, day index); `None` entries are below the horizon.
    struct TableGeometry {
        start: Epoch,
        airmass: HashMap<(String, usize), Option<f64>>,
        night: bool,
    }

    impl SkyGeometry for TableGeometry {
        fn airmass(&self, _site: &ObservingSite, target: &Target, epoch: &Epoch) -> Option<f64> {
            let day = (*epoch - self.start).to_unit(hifitime::Unit::Day).floor() as usize;
            self.airmass
                .get(&(target.name.clone(), day))
                .copied()
                .flatten()
        }

        fn is_night(&self, _site: &ObservingSite, _epoch: &Epoch) -> bool {
            self.night
        }
    }

    struct FixedMoon(Vec<f64>, Epoch);

    impl LunarPhase for FixedMoon {
        fn illumination(&self, epoch: &Epoch) -> f64 {
            let day = (*epoch - self.1).to_unit(hifitime::Unit::Day).round() as usize;
            self.0[day]
        }
    }

    fn site() -> ObservingSite {
        ObservingSite::new(0.0, 0.0, 0.0, "test").unwrap()
    }

    fn range(n_days: usize) -> DateRange {
        let start = Epoch::from_gregorian_utc_at_midnight(2023, 4, 1);
        DateRange::new(start, start + hifitime::Unit::Day * n_days as f64).unwrap()
    }

    fn targets(names: &[&str]) -> Vec<Target> {
        names
            .iter()
            .map(|n| Target::new(*n, 0.0, 0.0, None))
            .collect()
    }

    fn geometry(entries: &[(&str, usize, Option<f64>)]) -> TableGeometry {
        TableGeometry {
            start: Epoch::from_gregorian_utc_at_midnight(2023, 4, 1),
            airmass: entries
                .iter()
                .map(|(n, d, a)| ((n.to_string(), *d), *a))
                .collect(),
            night: false,
        }
    }

    fn scheduler(
        geo: TableGeometry,
        moon: Vec<f64>,
    ) -> ObservabilityScheduler<TableGeometry, FixedMoon> {
        let start = geo.start;
        ObservabilityScheduler::new(geo, FixedMoon(moon, start), SchedulerParams::default())
            .unwrap()
    }

    #[test]
    fn test_selects_lowest_mean() {
        let geo = geometry(&[
            ("A", 0, Some(1.5)),
            ("A", 1, Some(1.1)),
            ("A", 2, Some(1.3)),
            ("B", 0, Some(1.5)),
            ("B", 1, Some(1.3)),
            ("B", 2, Some(1.0)),
        ]);
        let schedule = scheduler(geo, vec![0.1, 0.2, 0.3])
            .schedule(&targets(&["A", "B"]), &site(), &range(3))
            .unwrap();

        for (value, expected) in schedule.aggregate.iter().zip([1.5, 1.2, 1.15]) {
            assert_relative_eq!(*value, expected, max_relative = 1e-12);
        }
        assert_eq!(schedule.best_day, 2);
        assert_eq!(schedule.best_date, range(3).day_start(2));
        assert_eq!(schedule.best_night_airmasses(), vec![1.3, 1.0]);
    }

    #[test]
    fn test_full_moon_night_is_skipped() {
        let geo = geometry(&[("A", 0, Some(1.0)), ("A", 1, Some(1.4))]);
        let schedule = scheduler(geo, vec![0.98, 0.5])
            .schedule(&targets(&["A"]), &site(), &range(2))
            .unwrap();

        assert_eq!(schedule.aggregate[0], f64::INFINITY);
        assert_eq!(schedule.best_day, 1);
        assert_eq!(schedule.excluded_days(), vec![0]);
    }

    #[test]
    fn test_ties_go_to_earliest_night() {
        let geo = geometry(&[
            ("A", 0, Some(1.4)),
            ("A", 1, Some(1.2)),
            ("A", 2, Some(1.2)),
        ]);
        let schedule = scheduler(geo, vec![0.0; 3])
            .schedule(&targets(&["A"]), &site(), &range(3))
            .unwrap();
        assert_eq!(schedule.best_day, 1);
    }

    #[test]
    fn test_one_unobservable_target_poisons_the_night() {
        let geo = geometry(&[
            ("A", 0, Some(1.0)),
            ("B", 0, None),
            ("A", 1, Some(2.0)),
            ("B", 1, Some(2.0)),
        ]);
        let schedule = scheduler(geo, vec![0.0; 2])
            .schedule(&targets(&["A", "B"]), &site(), &range(2))
            .unwrap();
        assert_eq!(schedule.aggregate[0], f64::INFINITY);
        assert_eq!(schedule.best_day, 1);
    }

    #[test]
    fn test_target_never_above_horizon() {
        // Three days, the only target below the horizon at every sample
        let geo = geometry(&[("A", 0, None), ("A", 1, None), ("A", 2, None)]);
        let err = scheduler(geo, vec![0.0; 3])
            .schedule(&targets(&["A"]), &site(), &range(3))
            .unwrap_err();

        assert_eq!(
            err,
            ObsNightError::NoObservableNight {
                start: "2023-04-01".to_string(),
                end: "2023-04-04".to_string(),
            }
        );
    }

    #[test]
    fn test_every_night_moon_excluded() {
        let geo = geometry(&[("A", 0, Some(1.0)), ("A", 1, Some(1.0))]);
        let err = scheduler(geo, vec![0.99, 1.0])
            .schedule(&targets(&["A"]), &site(), &range(2))
            .unwrap_err();
        assert!(matches!(err, ObsNightError::NoObservableNight { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let sched = scheduler(geometry(&[]), vec![0.0]);
        assert!(matches!(
            sched.schedule(&[], &site(), &range(1)),
            Err(ObsNightError::InvalidParameter(_))
        ));

        let params = SchedulerParams {
            hourly_resolution: 0,
            ..SchedulerParams::default()
        };
        assert!(ObservabilityScheduler::analytic(params).is_err());
    }

    #[test]
    fn test_valid_samples_follow_band_or_night() {
        let sched = scheduler(geometry(&[]), vec![0.0]);
        let valid = sched.valid_instants(&site(), &range(1));
        // Offset 0: hours 0-4 and 17-23 are in the band
        assert_eq!(valid[0].len(), 12);

        let mut geo = geometry(&[]);
        geo.night = true;
        let sched = scheduler(geo, vec![0.0]);
        assert_eq!(sched.valid_instants(&site(), &range(1))[0].len(), 24);
    }

    #[test]
    fn test_band_admits_daylight_on_a_utc_clock() {
        // Mauna Kea coordinates on a UTC clock: 20:00 UTC is 10:00 local, in daylight, yet
        // inside the civil band, so the permissive OR keeps the sample
        let site = ObservingSite::new(-155.0903, 19.7026, 4205.0, "Mauna Kea UTC").unwrap();
        let sched = ObservabilityScheduler::analytic(SchedulerParams::default()).unwrap();
        let day = range(1);
        let late_morning = day.sample_instant(0, 20, 24);

        assert!(!AnalyticEphemeris::default().is_night(&site, &late_morning));
        assert!(sched.valid_instants(&site, &day)[0].contains(&late_morning));
    }

    #[test]
    fn test_first_finite_minimum() {
        let inf = f64::INFINITY;
        assert_eq!(first_finite_minimum(&[inf, 2.0, 1.0, 1.0]), Some(2));
        assert_eq!(first_finite_minimum(&[inf, inf]), None);
        assert_eq!(first_finite_minimum(&[]), None);
    }
}

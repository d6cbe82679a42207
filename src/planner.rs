//! # Night planner
//!
//! End-to-end orchestration of one planning run:
//!
//! 1. resolve every target name through a [`TargetResolver`] (a target without coordinates
//!    aborts the run),
//! 2. solve the exposure time of every target with a magnitude through an [`SnMeasurement`],
//! 3. pick the best night for the whole set with the [`ObservabilityScheduler`].
//!
//! A target without a magnitude is still scheduled; only its exposure solve is skipped. What a
//! fatal solve error does to the run is set by [`MeasurementPolicy`]. The planner performs no
//! I/O and prints nothing: the [`PlanReport`] holds everything a caller needs to report, and
//! [`PlanReport::chart_request`] prepares the finder-chart request for the chosen night.
use hifitime::Epoch;
use tracing::{info, warn};

use crate::chart::ChartRequest;
use crate::config::PlannerConfig;
use crate::ephemeris::{LunarPhase, SkyGeometry};
use crate::exposure::solver::{ExposureSolution, ExposureSolver};
use crate::exposure::SnMeasurement;
use crate::observers::ObservingSite;
use crate::obsnight_errors::ObsNightError;
use crate::scheduler::{NightSchedule, ObservabilityScheduler, SchedulerParams};
use crate::targets::{resolve_targets, Target, TargetResolver};
use crate::time::DateRange;

/// Effect of a fatal exposure-solve error on the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementPolicy {
    /// Propagate the error and stop planning.
    Abort,
    /// Record the failure on the target and continue.
    #[default]
    SkipTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExposureOutcome {
    Solved(ExposureSolution),
    /// Exposure not solved, with the reason.
    Skipped(String),
}

impl ExposureOutcome {
    pub fn solution(&self) -> Option<&ExposureSolution> {
        match self {
            ExposureOutcome::Solved(solution) => Some(solution),
            ExposureOutcome::Skipped(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetReport {
    pub target: Target,
    pub exposure: ExposureOutcome,
}

/// Result of [`Planner::plan`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlanReport {
    pub site: ObservingSite,
    pub targets: Vec<TargetReport>,
    pub schedule: NightSchedule,
}

impl PlanReport {
    pub fn best_date(&self) -> Epoch {
        self.schedule.best_date
    }

    /// Finder-chart request listing every target for the chosen night.
    pub fn chart_request(&self) -> ChartRequest {
        let targets: Vec<Target> = self.targets.iter().map(|r| r.target.clone()).collect();
        ChartRequest::new(self.schedule.best_date, &self.site, &targets)
    }
}

/// Validated planning setup built from a [`PlannerConfig`].
#[derive(Debug, Clone)]
pub struct Planner {
    site: ObservingSite,
    range: DateRange,
    solver: ExposureSolver,
    scheduler_params: SchedulerParams,
    policy: MeasurementPolicy,
}

impl Planner {
    /// Validate `config` into a planner with the default [`MeasurementPolicy::SkipTarget`].
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidSite`], [`ObsNightError::InvalidDate`],
    ///   [`ObsNightError::InvalidDateRange`] or [`ObsNightError::InvalidParameter`] for the first
    ///   invalid section
    pub fn new(config: &PlannerConfig) -> Result<Self, ObsNightError> {
        Ok(Planner {
            site: config.site()?,
            range: config.date_range()?,
            solver: ExposureSolver::new(config.solver, config.instrument)?,
            scheduler_params: config.scheduler_params()?,
            policy: MeasurementPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: MeasurementPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn site(&self) -> &ObservingSite {
        &self.site
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn policy(&self) -> MeasurementPolicy {
        self.policy
    }

    fn solve_exposure<M: SnMeasurement>(
        &self,
        target: &Target,
        measurement: &M,
    ) -> Result<ExposureOutcome, ObsNightError> {
        if target.magnitude.is_none() {
            return Ok(ExposureOutcome::Skipped("no magnitude".to_string()));
        }

        match self.solver.solve_target(target, measurement) {
            Ok(solution) => Ok(ExposureOutcome::Solved(solution)),
            Err(err) if self.policy == MeasurementPolicy::SkipTarget => {
                warn!(target_name = %target.name, error = %err, "exposure solve skipped");
                Ok(ExposureOutcome::Skipped(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Run the full plan.
    ///
    /// Arguments
    /// ---------
    /// * `names`: target names, in report order
    /// * `resolver`: name lookup collaborator
    /// * `measurement`: S/N measurement collaborator
    /// * `geometry`, `lunar`: sky collaborators of the scheduler
    ///
    /// Errors
    /// ------
    /// * target construction errors ([`ObsNightError::MissingLookupField`],
    ///   [`ObsNightError::InvalidCoordinate`], [`ObsNightError::InvalidMagnitude`])
    /// * exposure errors under [`MeasurementPolicy::Abort`]
    /// * [`ObsNightError::InvalidParameter`] for an empty name list
    /// * [`ObsNightError::NoObservableNight`] from the scheduler
    pub fn plan<R, M, G, L>(
        &self,
        names: &[&str],
        resolver: &R,
        measurement: &M,
        geometry: &G,
        lunar: &L,
    ) -> Result<PlanReport, ObsNightError>
    where
        R: TargetResolver,
        M: SnMeasurement,
        G: SkyGeometry,
        L: LunarPhase,
    {
        let targets = resolve_targets(names, resolver)?;

        let reports = targets
            .into_iter()
            .map(|target| {
                let exposure = self.solve_exposure(&target, measurement)?;
                Ok(TargetReport { target, exposure })
            })
            .collect::<Result<Vec<_>, ObsNightError>>()?;

        let scheduled: Vec<Target> = reports.iter().map(|r| r.target.clone()).collect();
        let schedule = ObservabilityScheduler::new(geometry, lunar, self.scheduler_params)?
            .schedule(&scheduled, &self.site, &self.range)?;

        info!(
            n_targets = reports.len(),
            solved = reports
                .iter()
                .filter(|r| r.exposure.solution().is_some())
                .count(),
            site = %self.site.name,
            "plan complete"
        );

        Ok(PlanReport {
            site: self.site.clone(),
            targets: reports,
            schedule,
        })
    }
}

//! # Exposure-time solver
//!
//! Bounded fixed-point iteration on the exposure time:
//!
//! ```text
//! t ← initial_exposure
//! repeat at most max_iterations times:
//!     sn ← measure(magnitude, t) at wavelength        (missing row → MeasurementUnavailable)
//!     if |sn − target_sn| ≤ tolerance: converged
//!     t ← correction(t, sn, target_sn)
//! ```
//!
//! When the bound is exhausted the solver returns its latest exposure estimate together with the
//! last measured S/N, flagged `converged = false`. The exposure is never clamped: a magnitude far
//! outside the measurement surface can drive it toward zero or infinity.
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::correction::{CorrectionStrategy, SqrtLawCorrection};
use super::{InstrumentSetup, SnMeasurement};
use crate::constants::{
    Angstrom, Second, DEFAULT_INITIAL_EXPOSURE, DEFAULT_MAX_ITERATIONS, DEFAULT_SN_TOLERANCE,
    DEFAULT_TARGET_SN, DEFAULT_WAVELENGTH,
};
use crate::obsnight_errors::ObsNightError;
use crate::targets::Target;

/// Convergence parameters of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// S/N to reach.
    pub target_sn: f64,
    /// Wavelength at which the S/N is read, Å.
    pub wavelength: Angstrom,
    /// Maximum number of measurements.
    pub max_iterations: usize,
    /// Accepted absolute S/N error.
    pub tolerance: f64,
    /// Exposure of the first measurement, seconds.
    pub initial_exposure: Second,
}

impl Default for SolverParams {
    fn default() -> Self {
        SolverParams {
            target_sn: DEFAULT_TARGET_SN,
            wavelength: DEFAULT_WAVELENGTH,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_SN_TOLERANCE,
            initial_exposure: DEFAULT_INITIAL_EXPOSURE,
        }
    }
}

impl SolverParams {
    /// Check the parameter domain.
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidParameter`] naming the first offending field
    pub fn validate(&self) -> Result<(), ObsNightError> {
        let invalid = |msg: String| Err(ObsNightError::InvalidParameter(msg));

        if !(self.target_sn > 0.0) {
            return invalid(format!("target S/N must be positive, got {}", self.target_sn));
        }
        if !(self.wavelength > 0.0) {
            return invalid(format!("wavelength must be positive, got {}", self.wavelength));
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".to_string());
        }
        if !(self.tolerance >= 0.0) {
            return invalid(format!("tolerance must be nonnegative, got {}", self.tolerance));
        }
        if !(self.initial_exposure > 0.0) {
            return invalid(format!(
                "initial exposure must be positive, got {}",
                self.initial_exposure
            ));
        }
        Ok(())
    }
}

/// Outcome of one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExposureSolution {
    /// Exposure time estimate, seconds. When converged, the exposure that produced `sn`.
    pub exposure_time: Second,
    /// Last measured S/N.
    pub sn: f64,
    /// Number of measurements performed.
    pub iterations: usize,
    /// Whether `sn` is within tolerance of the target.
    pub converged: bool,
}

impl ExposureSolution {
    /// Absolute distance between the last measured S/N and `target_sn`.
    pub fn residual(&self, target_sn: f64) -> f64 {
        (self.sn - target_sn).abs()
    }
}

/// Iterative exposure-time solver, generic over its correction rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureSolver<C = SqrtLawCorrection> {
    params: SolverParams,
    setup: InstrumentSetup,
    correction: C,
}

impl Default for ExposureSolver<SqrtLawCorrection> {
    fn default() -> Self {
        ExposureSolver {
            params: SolverParams::default(),
            setup: InstrumentSetup::default(),
            correction: SqrtLawCorrection,
        }
    }
}

impl ExposureSolver<SqrtLawCorrection> {
    pub fn new(params: SolverParams, setup: InstrumentSetup) -> Result<Self, ObsNightError> {
        params.validate()?;
        Ok(ExposureSolver {
            params,
            setup,
            correction: SqrtLawCorrection,
        })
    }
}

impl<C: CorrectionStrategy> ExposureSolver<C> {
    /// Swap the correction rule, keeping parameters and instrument setup.
    pub fn with_correction<D: CorrectionStrategy>(self, correction: D) -> ExposureSolver<D> {
        ExposureSolver {
            params: self.params,
            setup: self.setup,
            correction,
        }
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn setup(&self) -> &InstrumentSetup {
        &self.setup
    }

    /// Solve for a bare magnitude.
    ///
    /// Arguments
    /// ---------
    /// * `magnitude`: apparent magnitude of the source (any sign)
    /// * `measurement`: the S/N measurement collaborator
    ///
    /// Return
    /// ------
    /// * the [`ExposureSolution`]; check `converged` for a best-effort result
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::MeasurementUnavailable`] if a measurement has no row at the wavelength
    /// * any error reported by the collaborator itself
    pub fn solve<M: SnMeasurement>(
        &self,
        magnitude: f64,
        measurement: &M,
    ) -> Result<ExposureSolution, ObsNightError> {
        self.iterate(&format!("mag {magnitude}"), magnitude, measurement)
    }

    /// Solve for a resolved target; errors carry the target name.
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::MissingLookupField`] if the target has no magnitude
    /// * everything [`ExposureSolver::solve`] can return
    pub fn solve_target<M: SnMeasurement>(
        &self,
        target: &Target,
        measurement: &M,
    ) -> Result<ExposureSolution, ObsNightError> {
        let magnitude = target
            .magnitude
            .ok_or_else(|| ObsNightError::MissingLookupField {
                target: target.name.clone(),
                field: "magnitude",
            })?;
        self.iterate(&target.name, magnitude, measurement)
    }

    fn iterate<M: SnMeasurement>(
        &self,
        label: &str,
        magnitude: f64,
        measurement: &M,
    ) -> Result<ExposureSolution, ObsNightError> {
        self.params.validate()?;
        let SolverParams {
            target_sn,
            wavelength,
            max_iterations,
            tolerance,
            initial_exposure,
        } = self.params;

        let mut exposure_time = initial_exposure;
        let mut sn = f64::NAN;

        for iteration in 1..=max_iterations {
            let table = measurement.measure(&self.setup, magnitude, exposure_time)?;
            sn = table
                .sn_at(wavelength)
                .ok_or_else(|| ObsNightError::MeasurementUnavailable {
                    target: label.to_string(),
                    wavelength,
                })?;

            debug!(target_name = label, iteration, exposure_time, sn, "S/N measured");

            if (sn - target_sn).abs() <= tolerance {
                info!(target_name = label, exposure_time, sn, iteration, "exposure converged");
                return Ok(ExposureSolution {
                    exposure_time,
                    sn,
                    iterations: iteration,
                    converged: true,
                });
            }

            exposure_time = self.correction.next_exposure(exposure_time, sn, target_sn);
        }

        warn!(
            target_name = label,
            exposure_time,
            sn,
            residual = (sn - target_sn).abs(),
            "exposure did not converge within {max_iterations} iterations"
        );
        Ok(ExposureSolution {
            exposure_time,
            sn,
            iterations: max_iterations,
            converged: false,
        })
    }
}

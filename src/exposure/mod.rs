//! # Exposure-time convergence
//!
//! Finding the exposure time that reaches a desired signal-to-noise ratio is an iterative
//! root search against a measurement surface the crate does not own. The pieces are:
//!
//! - [`SnMeasurement`]: the measurement collaborator. Given a magnitude, an exposure time and
//!   the fixed [`InstrumentSetup`], it returns an [`SnTable`] of `(wavelength, S/N)` rows.
//!   An HTTP exposure-time calculator, a lookup table or a local physical model are all valid.
//! - [`correction::CorrectionStrategy`]: the update rule from one exposure guess to the next.
//!   The default [`correction::SqrtLawCorrection`] assumes the shot-noise regime `S/N ∝ √t`.
//! - [`solver::ExposureSolver`]: the bounded iteration that ties them together and returns an
//!   [`solver::ExposureSolution`].
//! - [`models`]: two local measurement surfaces, [`models::ShotNoiseModel`] and
//!   [`models::TabulatedMeasurement`].
//!
//! ## Error policy
//!
//! - A table without a row at the requested wavelength is fatal:
//!   [`ObsNightError::MeasurementUnavailable`] is returned immediately, without retry.
//! - Exhausting the iteration bound is **not** an error; the solution carries
//!   `converged = false` and callers inspect [`solver::ExposureSolution::residual`].
//!
//! ## Example
//!
//! ```rust
//! use obsnight::exposure::models::ShotNoiseModel;
//! use obsnight::exposure::solver::ExposureSolver;
//!
//! // With the default model a magnitude-18 source gives S/N = √t at 6000 Å.
//! let solution = ExposureSolver::default().solve(18.0, &ShotNoiseModel::default())?;
//! assert_eq!(solution.exposure_time, 2500.0);
//! assert_eq!(solution.sn, 50.0);
//! assert_eq!(solution.iterations, 2);
//! # Ok::<(), obsnight::obsnight_errors::ObsNightError>(())
//! ```
pub mod correction;
pub mod models;
pub mod solver;

use serde::{Deserialize, Serialize};

use crate::constants::{
    Angstrom, Second, DEFAULT_MEASUREMENT_AIRMASS, DEFAULT_SEEING, DEFAULT_SLIT_WIDTH,
};
use crate::obsnight_errors::ObsNightError;

/// Fixed instrument parameters submitted with every measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentSetup {
    /// Seeing FWHM, arcsec.
    pub seeing: f64,
    /// Slit width, arcsec.
    pub slit_width: f64,
    /// Airmass assumed by the calculator.
    pub airmass: f64,
}

impl Default for InstrumentSetup {
    fn default() -> Self {
        InstrumentSetup {
            seeing: DEFAULT_SEEING,
            slit_width: DEFAULT_SLIT_WIDTH,
            airmass: DEFAULT_MEASUREMENT_AIRMASS,
        }
    }
}

/// S/N per wavelength returned by one measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnTable {
    rows: Vec<(Angstrom, f64)>,
}

impl SnTable {
    pub fn new(rows: Vec<(Angstrom, f64)>) -> Self {
        SnTable { rows }
    }

    /// S/N of the first row whose wavelength equals `wavelength` exactly.
    pub fn sn_at(&self, wavelength: Angstrom) -> Option<f64> {
        self.rows
            .iter()
            .find(|(w, _)| *w == wavelength)
            .map(|(_, sn)| *sn)
    }

    pub fn rows(&self) -> &[(Angstrom, f64)] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(Angstrom, f64)> for SnTable {
    fn from_iter<I: IntoIterator<Item = (Angstrom, f64)>>(iter: I) -> Self {
        SnTable::new(iter.into_iter().collect())
    }
}

/// Measurement collaborator of the exposure solver.
///
/// Implementations report their own failures (network, parsing, ...) as
/// [`ObsNightError::MeasurementFailed`]; a missing wavelength is *not* a failure of the
/// collaborator, it is simply a table without that row.
pub trait SnMeasurement {
    fn measure(
        &self,
        setup: &InstrumentSetup,
        magnitude: f64,
        exposure_time: Second,
    ) -> Result<SnTable, ObsNightError>;
}

impl<M: SnMeasurement + ?Sized> SnMeasurement for &M {
    fn measure(
        &self,
        setup: &InstrumentSetup,
        magnitude: f64,
        exposure_time: Second,
    ) -> Result<SnTable, ObsNightError> {
        (**self).measure(setup, magnitude, exposure_time)
    }
}

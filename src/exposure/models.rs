//! Local measurement surfaces.
//!
//! Both models scale as a source-limited detector: `S/N ∝ √t · 10^(−0.2 (m − m_ref))`.
//!
//! - [`ShotNoiseModel`] evaluates that law on a fixed wavelength grid with a Gaussian
//!   throughput curve.
//! - [`TabulatedMeasurement`] rescales a reference `(wavelength, S/N)` table measured once at
//!   `(m_ref, t_ref)`, typically exported from an exposure-time calculator as CSV.
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::{InstrumentSetup, SnMeasurement, SnTable};
use crate::constants::{Angstrom, Second};
use crate::obsnight_errors::ObsNightError;

fn brightness_factor(magnitude: f64, reference_magnitude: f64) -> f64 {
    10f64.powf(-0.2 * (magnitude - reference_magnitude))
}

/// Analytic shot-noise-limited response.
///
/// `S/N(λ) = sn_per_root_second · √t · 10^(−0.2 (m − reference_magnitude)) · η(λ)` with
/// `η(λ) = exp(−((λ − peak_wavelength) / throughput_width)²)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotNoiseModel {
    pub reference_magnitude: f64,
    pub sn_per_root_second: f64,
    pub peak_wavelength: Angstrom,
    pub throughput_width: Angstrom,
    pub wavelengths: Vec<Angstrom>,
}

impl Default for ShotNoiseModel {
    fn default() -> Self {
        ShotNoiseModel {
            reference_magnitude: 18.0,
            sn_per_root_second: 1.0,
            peak_wavelength: 6000.0,
            throughput_width: 4000.0,
            wavelengths: (0..=12).map(|i| 3500.0 + 500.0 * i as f64).collect(),
        }
    }
}

impl ShotNoiseModel {
    fn throughput(&self, wavelength: Angstrom) -> f64 {
        let x = (wavelength - self.peak_wavelength) / self.throughput_width;
        (-x * x).exp()
    }
}

impl SnMeasurement for ShotNoiseModel {
    fn measure(
        &self,
        _setup: &InstrumentSetup,
        magnitude: f64,
        exposure_time: Second,
    ) -> Result<SnTable, ObsNightError> {
        let base = self.sn_per_root_second
            * exposure_time.sqrt()
            * brightness_factor(magnitude, self.reference_magnitude);

        Ok(self
            .wavelengths
            .iter()
            .map(|&w| (w, base * self.throughput(w)))
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TableRow {
    wavelength: Angstrom,
    sn: f64,
}

/// Reference S/N table rescaled to any magnitude and exposure.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedMeasurement {
    reference_magnitude: f64,
    reference_exposure: Second,
    table: SnTable,
}

impl TabulatedMeasurement {
    /// Wrap a table measured at `reference_magnitude` and `reference_exposure` seconds.
    ///
    /// Errors
    /// ------
    /// * [`ObsNightError::InvalidParameter`] if the reference exposure is not positive or the
    ///   table is empty
    pub fn new(
        reference_magnitude: f64,
        reference_exposure: Second,
        table: SnTable,
    ) -> Result<Self, ObsNightError> {
        if !(reference_exposure > 0.0) {
            return Err(ObsNightError::InvalidParameter(format!(
                "reference exposure must be positive, got {reference_exposure}"
            )));
        }
        if table.is_empty() {
            return Err(ObsNightError::InvalidParameter(
                "reference S/N table is empty".to_string(),
            ));
        }
        Ok(TabulatedMeasurement {
            reference_magnitude,
            reference_exposure,
            table,
        })
    }

    /// Read the reference table from CSV with a `wavelength,sn` header.
    pub fn from_reader<R: Read>(
        reference_magnitude: f64,
        reference_exposure: Second,
        reader: R,
    ) -> Result<Self, ObsNightError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let table = csv_reader
            .deserialize::<TableRow>()
            .map(|row| row.map(|r| (r.wavelength, r.sn)))
            .collect::<Result<SnTable, csv::Error>>()?;

        TabulatedMeasurement::new(reference_magnitude, reference_exposure, table)
    }

    pub fn from_csv_path(
        reference_magnitude: f64,
        reference_exposure: Second,
        path: impl AsRef<Path>,
    ) -> Result<Self, ObsNightError> {
        let file = std::fs::File::open(path)?;
        TabulatedMeasurement::from_reader(reference_magnitude, reference_exposure, file)
    }
}

impl SnMeasurement for TabulatedMeasurement {
    fn measure(
        &self,
        _setup: &InstrumentSetup,
        magnitude: f64,
        exposure_time: Second,
    ) -> Result<SnTable, ObsNightError> {
        let scale = (exposure_time / self.reference_exposure).sqrt()
            * brightness_factor(magnitude, self.reference_magnitude);

        Ok(self
            .table
            .rows()
            .iter()
            .map(|&(w, sn)| (w, sn * scale))
            .collect())
    }
}

#[cfg(test)]
mod models_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_shot_noise_reference_point() {
        let model = ShotNoiseModel::default();
        let table = model
            .measure(&InstrumentSetup::default(), 18.0, 100.0)
            .unwrap();

        assert_eq!(table.sn_at(6000.0), Some(10.0));
        assert!(table.sn_at(4000.0).unwrap() < 10.0);
        assert_eq!(table.sn_at(6100.0), None);
    }

    #[test]
    fn test_shot_noise_magnitude_scaling() {
        let model = ShotNoiseModel::default();
        let setup = InstrumentSetup::default();

        // 5 magnitudes fainter is 100× less flux, 10× less S/N
        let bright = model.measure(&setup, 18.0, 400.0).unwrap();
        let faint = model.measure(&setup, 23.0, 400.0).unwrap();
        assert_relative_eq!(
            bright.sn_at(6000.0).unwrap() / faint.sn_at(6000.0).unwrap(),
            10.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_tabulated_from_csv() {
        let csv = "wavelength,sn\n5000,8.0\n6000,10.0\n7000,9.0\n";
        let model = TabulatedMeasurement::from_reader(20.0, 100.0, csv.as_bytes()).unwrap();

        let table = model
            .measure(&InstrumentSetup::default(), 20.0, 400.0)
            .unwrap();
        assert_relative_eq!(table.sn_at(6000.0).unwrap(), 20.0);
        assert_relative_eq!(table.sn_at(5000.0).unwrap(), 16.0);
        assert_eq!(table.sn_at(6500.0), None);
    }

    #[test]
    fn test_tabulated_rejects_empty_table() {
        let csv = "wavelength,sn\n";
        assert!(matches!(
            TabulatedMeasurement::from_reader(20.0, 100.0, csv.as_bytes()),
            Err(ObsNightError::InvalidParameter(_))
        ));
        assert!(TabulatedMeasurement::from_reader(20.0, 100.0, "wavelength,sn\nx,1\n".as_bytes())
            .is_err());
    }
}

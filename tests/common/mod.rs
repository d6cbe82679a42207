#![allow(dead_code)]

use std::collections::HashMap;

use hifitime::{Epoch, Unit};
use obsnight::ephemeris::{LunarPhase, SkyGeometry};
use obsnight::exposure::{InstrumentSetup, SnMeasurement, SnTable};
use obsnight::observers::ObservingSite;
use obsnight::obsnight_errors::ObsNightError;
use obsnight::targets::Target;

/// S/N = √t · 10^(−0.2 (m − 18)) at 6000 Å only.
pub struct SqrtMeasurement;

impl SnMeasurement for SqrtMeasurement {
    fn measure(
        &self,
        _setup: &InstrumentSetup,
        magnitude: f64,
        exposure_time: f64,
    ) -> Result<SnTable, ObsNightError> {
        let sn = exposure_time.sqrt() * 10f64.powf(-0.2 * (magnitude - 18.0));
        Ok(SnTable::new(vec![(5000.0, sn * 0.8), (6000.0, sn)]))
    }
}

/// A collaborator whose backend is down.
pub struct OfflineMeasurement;

impl SnMeasurement for OfflineMeasurement {
    fn measure(
        &self,
        _setup: &InstrumentSetup,
        _magnitude: f64,
        _exposure_time: f64,
    ) -> Result<SnTable, ObsNightError> {
        Err(ObsNightError::MeasurementFailed(
            "calculator unreachable".to_string(),
        ))
    }
}

/// Constant airmass per (target, day index); absent entries are below the horizon.
pub struct ScriptedGeometry {
    pub start: Epoch,
    pub airmass: HashMap<(String, usize), f64>,
}

impl ScriptedGeometry {
    pub fn new(start: Epoch, entries: &[(&str, usize, f64)]) -> Self {
        ScriptedGeometry {
            start,
            airmass: entries
                .iter()
                .map(|(name, day, a)| ((name.to_string(), *day), *a))
                .collect(),
        }
    }
}

impl SkyGeometry for ScriptedGeometry {
    fn airmass(&self, _site: &ObservingSite, target: &Target, epoch: &Epoch) -> Option<f64> {
        let day = (*epoch - self.start).to_unit(Unit::Day).floor() as usize;
        self.airmass.get(&(target.name.clone(), day)).copied()
    }

    fn is_night(&self, _site: &ObservingSite, _epoch: &Epoch) -> bool {
        false
    }
}

/// Illuminated fraction per day index.
pub struct ScriptedMoon {
    pub start: Epoch,
    pub fractions: Vec<f64>,
}

impl LunarPhase for ScriptedMoon {
    fn illumination(&self, epoch: &Epoch) -> f64 {
        let day = (*epoch - self.start).to_unit(Unit::Day).round() as usize;
        self.fractions[day]
    }
}

pub fn test_site() -> ObservingSite {
    ObservingSite::new(0.0, 0.0, 0.0, "test").unwrap()
}

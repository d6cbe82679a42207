//! Daily lunar illumination and full-moon exclusion.
use crate::ephemeris::LunarPhase;
use crate::time::DateRange;

/// One illumination fraction per day of a [`DateRange`], sampled at each day's start instant.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonPhaseSeries {
    fractions: Vec<f64>,
    threshold: f64,
}

impl MoonPhaseSeries {
    /// Evaluate `lunar` at the start of every day of `range`.
    pub fn compute<L: LunarPhase>(range: &DateRange, lunar: &L, threshold: f64) -> Self {
        MoonPhaseSeries {
            fractions: range.days().map(|day| lunar.illumination(&day)).collect(),
            threshold,
        }
    }

    pub fn from_fractions(fractions: Vec<f64>, threshold: f64) -> Self {
        MoonPhaseSeries {
            fractions,
            threshold,
        }
    }

    pub fn fraction(&self, day: usize) -> f64 {
        self.fractions[day]
    }

    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether night `day` is disqualified by a near-full moon (fraction strictly above threshold).
    pub fn is_excluded(&self, day: usize) -> bool {
        self.fractions[day] > self.threshold
    }

    pub fn excluded_days(&self) -> Vec<usize> {
        (0..self.fractions.len())
            .filter(|&d| self.is_excluded(d))
            .collect()
    }
}

#[cfg(test)]
mod moon_series_test {
    use super::*;
    use crate::ephemeris::AnalyticEphemeris;

    #[test]
    fn test_threshold_is_strict() {
        let series = MoonPhaseSeries::from_fractions(vec![0.2, 0.95, 0.951, 1.0], 0.95);
        assert!(!series.is_excluded(0));
        assert!(!series.is_excluded(1));
        assert_eq!(series.excluded_days(), vec![2, 3]);
    }

    #[test]
    fn test_april_2023_full_moon_excluded() {
        let range = DateRange::from_calendar_dates("2023-04-01", "2023-04-30").unwrap();
        let series = MoonPhaseSeries::compute(&range, &AnalyticEphemeris::default(), 0.95);

        assert_eq!(series.fractions().len(), 29);
        // 2023-04-06 (full moon) is excluded, 2023-04-20 (new moon) is not
        assert!(series.is_excluded(5));
        assert!(!series.is_excluded(19));
        assert!(series.fraction(19) < 0.05);
    }
}

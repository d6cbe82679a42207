//! Exposure update rules.
//!
//! A [`CorrectionStrategy`] maps the current exposure and its measured S/N to the next guess.
//! The iteration skeleton in [`super::solver`] is the same for any monotonic response; only the
//! closed-form inverse of the assumed response changes.
use crate::constants::Second;

pub trait CorrectionStrategy {
    /// Next exposure time given the `current` one, the S/N it produced and the goal.
    fn next_exposure(&self, current: Second, measured_sn: f64, target_sn: f64) -> Second;
}

/// Shot-noise regime, `S/N ∝ √t`: `t' = t · (target / measured)²`.
///
/// Exact in one step when the response really is a square root; can overshoot when the
/// instrument is background-limited or saturating. No clamping is applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SqrtLawCorrection;

impl CorrectionStrategy for SqrtLawCorrection {
    fn next_exposure(&self, current: Second, measured_sn: f64, target_sn: f64) -> Second {
        current * (target_sn / measured_sn).powi(2)
    }
}

/// General power-law regime, `S/N ∝ t^index`: `t' = t · (target / measured)^(1 / index)`.
///
/// `index = 1.0` models a read-noise dominated detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawCorrection {
    pub index: f64,
}

impl CorrectionStrategy for PowerLawCorrection {
    fn next_exposure(&self, current: Second, measured_sn: f64, target_sn: f64) -> Second {
        current * (target_sn / measured_sn).powf(self.index.recip())
    }
}

#[cfg(test)]
mod correction_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_law() {
        assert_eq!(SqrtLawCorrection.next_exposure(100.0, 10.0, 50.0), 2500.0);
        assert_eq!(SqrtLawCorrection.next_exposure(400.0, 100.0, 50.0), 100.0);
    }

    #[test]
    fn test_power_law() {
        let linear = PowerLawCorrection { index: 1.0 };
        assert_relative_eq!(linear.next_exposure(100.0, 10.0, 50.0), 500.0);

        let sqrt = PowerLawCorrection { index: 0.5 };
        assert_relative_eq!(
            sqrt.next_exposure(100.0, 10.0, 50.0),
            SqrtLawCorrection.next_exposure(100.0, 10.0, 50.0),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_measurement_is_not_clamped() {
        assert!(SqrtLawCorrection
            .next_exposure(100.0, 0.0, 50.0)
            .is_infinite());
    }
}

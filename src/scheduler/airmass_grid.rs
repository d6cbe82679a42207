//! Per-target, per-night minimum airmass table.
//!
//! Stored row-major (`target`, `day`) in a flat vector. Every cell starts at `+∞` ("not observed
//! that night") and can only decrease: [`AirmassGrid::fold`] keeps the minimum of the current
//! value and the new sample. A cell is still `+∞` at the end of a sweep exactly when no valid
//! sample of that night had the target above the horizon.

#[derive(Debug, Clone, PartialEq)]
pub struct AirmassGrid {
    n_targets: usize,
    n_days: usize,
    cells: Vec<f64>,
}

impl AirmassGrid {
    pub fn new(n_targets: usize, n_days: usize) -> Self {
        AirmassGrid {
            n_targets,
            n_days,
            cells: vec![f64::INFINITY; n_targets * n_days],
        }
    }

    pub fn n_targets(&self) -> usize {
        self.n_targets
    }

    pub fn n_days(&self) -> usize {
        self.n_days
    }

    #[inline]
    fn index(&self, target: usize, day: usize) -> usize {
        debug_assert!(target < self.n_targets && day < self.n_days);
        target * self.n_days + day
    }

    pub fn get(&self, target: usize, day: usize) -> f64 {
        self.cells[self.index(target, day)]
    }

    /// Fold one airmass sample into cell `(target, day)`.
    ///
    /// Return
    /// ------
    /// * `true` if the cell was lowered
    pub fn fold(&mut self, target: usize, day: usize, airmass: f64) -> bool {
        let idx = self.index(target, day);
        if airmass < self.cells[idx] {
            self.cells[idx] = airmass;
            true
        } else {
            false
        }
    }

    /// Best airmass of `target` for every night, in day order.
    pub fn target_row(&self, target: usize) -> &[f64] {
        let start = self.index(target, 0);
        &self.cells[start..start + self.n_days]
    }

    /// Best airmass of every target for night `day`, in target order.
    pub fn day_column(&self, day: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_targets).map(move |t| self.get(t, day))
    }

    /// Arithmetic mean over targets of night `day`; `+∞` if any target is unobserved.
    pub fn mean_for_day(&self, day: usize) -> f64 {
        self.day_column(day).sum::<f64>() / self.n_targets as f64
    }
}

#[cfg(test)]
mod airmass_grid_test {
    use super::*;

    #[test]
    fn test_starts_unobserved() {
        let grid = AirmassGrid::new(2, 3);
        assert!(grid.target_row(1).iter().all(|a| a.is_infinite()));
        assert_eq!(grid.mean_for_day(2), f64::INFINITY);
    }

    #[test]
    fn test_fold_is_non_increasing() {
        let mut grid = AirmassGrid::new(1, 1);

        let mut previous = grid.get(0, 0);
        for sample in [2.5, 1.8, 3.0, 1.2, 1.9, 1.2] {
            grid.fold(0, 0, sample);
            assert!(grid.get(0, 0) <= previous);
            previous = grid.get(0, 0);
        }
        assert_eq!(grid.get(0, 0), 1.2);
        assert!(!grid.fold(0, 0, 4.0));
        assert!(!grid.fold(0, 0, f64::NAN));
    }

    #[test]
    fn test_mean_of_day() {
        let mut grid = AirmassGrid::new(2, 2);
        grid.fold(0, 0, 1.0);
        grid.fold(1, 0, 2.0);
        grid.fold(0, 1, 1.0);

        assert_eq!(grid.mean_for_day(0), 1.5);
        // Target 1 never observed on day 1 poisons the mean
        assert_eq!(grid.mean_for_day(1), f64::INFINITY);
        assert_eq!(grid.day_column(0).collect::<Vec<_>>(), vec![1.0, 2.0]);
        assert_eq!(grid.target_row(0), &[1.0, 1.0]);
    }
}

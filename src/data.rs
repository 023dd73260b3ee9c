//! Synthetic samples and train/test partitioning
//!
//! The experiment runs on a sine wave over one period, sampled on an even grid and
//! corrupted with Gaussian noise:
//!
//! ```math
//! xᵢ = i / (n - 1),  yᵢ = sin(2π xᵢ) + εᵢ,  εᵢ ~ N(0, σ²)
//! ```
use rand::{seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    transforms::{ApplyNoise, Strength},
    value::{linspace, CoordExt},
};

/// A set of `(x, y)` sample points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    points: Vec<(f64, f64)>,
}
impl SampleSet {
    /// Wraps existing points.
    #[must_use]
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// `n` noise-free points of `sin(2πx)` on `[0, 1]`.
    #[must_use]
    pub fn sine(n: usize) -> Self {
        let points = linspace(0.0, 1.0, n)
            .into_iter()
            .map(|x| (x, (std::f64::consts::TAU * x).sin()))
            .collect();
        Self { points }
    }

    /// `n` points of `sin(2πx)` on `[0, 1]` with Gaussian noise added to y.
    ///
    /// Without a seed, every call draws fresh noise.
    ///
    /// # Errors
    /// Returns [`Error::InvalidNoise`] if the strength is negative or not finite.
    ///
    /// # Example
    /// ```
    /// # use polysweep::{data::SampleSet, transforms::Strength};
    /// let sample = SampleSet::noisy_sine(101, Strength::Absolute(0.1), Some(1)).unwrap();
    /// assert_eq!(sample.len(), 101);
    /// ```
    pub fn noisy_sine(n: usize, noise: Strength<f64>, seed: Option<u64>) -> Result<Self> {
        let points = Self::sine(n).points.apply_normal_noise(noise, seed)?;
        Ok(Self { points })
    }

    /// The sample points.
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Consumes the set, returning its points.
    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The x values.
    pub fn x(&self) -> Vec<f64> {
        self.points.x()
    }

    /// The y values.
    pub fn y(&self) -> Vec<f64> {
        self.points.y()
    }
}

/// A disjoint partition of a sample into training and held-out points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainTestSplit {
    /// Points the models are fitted on
    pub train: Vec<(f64, f64)>,

    /// Points held out for evaluation
    pub test: Vec<(f64, f64)>,
}
impl TrainTestSplit {
    /// Total number of points across both sides.
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// True if both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Randomly partitions points into a training set and a test set.
///
/// The test set receives `ceil(test_fraction · n)` points, chosen by shuffling indices.
/// With a seed the partition is reproducible; without one it is redrawn on every call.
/// Both sides keep the points in their shuffled order.
///
/// # Errors
/// Returns [`Error::InvalidSplit`] if `test_fraction` is not in (0, 1), or if either side
/// would be empty.
///
/// # Example
/// ```
/// # use polysweep::data::{train_test_split, SampleSet};
/// let sample = SampleSet::sine(101);
/// let split = train_test_split(sample.points(), 0.3, Some(7)).unwrap();
/// assert_eq!(split.test.len(), 31);
/// assert_eq!(split.train.len(), 70);
/// ```
pub fn train_test_split(
    points: &[(f64, f64)],
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<TrainTestSplit> {
    let n = points.len();
    let invalid = || Error::InvalidSplit {
        fraction: test_fraction,
        n,
    };

    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(invalid());
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let n_test = (test_fraction * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(invalid());
    }

    let mut rng = match seed {
        Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
        None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
    };
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    let test = test_idx.iter().map(|&i| points[i]).collect();
    let train = train_idx.iter().map(|&i| points[i]).collect();

    Ok(TrainTestSplit { train, test })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn sine_is_exact() {
        let sample = SampleSet::sine(101);
        assert_eq!(sample.len(), 101);
        assert_abs_diff_eq!(sample.points()[25].1, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(sample.points()[100].0, 1.0);
    }

    #[test]
    fn noisy_sine_keeps_x_grid() {
        let clean = SampleSet::sine(101);
        let noisy = SampleSet::noisy_sine(101, Strength::Absolute(0.1), Some(5)).unwrap();
        assert_eq!(clean.x(), noisy.x());
        assert_ne!(clean.y(), noisy.y());

        let again = SampleSet::noisy_sine(101, Strength::Absolute(0.1), Some(5)).unwrap();
        assert_eq!(noisy, again);
    }

    #[test]
    fn split_sizes() {
        let sample = SampleSet::sine(101);
        let split = train_test_split(sample.points(), 0.3, Some(1)).unwrap();
        assert_eq!(split.test.len(), 31);
        assert_eq!(split.train.len(), 70);
        assert_eq!(split.len(), 101);
    }

    #[test]
    fn split_is_disjoint_and_covering() {
        let sample = SampleSet::sine(101);
        let split = train_test_split(sample.points(), 0.3, None).unwrap();

        let mut xs: Vec<f64> = split.train.x();
        xs.extend(split.test.x());
        xs.sort_by(f64::total_cmp);
        assert_eq!(xs, sample.x());
    }

    #[test]
    fn split_seed_is_reproducible() {
        let sample = SampleSet::sine(50);
        let a = train_test_split(sample.points(), 0.3, Some(11)).unwrap();
        let b = train_test_split(sample.points(), 0.3, Some(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn split_rejects_bad_fractions() {
        let sample = SampleSet::sine(10);
        for fraction in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                train_test_split(sample.points(), fraction, None),
                Err(Error::InvalidSplit { .. })
            ));
        }

        // ceil(0.99 * 2) = 2 leaves no training points
        let tiny = SampleSet::sine(2);
        assert!(train_test_split(tiny.points(), 0.99, None).is_err());
        assert!(train_test_split(&[], 0.3, None).is_err());
    }
}

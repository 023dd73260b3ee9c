use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

use crate::{
    error::{Error, Result},
    statistics,
    transforms::{Transform, Transformable},
    value::Value,
};

/// How large the noise is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Strength<T: Value> {
    /// Standard deviation of the noise, in the units of the data
    Absolute(T),

    /// Standard deviation of the noise as a multiple of the standard deviation of the data
    Relative(T),
}
impl<T: Value> Strength<T> {
    /// Resolve this strength into an absolute standard deviation for the given values
    fn resolve(self, values: &[T]) -> T {
        match self {
            Strength::Absolute(sd) => sd,
            Strength::Relative(k) => {
                let (sd, _) = statistics::stddev_and_mean(values.iter().copied());
                sd * k
            }
        }
    }
}

/// Types of noise based transforms for data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseTransform<T: Value> {
    /// Adds independent Gaussian noise to a signal or dataset.
    ///
    /// Gaussian noise is the familiar "bell curve" distribution.
    ///
    /// <div class="warning">
    ///
    /// **Technical Details**
    ///
    /// ```math
    /// xₙ = x + εₙ
    /// where
    ///   εₙ ~ N(0, σ²), σ = resolved strength
    /// ```
    /// </div>
    Gaussian {
        /// Standard deviation (spread) of the Gaussian distribution.
        strength: Strength<T>,

        /// Fixes the RNG seed for reproducibility.
        /// If not provided, a system RNG will be used each run.
        seed: Option<u64>,
    },
}
impl<T: Value> NoiseTransform<T> {
    fn seed(&self) -> Option<u64> {
        match self {
            NoiseTransform::Gaussian { seed, .. } => *seed,
        }
    }

    fn rng(seed: Option<u64>) -> rand::rngs::SmallRng {
        match seed {
            Some(s) => rand::rngs::SmallRng::seed_from_u64(s),
            None => rand::rngs::SmallRng::from_rng(&mut rand::rng()),
        }
    }
}
impl<T: Value> Transform<T> for NoiseTransform<T>
where
    T: num_traits::Float,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply<'a>(&self, data: impl Iterator<Item = &'a mut T>) -> Result<()> {
        let mut rng = Self::rng(self.seed());
        match self {
            NoiseTransform::Gaussian { strength, .. } => {
                let data = data.collect::<Vec<_>>();
                let values: Vec<T> = data.iter().map(|v| **v).collect();
                let sd = strength.resolve(&values);

                if !num_traits::Float::is_finite(sd) || sd < T::zero() {
                    return Err(Error::InvalidNoise(format!(
                        "standard deviation must be finite and non-negative, got {sd}"
                    )));
                }

                let gaussian =
                    Normal::new(T::zero(), sd).map_err(|e| Error::InvalidNoise(e.to_string()))?;
                for v in data {
                    *v += gaussian.sample(&mut rng);
                }
            }
        }

        Ok(())
    }
}

/// Trait for applying noise to data.
pub trait ApplyNoise<T: Value>
where
    Self: Sized,
{
    /// Adds Gaussian noise to the Y channel of a dataset.
    ///
    /// # Parameters
    ///
    /// - `strength`: Standard deviation of the noise, see [`Strength`].
    /// - `seed` *(optional)*: Fixes the RNG seed for reproducibility.
    ///   If not provided, a system RNG will be used each run.
    ///
    /// # Errors
    /// Returns an error if the strength does not resolve to a finite, non-negative standard deviation.
    ///
    /// # Example
    /// ```rust
    /// # use polysweep::transforms::{ApplyNoise, Strength};
    /// let data = vec![(1.0, 2.0), (2.0, 3.0)];
    /// let noisy_data = data.apply_normal_noise(Strength::Absolute(0.1), Some(7)).unwrap();
    /// ```
    fn apply_normal_noise(self, strength: Strength<T>, seed: Option<u64>) -> Result<Self>;
}
impl<T: Value> ApplyNoise<T> for Vec<(T, T)>
where
    T: num_traits::Float,
    rand_distr::StandardNormal: Distribution<T>,
{
    fn apply_normal_noise(mut self, strength: Strength<T>, seed: Option<u64>) -> Result<Self> {
        self.transform(&NoiseTransform::Gaussian { strength, seed })?;
        Ok(self)
    }
}

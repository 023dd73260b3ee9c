//! Error metrics and descriptive statistics for evaluating fits
//!
//! # Error Metrics
//! - [`rmse`]: Checked root-mean-squared error over two slices. This is the metric every sweep records.
//! - [`root_mean_squared_error`]: Unchecked RMSE over paired iterators.
//! - [`mean_squared_error`]: Average squared difference between observed and predicted values.
//! - [`mean_absolute_error`]: Average absolute difference, less sensitive to outliers than MSE.
//!
//! # Model Fit
//! - [`r_squared`]: Share of the variance in `y` explained by a fit.
//!
//! # Descriptive Statistics
//! - [`mean`]: Arithmetic mean of a dataset.
//! - [`stddev_and_mean`]: Standard deviation and mean of a dataset.
//!
//! # Normalization
//! - [`DomainNormalizer`]: Maps values from one range onto another; used by orthogonal bases.
//!
//! # Examples
//!
//! ```rust
//! use polysweep::statistics::{rmse, r_squared};
//!
//! let y = vec![1.0, 2.0, 3.0];
//! let y_fit = vec![1.1, 1.9, 3.05];
//!
//! let error = rmse(&y, &y_fit).unwrap();
//! let r2 = r_squared(y.iter().copied(), y_fit.iter().copied());
//! println!("RMSE = {error}, R² = {r2}");
//! ```
use crate::{
    error::{Error, Result},
    value::Value,
};

/// Computes the root mean squared error between two equal-length slices.
///
/// This is the checked form of [`root_mean_squared_error`]:
/// the iterator form silently truncates to the shorter input, this one refuses.
///
/// <div class="warning">
///
/// **Technical Details**
///
/// ```math
/// RMSE = √( (Σ (y_i - y_fit_i)²) / N )
/// ```
/// </div>
///
/// # Errors
/// - [`Error::LengthMismatch`] if the slices differ in length.
/// - [`Error::NoData`] if both slices are empty.
///
/// # Example
/// ```
/// # use polysweep::statistics::rmse;
/// let error: f64 = rmse(&[1.0, 2.0], &[1.0, 4.0]).unwrap();
/// assert!((error - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn rmse<T: Value>(y: &[T], y_fit: &[T]) -> Result<T> {
    if y.len() != y_fit.len() {
        return Err(Error::LengthMismatch {
            y: y.len(),
            y_fit: y_fit.len(),
        });
    }
    if y.is_empty() {
        return Err(Error::NoData);
    }

    Ok(root_mean_squared_error(
        y.iter().copied(),
        y_fit.iter().copied(),
    ))
}

/// Coefficient of determination of a fit.
///
/// `1` for predictions that match exactly, `0` for a model no better than the mean of `y`,
/// and negative for one that is worse. Pairs are consumed until either iterator runs out.
///
/// ```math
/// R² = 1 - Σ (yᵢ - ŷᵢ)² / Σ (yᵢ - ȳ)²
/// ```
pub fn r_squared<T: Value>(y: impl Iterator<Item = T>, y_fit: impl Iterator<Item = T>) -> T {
    let pairs: Vec<(T, T)> = y.zip(y_fit).collect();
    let y_mean = mean(pairs.iter().map(|(y, _)| *y));

    let (ss_residual, ss_total) = pairs.into_iter().fold(
        (T::zero(), T::zero()),
        |(res, tot), (y, y_fit)| (res + Value::powi(y - y_fit, 2), tot + Value::powi(y - y_mean, 2)),
    );
    T::one() - ss_residual / ss_total
}

/// Arithmetic mean; `NaN` for an empty sequence.
///
/// ```rust
/// let m = polysweep::statistics::mean([1.0, 2.0, 3.0].into_iter());
/// assert_eq!(m, 2.0);
/// ```
pub fn mean<T: Value>(data: impl Iterator<Item = T>) -> T {
    let (sum, count) = data.fold((T::zero(), T::zero()), |(sum, count), v| {
        (sum + v, count + T::one())
    });
    sum / count
}

/// Population standard deviation (divides by `N`), returned with the mean as `(stddev, mean)`.
pub fn stddev_and_mean<T: Value>(data: impl Iterator<Item = T>) -> (T, T) {
    let data: Vec<T> = data.collect();
    let mean = mean(data.iter().copied());
    let variance = self::mean(data.into_iter().map(|v| Value::powi(v - mean, 2)));
    (variance.sqrt(), mean)
}

/// Root mean squared error over paired iterators, in the units of `y`.
///
/// Pairs are consumed until either iterator runs out; use [`rmse`] when the
/// inputs must be the same length.
///
/// ```
/// # use polysweep::statistics::root_mean_squared_error;
/// let error = root_mean_squared_error([0.0, 0.0].into_iter(), [3.0, 4.0].into_iter());
/// assert!((error - 12.5_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn root_mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean_squared_error(y, y_fit).sqrt()
}

/// Mean squared error over paired iterators.
///
/// ```math
/// MSE = Σ (yᵢ - ŷᵢ)² / N
/// ```
pub fn mean_squared_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean(y.zip(y_fit).map(|(y, y_fit)| Value::powi(y - y_fit, 2)))
}

/// Mean absolute error over paired iterators.
///
/// ```math
/// MAE = Σ |yᵢ - ŷᵢ| / N
/// ```
pub fn mean_absolute_error<T: Value>(
    y: impl Iterator<Item = T>,
    y_fit: impl Iterator<Item = T>,
) -> T {
    mean(y.zip(y_fit).map(|(y, y_fit)| nalgebra::ComplexField::abs(y - y_fit)))
}

/// Normalizes values from one range to another.
///
/// Unlike a clamp, values outside the source range are extrapolated linearly,
/// so points held out of a fit can still be mapped with the fit's normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainNormalizer<T: Value> {
    src_range: (T, T),
    dst_range: (T, T),
}
impl<T: Value> DomainNormalizer<T> {
    /// Creates a new `DomainNormalizer` for the given source and destination ranges.
    pub fn new(src_range: (T, T), dst_range: (T, T)) -> Self {
        Self {
            src_range,
            dst_range,
        }
    }

    /// Normalizes a value from the source range to the destination range.
    ///
    /// A degenerate source range (a single x value) maps everything to the
    /// middle of the destination range.
    pub fn normalize(&self, x: T) -> T {
        let (src_min, src_max) = self.src_range;
        let (dst_min, dst_max) = self.dst_range;

        let width = src_max - src_min;
        if width == T::zero() {
            return (dst_min + dst_max) / T::two();
        }

        dst_min + (x - src_min) * (dst_max - dst_min) / width
    }
}

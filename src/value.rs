//! Numeric bounds and `(x, y)` helpers shared by every module
//!
//! [`Value`] is the float type features and fits are computed in; in practice `f64`.
//! [`CoordExt`] splits a slice of points into its x and y channels.
//!
//! ```rust
//! use polysweep::value::{linspace, CoordExt};
//!
//! let xs = linspace(0.0, 1.0, 11);
//! let data: Vec<(f64, f64)> = xs.iter().map(|&x| (x, 2.0 * x)).collect();
//! assert_eq!(data.x().len(), 11);
//! assert_eq!(data.x_range(), Some(0.0..=1.0));
//! ```
use std::ops::RangeInclusive;

use crate::error::Error;

/// Numeric type for features and fits
pub trait Value:
    nalgebra::Scalar
    + nalgebra::ComplexField<RealField = Self>
    + nalgebra::RealField
    + num_traits::float::FloatCore
    + std::fmt::LowerExp
{
    /// `2`
    #[must_use]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    /// Casts from any primitive number.
    ///
    /// # Errors
    /// Returns [`Error::CastFailed`] if `n` is not representable.
    fn try_cast<U: num_traits::NumCast>(n: U) -> Result<Self, Error> {
        num_traits::cast(n).ok_or(Error::CastFailed)
    }

    /// Integer power, without the ambiguity of the several `powi` in scope
    #[must_use]
    fn powi(self, n: i32) -> Self {
        nalgebra::ComplexField::powi(self, n)
    }

    /// Converts a `usize` to the target numeric type.
    ///
    /// Results in `infinity` if the value is out of range.
    #[must_use]
    fn from_positive_int(n: usize) -> Self {
        Self::try_cast(n).unwrap_or(Self::infinity())
    }
}

impl<T> Value for T where
    T: nalgebra::Scalar
        + nalgebra::ComplexField<RealField = Self>
        + nalgebra::RealField
        + num_traits::float::FloatCore
        + std::fmt::LowerExp
{
}

/// Returns `n` evenly spaced values over the closed interval `[start, end]`.
///
/// - `n == 0` yields an empty vector.
/// - `n == 1` yields `[start]`.
/// - The last value is exactly `end`.
#[must_use]
pub fn linspace<T: Value>(start: T, end: T, n: usize) -> Vec<T> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let steps = T::from_positive_int(n - 1);
            let step = (end - start) / steps;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        start + step * T::from_positive_int(i)
                    }
                })
                .collect()
        }
    }
}

/// The x and y channels of a set of points
pub trait CoordExt<T: Value> {
    /// x values, in order.
    fn x_iter(&self) -> impl Iterator<Item = T>;

    /// y values, in order.
    fn y_iter(&self) -> impl Iterator<Item = T>;

    /// Collects [`CoordExt::x_iter`].
    fn x(&self) -> Vec<T> {
        self.x_iter().collect()
    }

    /// Collects [`CoordExt::y_iter`].
    fn y(&self) -> Vec<T> {
        self.y_iter().collect()
    }

    /// Smallest and largest x, or `None` for no points.
    fn x_range(&self) -> Option<RangeInclusive<T>> {
        let bounds = self.x_iter().fold(None, |acc: Option<(T, T)>, x| {
            Some(match acc {
                Some((min, max)) => (
                    nalgebra::RealField::min(min, x),
                    nalgebra::RealField::max(max, x),
                ),
                None => (x, x),
            })
        });
        bounds.map(|(start, end)| start..=end)
    }
}
impl<T: Value> CoordExt<T> for [(T, T)] {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}
impl<T: Value> CoordExt<T> for Vec<(T, T)> {
    fn x_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(x, _)| *x)
    }

    fn y_iter(&self) -> impl Iterator<Item = T> {
        self.iter().map(|(_, y)| *y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linspace_endpoints_and_length() {
        let xs: Vec<f64> = linspace(0.0, 1.0, 101);
        assert_eq!(xs.len(), 101);
        assert!(xs[0].abs() < f64::EPSILON);
        assert!((xs[100] - 1.0).abs() < f64::EPSILON);
        assert!((xs[50] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn linspace_degenerate_counts() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(0.25, 1.0, 1), vec![0.25]);
    }

    #[test]
    fn coord_ext_ranges() {
        let data = vec![(1.5, -2.0), (2.0, 3.0), (0.0, 1.0)];
        assert_eq!(data.x(), vec![1.5, 2.0, 0.0]);
        assert_eq!(data.y(), vec![-2.0, 3.0, 1.0]);
        assert_eq!(data.x_range(), Some(0.0..=2.0));

        let empty: Vec<(f64, f64)> = Vec::new();
        assert_eq!(empty.x_range(), None);
    }
}

//! Polynomial feature expansion
//!
//! Maps each scalar input onto the functions of a [`Basis`], producing the design matrix
//! that the least-squares and regularized models are fitted on.
use std::ops::RangeInclusive;

use nalgebra::DMatrix;

use crate::{
    basis::Basis,
    error::{Error, Result},
    value::{CoordExt, Value},
};

/// Expands scalar inputs into polynomial features of degree `1..=degree`, plus an optional
/// constant column.
///
/// The basis is anchored to the x-range it was built from. Inputs outside that range, such as
/// held-out test points, are expanded with the same mapping so train and test features agree.
#[derive(Debug, Clone)]
pub struct PolynomialFeatures<B: Basis<T>, T: Value = f64> {
    basis: B,
    x_range: RangeInclusive<T>,
    degree: usize,
}
impl<B: Basis<T>, T: Value> PolynomialFeatures<B, T> {
    /// Creates a feature expansion anchored to the given x-range.
    pub fn from_range(x_range: RangeInclusive<T>, degree: usize) -> Self {
        let basis = B::from_range(x_range.clone());
        Self {
            basis,
            x_range,
            degree,
        }
    }

    /// Creates a feature expansion anchored to the x-range of a dataset.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the dataset is empty.
    pub fn from_data(data: &[(T, T)], degree: usize) -> Result<Self> {
        let x_range = data.x_range().ok_or(Error::NoData)?;
        Ok(Self::from_range(x_range, degree))
    }

    /// The basis the inputs are expanded into.
    pub fn basis(&self) -> &B {
        &self.basis
    }

    /// The x-range the basis is anchored to.
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.x_range.clone()
    }

    /// Highest degree of the expansion.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Number of feature columns produced by [`PolynomialFeatures::transform`].
    pub fn n_features(&self, include_bias: bool) -> usize {
        let k = self.basis.k(self.degree);
        if include_bias {
            k
        } else {
            k - 1
        }
    }

    /// Builds the design matrix for the given inputs, one row per input.
    ///
    /// With `include_bias`, column 0 holds the constant basis function. Without it, the
    /// constant is dropped and the intercept is left to the model.
    pub fn transform(&self, xs: impl IntoIterator<Item = T>, include_bias: bool) -> DMatrix<T> {
        let xs: Vec<T> = xs.into_iter().collect();
        let k = self.basis.k(self.degree);

        let mut m = DMatrix::zeros(xs.len(), k);
        for (row, x) in m.row_iter_mut().zip(xs) {
            let x = self.basis.normalize_x(x);
            self.basis.fill_matrix_row(0, x, row);
        }

        if include_bias {
            m
        } else {
            m.remove_column(0)
        }
    }

    /// Builds the design matrix for the x channel of a dataset.
    pub fn transform_data(&self, data: &[(T, T)], include_bias: bool) -> DMatrix<T> {
        self.transform(data.x_iter(), include_bias)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::basis::{LegendreBasis, MonomialBasis};

    #[test]
    fn monomial_features_without_bias() {
        let features = PolynomialFeatures::<MonomialBasis>::from_range(0.0..=2.0, 3);
        let m = features.transform([2.0], false);
        assert_eq!(m.shape(), (1, 3));
        assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![2.0, 4.0, 8.0]);
    }

    #[test]
    fn bias_column_is_constant() {
        let features = PolynomialFeatures::<LegendreBasis>::from_range(0.0..=1.0, 4);
        let m = features.transform([0.0, 0.25, 0.5, 1.0], true);
        assert_eq!(m.shape(), (4, 5));
        assert_eq!(features.n_features(true), 5);
        assert_eq!(features.n_features(false), 4);
        for i in 0..4 {
            assert_abs_diff_eq!(m[(i, 0)], 1.0);
        }
    }

    #[test]
    fn test_inputs_use_training_range() {
        let train = vec![(0.2, 0.0), (0.4, 0.0), (0.6, 0.0)];
        let features = PolynomialFeatures::<LegendreBasis>::from_data(&train, 1).unwrap();
        // 0.6 is the right edge of the training range, so P1 = 1 there and beyond it is > 1
        let m = features.transform([0.6, 0.8], false);
        assert_abs_diff_eq!(m[(0, 0)], 1.0, epsilon = 1e-12);
        assert!(m[(1, 0)] > 1.0);
    }

    #[test]
    fn empty_data_is_rejected() {
        let result = PolynomialFeatures::<LegendreBasis>::from_data(&[], 3);
        assert!(matches!(result, Err(Error::NoData)));
    }
}

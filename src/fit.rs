use std::ops::RangeInclusive;

use nalgebra::{DMatrix, DVector, SVD};

use crate::{
    basis::Basis,
    error::{Error, Result},
    features::PolynomialFeatures,
    statistics,
    value::{CoordExt, Value},
};

/// Ordinary least-squares fit in the monomial basis
///
/// Coefficients are in powers of x: 1, x, x², ..., xⁿ.
/// Expect the fit to degrade well before degree 30.
pub type MonomialFit<T = f64> = PolynomialFit<crate::basis::MonomialBasis<T>, T>;

/// Ordinary least-squares fit in the Legendre basis
///
/// Coefficients are on the Legendre polynomials over the training x-range mapped to [-1, 1].
/// This is the basis to use for high-degree sweeps.
pub type LegendreFit<T = f64> = PolynomialFit<crate::basis::LegendreBasis<T>, T>;

/// Solves the least-squares system `m * x = b` using SVD.
///
/// Singular values below `machine_epsilon * max(size) * sigma_max` are treated as zero,
/// so rank-deficient systems resolve to the minimum-norm solution instead of failing.
///
/// # Errors
/// Returns [`Error::Algebra`] if the decomposition cannot be solved or yields NaN.
pub(crate) fn solve_matrix<T: Value>(m: DMatrix<T>, b: &DVector<T>) -> Result<Vec<T>> {
    let size = m.shape();

    // Calculate the singular value decomposition of the matrix
    let decomp = SVD::new_unordered(m, true, true);

    // Calculate epsilon value
    // ~= machine_epsilon * max(size) * max_singular
    let machine_epsilon = T::epsilon();
    let max_size = size.0.max(size.1);
    let sigma_max = decomp.singular_values.max();
    let epsilon = machine_epsilon * T::try_cast(max_size)? * sigma_max;

    // Solve for X in `SVD * X = b`
    let big_x = decomp.solve(b, epsilon).map_err(Error::Algebra)?;
    let coefficients: Vec<_> = big_x.data.into();

    // Make sure the coefficients are valid
    if coefficients.iter().any(|c| c.is_nan()) {
        return Err(Error::Algebra("NaN in coefficients"));
    }

    Ok(coefficients)
}

/// A polynomial fitted to data by ordinary least squares.
///
/// The design matrix includes the constant basis function, so the intercept is the first
/// coefficient. Inputs are expanded with the basis anchored to the training x-range.
#[derive(Debug, Clone)]
pub struct PolynomialFit<B: Basis<T>, T: Value = f64> {
    features: PolynomialFeatures<B, T>,
    coefficients: Vec<T>,
}
impl<B: Basis<T>, T: Value> PolynomialFit<B, T> {
    /// Creates a new least-squares fit for the given data and degree.
    ///
    /// # Errors
    /// Returns an [`Error`] in the following cases:
    /// - `Error::NoData`: `data` is empty.
    /// - `Error::DegreeTooHigh`: `degree >= data.len()`.
    /// - `Error::Algebra`: the linear system could not be solved.
    /// - `Error::CastFailed`: a numeric value could not be cast to the target type.
    ///
    /// # Example
    /// ```
    /// # use polysweep::MonomialFit;
    /// let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
    /// let fit = MonomialFit::new(data, 2).unwrap();
    /// println!("Coefficients: {:?}", fit.coefficients());
    /// ```
    pub fn new(data: &[(T, T)], degree: usize) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::NoData);
        } else if degree >= data.len() {
            return Err(Error::DegreeTooHigh(degree));
        }

        let features = PolynomialFeatures::from_data(data, degree)?;
        let m = features.transform_data(data, true);
        let b = DVector::from_iterator(data.len(), data.y_iter());

        let coefficients = solve_matrix(m, &b)?;
        Ok(Self {
            features,
            coefficients,
        })
    }

    /// Degree of the fitted polynomial.
    pub fn degree(&self) -> usize {
        self.features.degree()
    }

    /// Coefficients on the basis functions, intercept first.
    pub fn coefficients(&self) -> &[T] {
        &self.coefficients
    }

    /// The x-range of the training data.
    pub fn x_range(&self) -> RangeInclusive<T> {
        self.features.x_range()
    }

    /// The feature expansion the fit was trained with.
    pub fn features(&self) -> &PolynomialFeatures<B, T> {
        &self.features
    }

    /// Evaluates the fit at each input.
    ///
    /// Inputs outside the training range are extrapolated.
    pub fn predict(&self, xs: impl IntoIterator<Item = T>) -> Vec<T> {
        let m = self.features.transform(xs, true);
        let w = DVector::from_column_slice(&self.coefficients);
        let y = m * w;
        y.data.into()
    }

    /// Evaluates the fit at each input, returning `(x, y)` pairs.
    pub fn solve(&self, xs: impl IntoIterator<Item = T>) -> Vec<(T, T)> {
        let xs: Vec<T> = xs.into_iter().collect();
        let ys = self.predict(xs.iter().copied());
        xs.into_iter().zip(ys).collect()
    }

    /// Root mean squared error of the fit against a dataset.
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if the dataset is empty.
    pub fn rmse(&self, data: &[(T, T)]) -> Result<T> {
        let y_fit = self.predict(data.x_iter());
        statistics::rmse(&data.y(), &y_fit)
    }

    /// R² of the fit against a dataset.
    pub fn r_squared(&self, data: &[(T, T)]) -> T {
        let y_fit = self.predict(data.x_iter());
        statistics::r_squared(data.y_iter(), y_fit.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::value::linspace;

    #[test]
    fn test_fit_new_and_coefficients() {
        let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
        let fit = MonomialFit::new(data, 2).unwrap();
        let coefs = fit.coefficients();
        assert_eq!(coefs.len(), 3);

        // y = 1 + x + x²
        assert_abs_diff_eq!(coefs[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coefs[1], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(coefs[2], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.rmse(data).unwrap(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(fit.r_squared(data), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bases_agree_on_predictions() {
        let data: Vec<(f64, f64)> = linspace(0.0, 1.0, 21)
            .into_iter()
            .map(|x| (x, 3.0 * x * x * x - x + 0.5))
            .collect();
        let mono = MonomialFit::new(&data, 3).unwrap();
        let legendre = LegendreFit::new(&data, 3).unwrap();

        let xs = [0.05, 0.5, 0.95, 1.2];
        for (a, b) in mono.predict(xs).iter().zip(legendre.predict(xs)) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_fit_errors() {
        let empty: &[(f64, f64)] = &[];
        assert!(matches!(LegendreFit::new(empty, 1), Err(Error::NoData)));

        let data = &[(0.0, 1.0), (1.0, 3.0), (2.0, 7.0)];
        assert!(matches!(
            LegendreFit::new(data, 3),
            Err(Error::DegreeTooHigh(3))
        ));
    }

    #[test]
    fn test_high_degree_is_finite() {
        let data: Vec<(f64, f64)> = linspace(0.0, 1.0, 70)
            .into_iter()
            .map(|x| (x, (std::f64::consts::TAU * x).sin()))
            .collect();
        let fit = LegendreFit::new(&data, 30).unwrap();
        assert_eq!(fit.degree(), 30);
        assert!(fit.predict([0.0, 0.5, 1.0]).iter().all(|y| y.is_finite()));
        assert!(fit.rmse(&data).unwrap() < 1e-4);
    }

    #[test]
    fn test_solve_pairs_inputs() {
        let data = &[(0.0, 0.0), (1.0, 2.0), (2.0, 4.0)];
        let fit = LegendreFit::new(data, 1).unwrap();
        let points = fit.solve([3.0]);
        assert_eq!(points.len(), 1);
        assert_abs_diff_eq!(points[0].0, 3.0);
        assert_abs_diff_eq!(points[0].1, 6.0, epsilon = 1e-9);
    }
}

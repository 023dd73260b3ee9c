//! Penalized linear models over polynomial features
//!
//! Both models fit an unpenalized intercept plus penalized weights on a design matrix
//! without a constant column:
//!
//! - [`LassoModel`]: L1 penalty, `1/(2n)·‖y - Xw - b‖² + α‖w‖₁`, solved by coordinate descent in
//!   `linfa-elasticnet`.
//! - [`RidgeModel`]: L2 penalty, `‖y - Xw - b‖² + α‖w‖²`, solved in closed form on centered data.
//!
//! The [`Regularized`] trait lets the sweeps in [`crate::sweep`] treat them interchangeably.
use linfa::{
    traits::{Fit, Predict},
    DatasetBase,
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

use crate::{
    error::{Error, Result},
    fit::solve_matrix,
    statistics,
    value::Value,
};

/// Iteration limits for iterative solvers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Maximum number of coordinate descent passes
    pub max_iterations: u32,

    /// Convergence tolerance on the duality gap
    pub tolerance: f64,
}
impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-4,
        }
    }
}

/// A linear model with a penalty on its weights
pub trait Regularized: Sized {
    /// Display name of the model
    const NAME: &'static str;

    /// Title of the train/test penalty sweep
    const TITLE: &'static str;

    /// Fits the model to a design matrix (no constant column) and targets with penalty `alpha`.
    ///
    /// # Errors
    /// - [`Error::InvalidPenalty`] if `alpha` is negative or not finite.
    /// - [`Error::LengthMismatch`] if the number of rows and targets differ.
    /// - [`Error::NoData`] if there are no rows.
    /// - Solver errors from the underlying fit.
    fn fit(features: &DMatrix<f64>, y: &[f64], alpha: f64, options: &SolverOptions)
        -> Result<Self>;

    /// Predicts targets for each row of a design matrix.
    fn predict(&self, features: &DMatrix<f64>) -> Vec<f64>;

    /// Fitted weights, one per feature column.
    fn coefficients(&self) -> Vec<f64>;

    /// Fitted intercept.
    fn intercept(&self) -> f64;
}

/// Checks the shared preconditions of a penalized fit.
fn check_inputs(features: &DMatrix<f64>, y: &[f64], alpha: f64) -> Result<()> {
    if !alpha.is_finite() || alpha < 0.0 {
        return Err(Error::InvalidPenalty(alpha));
    }
    if features.nrows() != y.len() {
        return Err(Error::LengthMismatch {
            y: y.len(),
            y_fit: features.nrows(),
        });
    }
    if y.is_empty() {
        return Err(Error::NoData);
    }
    Ok(())
}

pub(crate) fn to_array(features: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((features.nrows(), features.ncols()), |(i, j)| {
        features[(i, j)]
    })
}

/// Centers the columns of `features` and the targets, returning the means that were removed.
fn center(features: &DMatrix<f64>, y: &[f64]) -> (DMatrix<f64>, DVector<f64>, Vec<f64>, f64) {
    let x_means: Vec<f64> = features
        .column_iter()
        .map(|c| statistics::mean(c.iter().copied()))
        .collect();
    let y_mean = statistics::mean(y.iter().copied());

    let xc = DMatrix::from_fn(features.nrows(), features.ncols(), |i, j| {
        features[(i, j)] - x_means[j]
    });
    let yc = DVector::from_iterator(y.len(), y.iter().map(|v| v - y_mean));
    (xc, yc, x_means, y_mean)
}

/// Lasso (L1) regression, fitted with `linfa-elasticnet` at `l1_ratio = 1`
#[derive(Debug, Clone)]
pub struct LassoModel {
    model: linfa_elasticnet::ElasticNet<f64>,
}
impl Regularized for LassoModel {
    const NAME: &'static str = "Lasso";
    const TITLE: &'static str = "Lasso Regression (L1)";

    fn fit(
        features: &DMatrix<f64>,
        y: &[f64],
        alpha: f64,
        options: &SolverOptions,
    ) -> Result<Self> {
        check_inputs(features, y, alpha)?;

        let dataset = DatasetBase::new(to_array(features), Array1::from(y.to_vec()));
        let model = linfa_elasticnet::ElasticNet::params()
            .penalty(alpha)
            .l1_ratio(1.0)
            .with_intercept(true)
            .max_iterations(options.max_iterations)
            .tolerance(options.tolerance)
            .fit(&dataset)?;

        tracing::trace!(
            alpha,
            steps = model.n_steps(),
            gap = model.duality_gap(),
            "lasso converged"
        );
        Ok(Self { model })
    }

    fn predict(&self, features: &DMatrix<f64>) -> Vec<f64> {
        let y: Array1<f64> = self.model.predict(&to_array(features));
        y.to_vec()
    }

    fn coefficients(&self) -> Vec<f64> {
        self.model.hyperplane().to_vec()
    }

    fn intercept(&self) -> f64 {
        self.model.intercept()
    }
}

/// Ridge (L2) regression
///
/// Solves `(XcᵀXc + αI)w = Xcᵀyc` on centered data by SVD. The intercept is recovered from the
/// means, so it is never penalized. With `α = 0` this is ordinary least squares.
#[derive(Debug, Clone)]
pub struct RidgeModel {
    weights: Vec<f64>,
    intercept: f64,
}
impl Regularized for RidgeModel {
    const NAME: &'static str = "Ridge";
    const TITLE: &'static str = "Ridge Regression";

    fn fit(
        features: &DMatrix<f64>,
        y: &[f64],
        alpha: f64,
        _options: &SolverOptions,
    ) -> Result<Self> {
        check_inputs(features, y, alpha)?;

        let (xc, yc, x_means, y_mean) = center(features, y);
        let k = xc.ncols();
        let xtx = xc.transpose() * &xc + DMatrix::<f64>::identity(k, k) * alpha;
        let xty = xc.transpose() * yc;

        let weights = solve_matrix(xtx, &xty)?;
        let intercept = y_mean
            - weights
                .iter()
                .zip(&x_means)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(Self { weights, intercept })
    }

    fn predict(&self, features: &DMatrix<f64>) -> Vec<f64> {
        let w = DVector::from_column_slice(&self.weights);
        (features * w).iter().map(|v| v + self.intercept).collect()
    }

    fn coefficients(&self) -> Vec<f64> {
        self.weights.clone()
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Builds a descending, log-spaced grid of Lasso penalties.
///
/// The grid starts at the smallest penalty for which every weight is zero,
/// `α_max = max|Xcᵀyc| / n`, and ends at `α_max · ratio`.
/// If the targets carry no signal (`α_max = 0`), the grid collapses to `f64::EPSILON`.
///
/// # Errors
/// Returns [`Error::NoData`] or [`Error::LengthMismatch`] for unusable inputs, and
/// [`Error::Config`] if `ratio` is not in (0, 1].
pub fn lasso_alpha_grid(
    features: &DMatrix<f64>,
    y: &[f64],
    n_alphas: usize,
    ratio: f64,
) -> Result<Vec<f64>> {
    check_inputs(features, y, 0.0)?;
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(Error::Config(format!(
            "alpha ratio must be in (0, 1], got {ratio}"
        )));
    }

    let (xc, yc, _, _) = center(features, y);
    let n = f64::from_positive_int(y.len());
    let correlation = xc.transpose() * yc;
    let alpha_max = correlation.iter().fold(0.0_f64, |acc, c| acc.max(c.abs())) / n;
    let alpha_max = if alpha_max > 0.0 {
        alpha_max
    } else {
        f64::EPSILON
    };

    let grid = match n_alphas {
        0 => Vec::new(),
        1 => vec![alpha_max],
        _ => {
            let (hi, lo) = (alpha_max.ln(), (alpha_max * ratio).ln());
            crate::value::linspace(hi, lo, n_alphas)
                .into_iter()
                .map(f64::exp)
                .collect()
        }
    };
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{basis::LegendreBasis, features::PolynomialFeatures, fit::LegendreFit};

    fn wiggly_data() -> Vec<(f64, f64)> {
        crate::value::linspace(0.0, 1.0, 40)
            .into_iter()
            .enumerate()
            .map(|(i, x)| {
                let jitter = if i % 3 == 0 { 0.05 } else { -0.02 };
                (x, (std::f64::consts::TAU * x).sin() + jitter)
            })
            .collect()
    }

    fn design(data: &[(f64, f64)], degree: usize) -> (DMatrix<f64>, Vec<f64>) {
        let features = PolynomialFeatures::<LegendreBasis>::from_data(data, degree).unwrap();
        let x = features.transform_data(data, false);
        let y = data.iter().map(|(_, y)| *y).collect();
        (x, y)
    }

    fn norm(v: &[f64]) -> f64 {
        v.iter().map(|w| w * w).sum::<f64>().sqrt()
    }

    #[test]
    fn ridge_without_penalty_is_ols() {
        let data = wiggly_data();
        let (x, y) = design(&data, 5);
        let ridge = RidgeModel::fit(&x, &y, 0.0, &SolverOptions::default()).unwrap();
        let ols = LegendreFit::new(&data, 5).unwrap();

        let expected = ols.predict(data.iter().map(|(x, _)| *x));
        for (a, b) in ridge.predict(&x).iter().zip(expected) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-8);
        }
    }

    #[test]
    fn ridge_penalty_shrinks_weights() {
        let data = wiggly_data();
        let (x, y) = design(&data, 8);
        let options = SolverOptions::default();

        let norms: Vec<f64> = [0.0, 1.0, 10.0, 100.0]
            .iter()
            .map(|&alpha| norm(&RidgeModel::fit(&x, &y, alpha, &options).unwrap().coefficients()))
            .collect();
        for pair in norms.windows(2) {
            assert!(pair[1] < pair[0], "{norms:?}");
        }
    }

    #[test]
    fn lasso_at_alpha_max_is_constant() {
        let data = wiggly_data();
        let (x, y) = design(&data, 10);
        let grid = lasso_alpha_grid(&x, &y, 10, 1e-3).unwrap();

        let lasso = LassoModel::fit(&x, &y, grid[0] * 1.01, &SolverOptions::default()).unwrap();
        let y_mean = statistics::mean(y.iter().copied());
        for w in lasso.coefficients() {
            assert_abs_diff_eq!(w, 0.0, epsilon = 1e-12);
        }
        for p in lasso.predict(&x) {
            assert_abs_diff_eq!(p, y_mean, epsilon = 1e-9);
        }
    }

    #[test]
    fn lasso_small_penalty_fits_better() {
        let data = wiggly_data();
        let (x, y) = design(&data, 10);
        let options = SolverOptions {
            max_iterations: 10_000,
            tolerance: 1e-6,
        };
        let grid = lasso_alpha_grid(&x, &y, 100, 1e-3).unwrap();

        let loose = LassoModel::fit(&x, &y, grid[0], &options).unwrap();
        let tight = LassoModel::fit(&x, &y, grid[99], &options).unwrap();
        let loose_rmse = statistics::rmse(&y, &loose.predict(&x)).unwrap();
        let tight_rmse = statistics::rmse(&y, &tight.predict(&x)).unwrap();
        assert!(tight_rmse < loose_rmse);
    }

    #[test]
    fn alpha_grid_is_descending_log_spaced() {
        let data = wiggly_data();
        let (x, y) = design(&data, 10);
        let grid = lasso_alpha_grid(&x, &y, 100, 1e-3).unwrap();

        assert_eq!(grid.len(), 100);
        assert!(grid.windows(2).all(|w| w[1] < w[0]));
        assert_abs_diff_eq!(grid[99] / grid[0], 1e-3, epsilon = 1e-9);
        let step = grid[1] / grid[0];
        assert_abs_diff_eq!(grid[51] / grid[50], step, epsilon = 1e-9);
    }

    #[test]
    fn invalid_penalty_is_rejected() {
        let data = wiggly_data();
        let (x, y) = design(&data, 3);
        let options = SolverOptions::default();
        for alpha in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                RidgeModel::fit(&x, &y, alpha, &options),
                Err(Error::InvalidPenalty(_))
            ));
            assert!(matches!(
                LassoModel::fit(&x, &y, alpha, &options),
                Err(Error::InvalidPenalty(_))
            ));
        }
    }

    #[test]
    fn mismatched_targets_are_rejected() {
        let data = wiggly_data();
        let (x, mut y) = design(&data, 3);
        y.pop();
        assert!(matches!(
            RidgeModel::fit(&x, &y, 1.0, &SolverOptions::default()),
            Err(Error::LengthMismatch { .. })
        ));
    }
}

//! Error sweeps over model complexity and penalty strength
//!
//! - [`degree_sweep`]: OLS fits of increasing degree, scored on the training and test sets.
//! - [`penalty_sweep`]: one penalized fit per penalty, scored on the training and test sets.
//! - [`cross_validated_sweep`]: k-fold cross-validated error of a penalized model per penalty.
//!
//! Features are always built from a basis anchored to the training x-range, and the same
//! expansion is applied to the held-out points.
use linfa::DatasetBase;
use nalgebra::DMatrix;
use ndarray::{Array1, ArrayBase, Data, Ix2};
use tracing::{debug, info, warn};

use crate::{
    basis::Basis,
    data::TrainTestSplit,
    error::{Error, Result},
    features::PolynomialFeatures,
    fit::PolynomialFit,
    regularized::{to_array, Regularized, SolverOptions},
    report::{CvRecord, CvTable, ErrorTable, ParameterScale},
    statistics,
    value::{CoordExt, Value},
};

/// Title of the degree sweep table
pub const DEGREE_TITLE: &str = "RMSE vs poly degree (model complexity)";

fn to_matrix<S: Data<Elem = f64>>(records: &ArrayBase<S, Ix2>) -> DMatrix<f64> {
    DMatrix::from_fn(records.nrows(), records.ncols(), |i, j| records[[i, j]])
}

/// Fits OLS polynomials of degree `1..=max_degree` on the training set and records the RMSE on
/// both sides of the split.
///
/// A degree that cannot be fitted (for example one that is not below the number of training
/// points) is logged and skipped.
///
/// # Errors
/// Returns [`Error::NoData`] if either side of the split is empty.
pub fn degree_sweep<B: Basis<f64>>(split: &TrainTestSplit, max_degree: usize) -> Result<ErrorTable> {
    if split.train.is_empty() || split.test.is_empty() {
        return Err(Error::NoData);
    }

    let mut table = ErrorTable::new(DEGREE_TITLE, "poly degree", ParameterScale::Linear);
    for degree in 1..=max_degree {
        let fit = match PolynomialFit::<B>::new(&split.train, degree) {
            Ok(fit) => fit,
            Err(e) => {
                warn!(degree, error = %e, "skipping degree");
                continue;
            }
        };

        let train_error = fit.rmse(&split.train)?;
        let test_error = fit.rmse(&split.test)?;
        debug!(degree, train_error, test_error, "ols fit");
        table.push(f64::from_positive_int(degree), train_error, test_error);
    }

    Ok(table)
}

/// Fits a penalized model on degree `1..=degree` features of the training set once per penalty,
/// recording the RMSE on both sides of the split.
///
/// # Errors
/// - [`Error::NoData`] if either side of the split is empty.
/// - [`Error::NoFeatures`] if `degree` is 0.
/// - Any error from fitting the model, such as [`Error::InvalidPenalty`].
pub fn penalty_sweep<M: Regularized, B: Basis<f64>>(
    split: &TrainTestSplit,
    degree: usize,
    alphas: &[f64],
    options: &SolverOptions,
) -> Result<ErrorTable> {
    if split.train.is_empty() || split.test.is_empty() {
        return Err(Error::NoData);
    } else if degree == 0 {
        return Err(Error::NoFeatures);
    }

    let features = PolynomialFeatures::<B>::from_data(&split.train, degree)?;
    let x_train = features.transform_data(&split.train, false);
    let x_test = features.transform_data(&split.test, false);
    let y_train = split.train.y();
    let y_test = split.test.y();

    let mut table = ErrorTable::new(M::TITLE, "alpha", ParameterScale::NegativeLog);
    for &alpha in alphas {
        let model = M::fit(&x_train, &y_train, alpha, options)?;
        let train_error = statistics::rmse(&y_train, &model.predict(&x_train))?;
        let test_error = statistics::rmse(&y_test, &model.predict(&x_test))?;
        debug!(model = M::NAME, alpha, train_error, test_error, "penalized fit");
        table.push(alpha, train_error, test_error);
    }

    Ok(table)
}

/// One cross-validation split: `(x_fit, y_fit, x_valid, y_valid)`
type FoldPartition = (DMatrix<f64>, Vec<f64>, DMatrix<f64>, Vec<f64>);

/// Cuts the rows into `folds` contiguous validation folds of `n / folds` rows each.
/// Rows past the last full fold land in every training side.
fn fold_partitions(x: &DMatrix<f64>, y: &[f64], folds: usize) -> Vec<FoldPartition> {
    let dataset = DatasetBase::new(to_array(x), Array1::from(y.to_vec()));
    dataset
        .fold(folds)
        .into_iter()
        .map(|(fit_set, valid_set)| {
            (
                to_matrix(fit_set.records()),
                fit_set.targets().iter().copied().collect(),
                to_matrix(valid_set.records()),
                valid_set.targets().iter().copied().collect(),
            )
        })
        .collect()
}

/// Cross-validates a penalized model on degree `1..=degree` features of the training set.
///
/// The training set is cut into `folds` contiguous folds in its current order; each fold is held
/// out once while the model is fitted on the rest. Leftover points that do not fill a fold are
/// always trained on. The split in [`crate::data::train_test_split`] leaves the training set
/// shuffled, so the folds are random.
///
/// # Errors
/// - [`Error::InvalidFolds`] if `folds < 2` or `folds` exceeds the number of training points.
/// - [`Error::NoFeatures`] if `degree` is 0.
/// - Any error from fitting the model, such as [`Error::InvalidPenalty`].
pub fn cross_validated_sweep<M: Regularized, B: Basis<f64>>(
    train: &[(f64, f64)],
    degree: usize,
    alphas: &[f64],
    folds: usize,
    options: &SolverOptions,
) -> Result<CvTable> {
    let n = train.len();
    if folds < 2 || folds > n {
        return Err(Error::InvalidFolds { folds, n });
    } else if degree == 0 {
        return Err(Error::NoFeatures);
    }

    let features = PolynomialFeatures::<B>::from_data(train, degree)?;
    let x = features.transform_data(train, false);
    let partitions = fold_partitions(&x, &train.y(), folds);

    let mut table = CvTable::new(format!("{} CV", M::NAME), folds);
    for &alpha in alphas {
        let fold_rmse = partitions
            .iter()
            .map(|(x_fit, y_fit, x_valid, y_valid)| {
                let model = M::fit(x_fit, y_fit, alpha, options)?;
                statistics::rmse(y_valid, &model.predict(x_valid))
            })
            .collect::<Result<Vec<_>>>()?;

        let mean_rmse = statistics::mean(fold_rmse.iter().copied());
        debug!(model = M::NAME, alpha, mean_rmse, "cross-validated");
        table.records.push(CvRecord {
            alpha,
            mean_rmse,
            fold_rmse,
        });
    }

    if let Some(best) = table.selected() {
        info!(
            model = M::NAME,
            alpha = best.alpha,
            mean_rmse = best.mean_rmse,
            "selected penalty"
        );
    }

    Ok(table)
}

//! End-to-end bias/variance experiment
//!
//! Runs every stage on one sample, in order:
//! 1. Generate a noisy sine and split it into training and test sets
//! 2. OLS error by degree
//! 3. Lasso error by penalty, then cross-validated
//! 4. Ridge error by penalty, then cross-validated
//!
//! ```
//! # use polysweep::{config::SweepConfig, experiment::Experiment};
//! let config = SweepConfig {
//!     max_degree: 5,
//!     n_alphas: 5,
//!     seed: Some(42),
//!     ..SweepConfig::default()
//! };
//! let report = Experiment::new(config).run().unwrap();
//! assert_eq!(report.degree.len(), 5);
//! assert_eq!(report.lasso_cv.records.len(), 5);
//! ```
use tracing::{info, info_span};

use crate::{
    basis::{Basis, BasisKind, LegendreBasis, MonomialBasis},
    config::SweepConfig,
    data::{train_test_split, SampleSet},
    error::Result,
    features::PolynomialFeatures,
    regularized::{lasso_alpha_grid, LassoModel, RidgeModel},
    report::ExperimentReport,
    sweep::{cross_validated_sweep, degree_sweep, penalty_sweep},
    transforms::Strength,
    value::CoordExt,
};

/// One configured run of the experiment
#[derive(Debug, Clone)]
pub struct Experiment {
    config: SweepConfig,
}
impl Experiment {
    /// Creates an experiment from a configuration. It is validated when run.
    #[must_use]
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// The configuration this experiment runs with.
    #[must_use]
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Runs every stage and collects the tables.
    ///
    /// The noise is drawn with `seed` and the split with `seed + 1`, so a seeded run is
    /// reproducible end to end.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::Config`] if the configuration is invalid, or the first
    /// error raised by a stage.
    pub fn run(&self) -> Result<ExperimentReport> {
        self.config.validate()?;
        match self.config.basis {
            BasisKind::Monomial => self.run_with::<MonomialBasis>(),
            BasisKind::Legendre => self.run_with::<LegendreBasis>(),
        }
    }

    fn run_with<B: Basis<f64>>(&self) -> Result<ExperimentReport> {
        let config = &self.config;
        let options = config.solver_options();

        let split = {
            let _span = info_span!("sample", n = config.n_samples, noise = config.noise).entered();
            let sample = SampleSet::noisy_sine(
                config.n_samples,
                Strength::Absolute(config.noise),
                config.seed,
            )?;
            let split = train_test_split(
                sample.points(),
                config.test_fraction,
                config.seed.map(|s| s.wrapping_add(1)),
            )?;
            info!(train = split.train.len(), test = split.test.len(), "split sample");
            split
        };

        let degree = {
            let _span = info_span!("ols", max_degree = config.max_degree).entered();
            let table = degree_sweep::<B>(&split, config.max_degree)?;
            if let Some(best) = table.best_test() {
                info!(
                    degree = best.parameter,
                    test_error = best.test_error,
                    "best test error"
                );
            }
            table
        };

        let (lasso, lasso_cv) = {
            let _span = info_span!("lasso", degree = config.regularized_degree).entered();
            let features = PolynomialFeatures::<B>::from_data(&split.train, config.regularized_degree)?;
            let alphas = lasso_alpha_grid(
                &features.transform_data(&split.train, false),
                &split.train.y(),
                config.n_alphas,
                config.alpha_ratio,
            )?;
            info!(
                n_alphas = alphas.len(),
                alpha_max = alphas.first().copied().unwrap_or_default(),
                "built penalty grid"
            );

            let table = penalty_sweep::<LassoModel, B>(
                &split,
                config.regularized_degree,
                &alphas,
                &options,
            )?;
            let cv = cross_validated_sweep::<LassoModel, B>(
                &split.train,
                config.regularized_degree,
                &alphas,
                config.folds,
                &options,
            )?;
            (table, cv)
        };

        let (ridge, ridge_cv) = {
            let _span = info_span!("ridge", degree = config.regularized_degree).entered();
            let table = penalty_sweep::<RidgeModel, B>(
                &split,
                config.regularized_degree,
                &config.ridge_alphas,
                &options,
            )?;
            let cv = cross_validated_sweep::<RidgeModel, B>(
                &split.train,
                config.regularized_degree,
                &config.ridge_cv_alphas,
                config.folds,
                &options,
            )?;
            (table, cv)
        };

        Ok(ExperimentReport {
            config: config.clone(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            degree,
            lasso,
            lasso_cv,
            ridge,
            ridge_cv,
        })
    }
}

//! Experiment configuration
//!
//! Every field has a default, so a JSON file only needs the values it changes:
//!
//! ```json
//! { "seed": 42, "basis": "monomial", "max_degree": 20 }
//! ```
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    basis::BasisKind,
    error::{Error, Result},
    regularized::SolverOptions,
};

/// Parameters of one bias/variance experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Number of sample points on `[0, 1]`
    pub n_samples: usize,

    /// Standard deviation of the Gaussian noise added to the sine
    pub noise: f64,

    /// Proportion of the sample held out for testing
    pub test_fraction: f64,

    /// Highest degree of the OLS sweep, which starts at 1
    pub max_degree: usize,

    /// Degree of the features the penalized models are fitted on
    pub regularized_degree: usize,

    /// Number of cross-validation folds
    pub folds: usize,

    /// Number of penalties in the Lasso grid
    pub n_alphas: usize,

    /// Ratio of the smallest to the largest penalty in the Lasso grid
    pub alpha_ratio: f64,

    /// Penalties for the Ridge train/test sweep
    pub ridge_alphas: Vec<f64>,

    /// Penalties for the Ridge cross-validation sweep
    pub ridge_cv_alphas: Vec<f64>,

    /// Coordinate descent pass limit for Lasso
    pub lasso_max_iterations: u32,

    /// Coordinate descent tolerance for Lasso
    pub lasso_tolerance: f64,

    /// Polynomial basis used for feature expansion
    pub basis: BasisKind,

    /// Seed for the noise and the split; unseeded runs differ every time
    pub seed: Option<u64>,

    /// Directory the charts are written to
    pub output_dir: PathBuf,
}
impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            n_samples: 101,
            noise: 0.1,
            test_fraction: 0.3,
            max_degree: 30,
            regularized_degree: 10,
            folds: 10,
            n_alphas: 100,
            alpha_ratio: 1e-3,
            ridge_alphas: vec![0.1, 1.0, 10.0],
            ridge_cv_alphas: vec![0.0, 1.0, 10.0, 100.0],
            lasso_max_iterations: 1000,
            lasso_tolerance: 1e-4,
            basis: BasisKind::default(),
            seed: None,
            output_dir: PathBuf::from("target").join("plot_output"),
        }
    }
}
impl SweepConfig {
    /// Reads a configuration from a JSON file and validates it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON for this type,
    /// or fails [`SweepConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Options for the Lasso solver.
    #[must_use]
    pub fn solver_options(&self) -> SolverOptions {
        SolverOptions {
            max_iterations: self.lasso_max_iterations,
            tolerance: self.lasso_tolerance,
        }
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn fail(message: String) -> Result<()> {
            Err(Error::Config(message))
        }

        if self.n_samples < 3 {
            return fail(format!("n_samples must be at least 3, got {}", self.n_samples));
        }
        if !self.noise.is_finite() || self.noise < 0.0 {
            return fail(format!("noise must be finite and >= 0, got {}", self.noise));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return fail(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            ));
        }
        if self.max_degree == 0 {
            return fail("max_degree must be at least 1".to_string());
        }
        if self.regularized_degree == 0 {
            return fail("regularized_degree must be at least 1".to_string());
        }
        if self.folds < 2 {
            return fail(format!("folds must be at least 2, got {}", self.folds));
        }
        if self.n_alphas == 0 {
            return fail("n_alphas must be at least 1".to_string());
        }
        if !(self.alpha_ratio > 0.0 && self.alpha_ratio <= 1.0) {
            return fail(format!(
                "alpha_ratio must be in (0, 1], got {}",
                self.alpha_ratio
            ));
        }
        for (name, alphas) in [
            ("ridge_alphas", &self.ridge_alphas),
            ("ridge_cv_alphas", &self.ridge_cv_alphas),
        ] {
            if alphas.is_empty() {
                return fail(format!("{name} must not be empty"));
            }
            if let Some(bad) = alphas.iter().find(|a| !a.is_finite() || **a < 0.0) {
                return fail(format!("{name} must be finite and >= 0, got {bad}"));
            }
        }
        if self.lasso_max_iterations == 0 {
            return fail("lasso_max_iterations must be at least 1".to_string());
        }
        if !(self.lasso_tolerance > 0.0 && self.lasso_tolerance.is_finite()) {
            return fail(format!(
                "lasso_tolerance must be finite and > 0, got {}",
                self.lasso_tolerance
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SweepConfig::default();
        config.validate().unwrap();
        assert_eq!(config.n_samples, 101);
        assert_eq!(config.max_degree, 30);
        assert_eq!(config.basis, BasisKind::Legendre);
        assert_eq!(config.solver_options(), SolverOptions::default());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: SweepConfig =
            serde_json::from_str(r#"{ "seed": 42, "basis": "monomial" }"#).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.basis, BasisKind::Monomial);
        assert_eq!(config.folds, 10);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_str::<SweepConfig>(r#"{ "degree": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            SweepConfig {
                test_fraction: 1.0,
                ..SweepConfig::default()
            },
            SweepConfig {
                folds: 1,
                ..SweepConfig::default()
            },
            SweepConfig {
                noise: -0.1,
                ..SweepConfig::default()
            },
            SweepConfig {
                ridge_cv_alphas: vec![1.0, f64::NAN],
                ..SweepConfig::default()
            },
            SweepConfig {
                alpha_ratio: 0.0,
                ..SweepConfig::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(Error::Config(_))));
        }
    }

    #[test]
    fn reads_json_file() {
        let dir = std::env::temp_dir().join("polysweep_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(&path, r#"{ "max_degree": 12, "folds": 5 }"#).unwrap();

        let config = SweepConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_degree, 12);
        assert_eq!(config.folds, 5);

        std::fs::write(&path, r#"{ "folds": 0 }"#).unwrap();
        assert!(matches!(
            SweepConfig::from_json_file(&path),
            Err(Error::Config(_))
        ));
    }
}

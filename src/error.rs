//! Error types for regression sweeps
//!
//! This module defines the common errors encountered when generating data,
//! fitting models or running an experiment, along with a convenient `Result` alias.

/// Errors that can occur while fitting or evaluating models.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cannot fit or score because there is no data.
    #[error("No data available")]
    NoData,

    /// Two sequences that must be paired have different lengths.
    #[error("Length mismatch: {y} observed values but {y_fit} predicted values")]
    LengthMismatch {
        /// Number of observed values
        y: usize,
        /// Number of predicted values
        y_fit: usize,
    },

    /// The requested polynomial degree is too high for the dataset.
    ///
    /// The degree must be less than the number of data points.
    #[error("Polynomial degree `{0}` is too high for the dataset")]
    DegreeTooHigh(usize),

    /// A penalized model was asked to fit a degree 0 expansion, which has no features.
    #[error("No polynomial features to fit: degree must be at least 1")]
    NoFeatures,

    /// Failed to solve the algebraic system during fitting.
    ///
    /// Contains a static string describing the solver error.
    #[error("Failed to solve: {0}")]
    Algebra(&'static str),

    /// A numeric value could not be cast to the target type.
    #[error("Failed to cast value to target type")]
    CastFailed,

    /// The held-out proportion of a train/test split is unusable.
    #[error("Cannot split {n} points with a test fraction of {fraction}")]
    InvalidSplit {
        /// Requested test fraction
        fraction: f64,
        /// Number of points available
        n: usize,
    },

    /// The number of cross-validation folds is unusable for the dataset.
    #[error("Cannot run {folds}-fold cross-validation on {n} points")]
    InvalidFolds {
        /// Requested number of folds
        folds: usize,
        /// Number of points available
        n: usize,
    },

    /// A penalty strength was negative or not finite.
    #[error("Invalid penalty strength `{0}`")]
    InvalidPenalty(f64),

    /// A noise distribution could not be constructed.
    #[error("Invalid noise parameters: {0}")]
    InvalidNoise(String),

    /// The regularized solver rejected its parameters or failed to fit.
    #[error("Regularized fit failed: {0}")]
    Regression(#[from] linfa_elasticnet::ElasticNetError),

    /// The experiment configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A configuration or report file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or report could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for regression sweeps
pub type Result<T> = std::result::Result<T, Error>;

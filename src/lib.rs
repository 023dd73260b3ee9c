//! # Polysweep
//! ## Watching a polynomial overfit, one degree at a time
//!
//! Fitting a polynomial is easy; choosing how flexible it should be is the hard part. A model
//! that is too simple misses the shape of the data (bias), and one that is too flexible chases
//! the noise (variance). This crate makes that tradeoff visible on a toy problem:
//!
//! - Sample `sin(2πx)` on `[0, 1]` with Gaussian noise, and hold out 30% for testing
//! - Fit OLS polynomials of degree 1 to 30 and record training and test RMSE
//! - Fit degree-10 Lasso (L1) and Ridge (L2) models over a range of penalties
//! - Cross-validate the penalty with k folds and select the best one
//! - Print every curve as a table, write it to JSON, and plot it (`plotting` feature)
//!
//! The whole experiment is one call:
//! ```rust
//! # use polysweep::{Experiment, SweepConfig};
//! let config = SweepConfig {
//!     max_degree: 8,
//!     n_alphas: 8,
//!     seed: Some(1),
//!     ..SweepConfig::default()
//! };
//! let report = Experiment::new(config).run().unwrap();
//! println!("{report}");
//! ```
//!
//! # Core Concepts
//! - A [`basis::Basis`] turns `x` into polynomial features:
//!     - [`basis::LegendreBasis`] maps `x` onto `[-1, 1]` first, and stays well-conditioned at
//!       high degree. This is the `default` basis.
//!     - [`basis::MonomialBasis`] is the plain `1, x, x², ...`, which loses precision quickly
//!       as the degree grows.
//! - A [`PolynomialFit`] is an OLS fit of every feature up to a degree, solved by SVD.
//! - A [`regularized::Regularized`] model adds a penalty `α` to the fit:
//!     - [`regularized::LassoModel`] penalizes `α‖w‖₁`, and drives weights to exactly zero
//!     - [`regularized::RidgeModel`] penalizes `α‖w‖₂²`, and shrinks every weight a little
//! - The [`sweep`] functions vary one knob and record the error on both sides of the split,
//!   giving an [`report::ErrorTable`] or a cross-validated [`report::CvTable`].
//!
//! Penalty curves are charted against `-ln(α)`, so model flexibility grows to the right on
//! every chart.
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(feature = "plotting")]
#[cfg_attr(docsrs, doc(cfg(feature = "plotting")))]
pub mod plot;

pub mod basis;
pub mod config;
pub mod data;
pub mod error;
pub mod experiment;
pub mod features;
pub mod regularized;
pub mod report;
pub mod statistics;
pub mod sweep;
pub mod transforms;
pub mod value;

mod fit;

pub use config::SweepConfig;
pub use experiment::Experiment;
pub use fit::*;
pub use report::ExperimentReport;

pub use nalgebra;

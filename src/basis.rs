//! Polynomial basis functions for feature expansion
//!
//! This module defines the [`Basis`] trait, which abstracts the functions a scalar input
//! is expanded into before a linear model is fitted.
//!
//! # Provided Bases
//! - [`MonomialBasis`]: The standard monomial basis, i.e., 1, x, x², … xⁿ. Simple but
//!   numerically unstable for high-degree polynomials.
//! - [`LegendreBasis`]: Orthogonal Legendre polynomials on [-1, 1]. The training x-range is
//!   mapped onto [-1, 1], which keeps the design matrix well conditioned up to high degrees.
//!
//! # Selecting a Basis
//! - [`LegendreBasis`] is the default for sweeps, since degree 30 is well past the point
//!   where the monomial design matrix stops being numerically useful.
//! - [`MonomialBasis`] is there to show exactly that.
use nalgebra::MatrixViewMut;
use serde::{Deserialize, Serialize};

use crate::value::Value;

pub(crate) mod monomial;
pub use monomial::MonomialBasis;

pub(crate) mod legendre;
pub use legendre::LegendreBasis;

/// A trait representing a polynomial basis.
///
/// Assumes a Vandermonde structure for the basis functions: function `j` has degree `j`,
/// and function 0 is the constant.
///
/// # Type Parameters
/// - `T`: The numeric type used for coefficients and evaluation (e.g., `f64`).
pub trait Basis<T: Value>: Sized + Clone + std::fmt::Debug + Send + Sync {
    /// Create a new basis from the range of the training inputs
    ///
    /// Initializes any needed metadata for normalization
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self;

    /// Returns the number of basis functions needed for a polynomial of a given degree.
    ///
    /// One function per degree plus the constant term.
    #[inline(always)]
    fn k(&self, degree: usize) -> usize {
        degree + 1
    }

    /// Populates a row of a Vandermonde matrix with this basis evaluated at `x`.
    ///
    /// Basis functions `start_index..row.ncols()` are written into the row.
    ///
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        row: MatrixViewMut<T, R, C, RS, CS>,
    );

    /// Normalizes the input value `x` for this basis.
    ///
    /// This is a no-op for the monomial basis.
    fn normalize_x(&self, x: T) -> T;

    /// Evaluates the jth function of this basis at a given point.
    ///
    /// `x` will be normalized by the caller using the `normalize_x` method.
    fn solve_function(&self, j: usize, x: T) -> T;
}

/// Runtime selector for the basis used by an experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasisKind {
    /// [`MonomialBasis`]
    Monomial,

    /// [`LegendreBasis`]
    #[default]
    Legendre,
}
impl std::fmt::Display for BasisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasisKind::Monomial => write!(f, "monomial"),
            BasisKind::Legendre => write!(f, "legendre"),
        }
    }
}
impl std::str::FromStr for BasisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monomial" => Ok(BasisKind::Monomial),
            "legendre" => Ok(BasisKind::Legendre),
            other => Err(format!("unknown basis `{other}`")),
        }
    }
}

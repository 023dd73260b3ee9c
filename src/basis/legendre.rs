use nalgebra::MatrixViewMut;

use crate::{basis::Basis, statistics::DomainNormalizer, value::Value};

/// Normalized Legendre basis for polynomial features.
///
/// This basis uses the Legendre polynomials, which form an
/// orthogonal family of polynomials on the interval [-1, 1].
///
/// Inputs are normalized so that the training domain
/// [`x_min`, `x_max`] is mapped onto [-1, 1]. Points outside the
/// training domain (held-out test points) are extrapolated, not clamped.
///
/// # Why Legendre?
/// - Orthogonal over [-1, 1] with uniform weight, which matches evenly spaced samples.
/// - Minimizes coefficient correlation, so a degree 30 design matrix stays usable.
#[derive(Debug, Clone, Copy)]
pub struct LegendreBasis<T: Value = f64> {
    /// Normalizer to map input domain to [-1, 1]
    pub normalizer: DomainNormalizer<T>,
}
impl<T: Value> LegendreBasis<T> {
    /// Creates a new Legendre basis that normalizes inputs from the given range to [-1, 1].
    pub fn new(x_min: T, x_max: T) -> Self {
        let normalizer = DomainNormalizer::new((x_min, x_max), (-T::one(), T::one()));
        Self { normalizer }
    }
}

impl<T: Value> Basis<T> for LegendreBasis<T> {
    fn from_range(x_range: std::ops::RangeInclusive<T>) -> Self {
        Self::new(*x_range.start(), *x_range.end())
    }

    fn normalize_x(&self, x: T) -> T {
        self.normalizer.normalize(x)
    }

    fn solve_function(&self, j: usize, x: T) -> T {
        // Bonnet's recursion: (n + 1) P_{n+1}(x) = (2n + 1) x P_n(x) - n P_{n-1}(x)
        let mut p_prev = T::one();
        if j == 0 {
            return p_prev;
        }

        let mut p = x;
        for n in 1..j {
            let n_t = T::from_positive_int(n);
            let next = ((T::two() * n_t + T::one()) * x * p - n_t * p_prev) / (n_t + T::one());
            p_prev = p;
            p = next;
        }
        p
    }

    fn fill_matrix_row<R: nalgebra::Dim, C: nalgebra::Dim, RS: nalgebra::Dim, CS: nalgebra::Dim>(
        &self,
        start_index: usize,
        x: T,
        mut row: MatrixViewMut<T, R, C, RS, CS>,
    ) {
        // Walk the recursion once for the whole row
        let mut p_prev = T::one();
        let mut p = x;
        for j in 0..row.ncols() {
            let value = match j {
                0 => T::one(),
                1 => x,
                _ => {
                    let n_t = T::from_positive_int(j - 1);
                    let next =
                        ((T::two() * n_t + T::one()) * x * p - n_t * p_prev) / (n_t + T::one());
                    p_prev = p;
                    p = next;
                    next
                }
            };

            if j >= start_index {
                row[j] = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::DMatrix;

    use super::*;

    #[test]
    fn legendre_known_values() {
        let basis = LegendreBasis::new(-1.0, 1.0);
        let x = 0.5;
        assert_abs_diff_eq!(basis.solve_function(0, x), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(basis.solve_function(1, x), 0.5, epsilon = 1e-12);
        // P2 = (3x² - 1) / 2
        assert_abs_diff_eq!(basis.solve_function(2, x), -0.125, epsilon = 1e-12);
        // P3 = (5x³ - 3x) / 2
        assert_abs_diff_eq!(basis.solve_function(3, x), -0.4375, epsilon = 1e-12);
    }

    #[test]
    fn legendre_is_one_at_right_edge() {
        let basis = LegendreBasis::new(0.0, 1.0);
        let x = basis.normalize_x(1.0);
        for j in 0..=30 {
            assert_abs_diff_eq!(basis.solve_function(j, x), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn legendre_row_matches_functions() {
        let basis = LegendreBasis::<f64>::from_range(0.0..=1.0);
        let x = basis.normalize_x(0.3);
        let mut m = DMatrix::<f64>::zeros(1, 12);
        basis.fill_matrix_row(0, x, m.row_mut(0));
        for j in 0..12 {
            assert_abs_diff_eq!(m[(0, j)], basis.solve_function(j, x), epsilon = 1e-12);
        }
    }

    #[test]
    fn legendre_row_respects_start_index() {
        let basis = LegendreBasis::<f64>::new(-1.0, 1.0);
        let mut m = DMatrix::<f64>::from_element(1, 4, 9.0);
        basis.fill_matrix_row(2, 0.5, m.row_mut(0));
        assert_abs_diff_eq!(m[(0, 0)], 9.0);
        assert_abs_diff_eq!(m[(0, 1)], 9.0);
        assert_abs_diff_eq!(m[(0, 2)], -0.125, epsilon = 1e-12);
    }
}

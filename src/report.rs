//! Result tables for the sweeps
//!
//! - [`ErrorTable`]: train and test RMSE against a swept parameter (degree or penalty).
//! - [`CvTable`]: k-fold cross-validated RMSE against penalty, with the selected penalty.
//! - [`ExperimentReport`]: every table from one run, plus the configuration that produced it.
//!
//! All tables serialize with serde and print as aligned text.
use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::{config::SweepConfig, error::Result};

/// Maps a penalty onto the plotting axis, `-ln(α)`.
///
/// Returns `None` for penalties that have no finite position on that axis (`α <= 0`).
#[must_use]
pub fn neg_ln(alpha: f64) -> Option<f64> {
    (alpha > 0.0 && alpha.is_finite()).then(|| -alpha.ln())
}

/// How a swept parameter is laid out on a chart axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterScale {
    /// The parameter is plotted as-is
    Linear,

    /// The parameter is a penalty plotted as `-ln(α)`
    NegativeLog,
}
impl ParameterScale {
    /// Position of a parameter on the axis, if it has one.
    #[must_use]
    pub fn map(self, parameter: f64) -> Option<f64> {
        match self {
            ParameterScale::Linear => parameter.is_finite().then_some(parameter),
            ParameterScale::NegativeLog => neg_ln(parameter),
        }
    }

    /// Axis label for a parameter with the given name.
    #[must_use]
    pub fn label(self, name: &str) -> String {
        match self {
            ParameterScale::Linear => name.to_string(),
            ParameterScale::NegativeLog => format!("-ln({name})"),
        }
    }
}

/// Which error curve a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    /// Error on the points the model was fitted on
    #[serde(rename = "training error")]
    Training,

    /// Error on the held-out points
    #[serde(rename = "test error")]
    Test,
}
impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Series::Training => f.pad("training error"),
            Series::Test => f.pad("test error"),
        }
    }
}

/// Train and test error for one value of the swept parameter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Degree or penalty
    pub parameter: f64,

    /// RMSE on the training set
    pub train_error: f64,

    /// RMSE on the test set
    pub test_error: f64,
}
impl ErrorRecord {
    /// The error for one series.
    #[must_use]
    pub fn error(&self, series: Series) -> f64 {
        match series {
            Series::Training => self.train_error,
            Series::Test => self.test_error,
        }
    }
}

/// One row of a long-format table: one value per (parameter, series)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeltedRow {
    /// Degree or penalty
    pub parameter: f64,

    /// Which curve the value belongs to
    pub series: Series,

    /// RMSE
    pub value: f64,
}

/// Train and test error across a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorTable {
    /// Chart and table title
    pub title: String,

    /// Name of the swept parameter
    pub parameter_name: String,

    /// How the parameter is plotted
    pub scale: ParameterScale,

    /// One record per parameter value, in sweep order
    pub records: Vec<ErrorRecord>,
}
impl ErrorTable {
    /// Creates an empty table.
    pub fn new(
        title: impl Into<String>,
        parameter_name: impl Into<String>,
        scale: ParameterScale,
    ) -> Self {
        Self {
            title: title.into(),
            parameter_name: parameter_name.into(),
            scale,
            records: Vec::new(),
        }
    }

    /// Appends a record.
    pub fn push(&mut self, parameter: f64, train_error: f64, test_error: f64) {
        self.records.push(ErrorRecord {
            parameter,
            train_error,
            test_error,
        });
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Long-format rows: the training error of every record, then the test error of every record.
    #[must_use]
    pub fn melt(&self) -> Vec<MeltedRow> {
        [Series::Training, Series::Test]
            .into_iter()
            .flat_map(|series| {
                self.records.iter().map(move |r| MeltedRow {
                    parameter: r.parameter,
                    series,
                    value: r.error(series),
                })
            })
            .collect()
    }

    /// The record with the lowest test error.
    #[must_use]
    pub fn best_test(&self) -> Option<&ErrorRecord> {
        self.records
            .iter()
            .filter(|r| r.test_error.is_finite())
            .min_by(|a, b| a.test_error.total_cmp(&b.test_error))
    }

    /// Plot points per series, grouped from [`ErrorTable::melt`], with the parameter mapped
    /// onto the chart axis. Series come in melt order: training, then test.
    ///
    /// Rows without an axis position are left out.
    #[must_use]
    pub fn curves(&self) -> Vec<(Series, Vec<(f64, f64)>)> {
        let mut curves: Vec<(Series, Vec<(f64, f64)>)> = Vec::new();
        for row in self.melt() {
            let Some(x) = self.scale.map(row.parameter) else {
                continue;
            };
            match curves.iter_mut().find(|(series, _)| *series == row.series) {
                Some((_, points)) => points.push((x, row.value)),
                None => curves.push((row.series, vec![(x, row.value)])),
            }
        }
        curves
    }
}
impl fmt::Display for ErrorTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(
            f,
            "{:>14} {:>16} {:>16}",
            self.parameter_name,
            Series::Training,
            Series::Test
        )?;
        for r in &self.records {
            writeln!(
                f,
                "{:>14} {:>16.6} {:>16.6}",
                format_parameter(r.parameter),
                r.train_error,
                r.test_error
            )?;
        }
        if let Some(best) = self.best_test() {
            writeln!(
                f,
                "lowest test error {:.6} at {} = {}",
                best.test_error,
                self.parameter_name,
                format_parameter(best.parameter)
            )?;
        }
        Ok(())
    }
}

fn format_parameter(p: f64) -> String {
    if p.fract() == 0.0 && p.abs() < 1e6 {
        format!("{p:.0}")
    } else {
        format!("{p:.6e}")
    }
}

/// Cross-validated error for one penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvRecord {
    /// Penalty strength
    pub alpha: f64,

    /// Mean RMSE over the validation folds
    pub mean_rmse: f64,

    /// RMSE on each validation fold
    pub fold_rmse: Vec<f64>,
}

/// Cross-validated error across a penalty grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvTable {
    /// Chart and table title
    pub title: String,

    /// Number of folds
    pub folds: usize,

    /// One record per penalty, in grid order
    pub records: Vec<CvRecord>,
}
impl CvTable {
    /// Creates an empty table.
    pub fn new(title: impl Into<String>, folds: usize) -> Self {
        Self {
            title: title.into(),
            folds,
            records: Vec::new(),
        }
    }

    /// The record with the lowest mean RMSE.
    ///
    /// Ties keep the first record in grid order.
    #[must_use]
    pub fn selected(&self) -> Option<&CvRecord> {
        self.records
            .iter()
            .filter(|r| r.mean_rmse.is_finite())
            .fold(None, |best: Option<&CvRecord>, r| match best {
                Some(b) if b.mean_rmse <= r.mean_rmse => Some(b),
                _ => Some(r),
            })
    }

    /// Plot points of mean RMSE against `-ln(α)`.
    ///
    /// `α = 0` has no position on that axis and is left out.
    #[must_use]
    pub fn curve(&self) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| Some((neg_ln(r.alpha)?, r.mean_rmse)))
            .collect()
    }
}
impl fmt::Display for CvTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}-fold)", self.title, self.folds)?;
        writeln!(f, "{:>14} {:>10} {:>16}", "alpha", "-ln(alpha)", "mean RMSE")?;
        for r in &self.records {
            let lambda = neg_ln(r.alpha).map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
            writeln!(
                f,
                "{:>14} {:>10} {:>16.6}",
                format_parameter(r.alpha),
                lambda,
                r.mean_rmse
            )?;
        }
        if let Some(best) = self.selected() {
            writeln!(
                f,
                "selected alpha = {} (mean RMSE {:.6})",
                format_parameter(best.alpha),
                best.mean_rmse
            )?;
        }
        Ok(())
    }
}

/// Every table produced by one experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    /// Configuration the experiment ran with
    pub config: SweepConfig,

    /// Number of training points
    pub n_train: usize,

    /// Number of held-out points
    pub n_test: usize,

    /// OLS error by polynomial degree
    pub degree: ErrorTable,

    /// Lasso error by penalty
    pub lasso: ErrorTable,

    /// Cross-validated Lasso error by penalty
    pub lasso_cv: CvTable,

    /// Ridge error by penalty
    pub ridge: ErrorTable,

    /// Cross-validated Ridge error by penalty
    pub ridge_cv: CvTable,
}
impl ExperimentReport {
    /// Error tables in display order.
    #[must_use]
    pub fn error_tables(&self) -> [&ErrorTable; 3] {
        [&self.degree, &self.lasso, &self.ridge]
    }

    /// Cross-validation tables in display order.
    #[must_use]
    pub fn cv_tables(&self) -> [&CvTable; 2] {
        [&self.lasso_cv, &self.ridge_cv]
    }

    /// Writes the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or serialization fails.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }
}
impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} training points, {} test points",
            self.n_train, self.n_test
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.degree)?;
        writeln!(f, "{}", self.lasso)?;
        writeln!(f, "{}", self.lasso_cv)?;
        writeln!(f, "{}", self.ridge)?;
        write!(f, "{}", self.ridge_cv)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn table() -> ErrorTable {
        let mut table = ErrorTable::new("RMSE vs poly degree", "degree", ParameterScale::Linear);
        table.push(1.0, 0.5, 0.6);
        table.push(2.0, 0.3, 0.4);
        table.push(3.0, 0.2, 0.45);
        table
    }

    #[test]
    fn melt_doubles_rows() {
        let table = table();
        let melted = table.melt();
        assert_eq!(melted.len(), 2 * table.len());
        assert!(melted[..3].iter().all(|r| r.series == Series::Training));
        assert!(melted[3..].iter().all(|r| r.series == Series::Test));
        assert_abs_diff_eq!(melted[4].value, 0.4);
        assert_abs_diff_eq!(melted[4].parameter, 2.0);
    }

    #[test]
    fn best_test_record() {
        let best = table().best_test().copied().unwrap();
        assert_abs_diff_eq!(best.parameter, 2.0);
    }

    #[test]
    fn penalty_curve_drops_zero_alpha() {
        let mut table = ErrorTable::new("Ridge", "alpha", ParameterScale::NegativeLog);
        table.push(0.0, 0.1, 0.2);
        table.push(1.0, 0.15, 0.18);
        table.push(10.0, 0.3, 0.31);

        let curves = table.curves();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].0, Series::Training);
        assert_eq!(curves[1].0, Series::Test);

        let (_, test) = &curves[1];
        assert_eq!(test.len(), 2);
        assert_abs_diff_eq!(test[0].0, 0.0);
        assert_abs_diff_eq!(test[1].0, -(10.0_f64).ln());
        assert_abs_diff_eq!(test[1].1, 0.31);
        assert_eq!(table.records.len(), 3);
    }

    #[test]
    fn cv_selects_minimum_mean() {
        let mut table = CvTable::new("Ridge CV", 3);
        for (alpha, mean) in [(0.0, 0.4), (1.0, 0.2), (10.0, 0.2), (100.0, 0.9)] {
            table.records.push(CvRecord {
                alpha,
                mean_rmse: mean,
                fold_rmse: vec![mean; 3],
            });
        }
        let selected = table.selected().unwrap();
        assert_abs_diff_eq!(selected.alpha, 1.0);
        assert_eq!(table.curve().len(), 3);
    }

    #[test]
    fn neg_ln_axis() {
        assert_eq!(neg_ln(0.0), None);
        assert_eq!(neg_ln(-1.0), None);
        assert_abs_diff_eq!(neg_ln(1.0).unwrap(), 0.0);
        assert_abs_diff_eq!(neg_ln(0.1).unwrap(), 10.0_f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn display_and_serde() {
        let table = table();
        let text = table.to_string();
        assert!(text.contains("training error"));
        assert!(text.contains("lowest test error 0.400000 at degree = 2"));

        let json = serde_json::to_string(&table.melt()[0]).unwrap();
        assert!(json.contains("\"training error\""));
        let back: ErrorTable = serde_json::from_str(&serde_json::to_string(&table).unwrap()).unwrap();
        assert_eq!(back, table);
    }
}

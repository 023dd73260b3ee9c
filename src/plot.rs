//! SVG charts of the sweep results
//!
//! One chart per table, written to [`crate::SweepConfig::output_dir`] by the binary:
//! - error tables: training and test RMSE against degree or `-ln(α)`
//! - cross-validation tables: mean fold RMSE against `-ln(α)`
//!
//! With the `png` feature every chart is also rendered to PNG.
use std::path::{Path, PathBuf};

pub use plotters;

mod chart;
pub use chart::*;

mod palette;
use palette::{Palettes, PlotPalette};

use crate::report::{neg_ln, CvTable, ErrorTable, ExperimentReport, ParameterScale};

/// Size of every chart, in pixels
pub const CHART_SIZE: (u32, u32) = (800, 600);

/// File name for a chart title, e.g. `Lasso CV` becomes `lasso_cv.svg`
#[must_use]
pub fn chart_file_name(title: &str) -> String {
    let mut name = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.is_empty() && !name.ends_with('_') {
            name.push('_');
        }
    }
    let name = name.trim_end_matches('_');
    format!("{name}.svg")
}

/// Charts the training and test error of a table.
///
/// # Errors
/// Returns [`PlottingError::Empty`] if no record has a position on the chart axis, or an error
/// if drawing or writing fails.
pub fn plot_error_table(table: &ErrorTable, target: &Path) -> Result<(), PlottingError> {
    let curves = table.curves();
    let precision = match table.scale {
        ParameterScale::Linear => 0,
        ParameterScale::NegativeLog => 1,
    };
    let points: Vec<&[(f64, f64)]> = curves.iter().map(|(_, c)| c.as_slice()).collect();
    let axes = Axes::around(&points, table.scale.label(&table.parameter_name), "RMSE")
        .ok_or_else(|| PlottingError::Empty(table.title.clone()))?
        .with_x_precision(precision);

    write_chart(target, CHART_SIZE, |root| {
        let mut plot = Plot::new(root, &table.title, &axes)?;
        for (series, curve) in &curves {
            plot = plot.with_line(curve, &series.to_string())?;
        }
        plot.build()
    })
}

/// Charts the mean cross-validated error of a table, marking the selected penalty.
///
/// # Errors
/// Returns [`PlottingError::Empty`] if no penalty is positive, or an error if drawing or
/// writing fails.
pub fn plot_cv_table(table: &CvTable, target: &Path) -> Result<(), PlottingError> {
    let curve = table.curve();
    let selected: Vec<(f64, f64)> = table
        .selected()
        .and_then(|r| Some((neg_ln(r.alpha)?, r.mean_rmse)))
        .into_iter()
        .collect();

    let axes = Axes::around(&[curve.as_slice()], "-ln(alpha)", "RMSE")
        .ok_or_else(|| PlottingError::Empty(table.title.clone()))?;

    write_chart(target, CHART_SIZE, |root| {
        let mut plot = Plot::new(root, &table.title, &axes)?
            .with_line(&curve, &format!("mean RMSE ({}-fold)", table.folds))?;
        if !selected.is_empty() {
            plot = plot.with_line(&selected, "selected alpha")?;
        }
        plot.build()
    })
}

/// Writes every chart of a report into `dir`, creating it if needed.
///
/// Tables with nothing to plot are skipped with a warning.
///
/// # Errors
/// Returns an error if the directory cannot be created, or a chart cannot be drawn or written.
pub fn render_report(report: &ExperimentReport, dir: &Path) -> Result<Vec<PathBuf>, PlottingError> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for table in report.error_tables() {
        let path = dir.join(chart_file_name(&table.title));
        match plot_error_table(table, &path) {
            Ok(()) => written.push(path),
            Err(PlottingError::Empty(title)) => tracing::warn!(%title, "nothing to plot"),
            Err(e) => return Err(e),
        }
    }
    for table in report.cv_tables() {
        let path = dir.join(chart_file_name(&table.title));
        match plot_cv_table(table, &path) {
            Ok(()) => written.push(path),
            Err(PlottingError::Empty(title)) => tracing::warn!(%title, "nothing to plot"),
            Err(e) => return Err(e),
        }
    }

    for path in &written {
        tracing::info!(path = %path.display(), "wrote chart");
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CvRecord;

    fn output_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("polysweep_plot_tests").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn file_names() {
        assert_eq!(
            chart_file_name("RMSE vs poly degree (model complexity)"),
            "rmse_vs_poly_degree_model_complexity.svg"
        );
        assert_eq!(chart_file_name("Lasso Regression (L1)"), "lasso_regression_l1.svg");
        assert_eq!(chart_file_name("Ridge CV"), "ridge_cv.svg");
    }

    #[test]
    fn writes_error_table_svg() {
        let mut table = ErrorTable::new("Ridge Regression", "alpha", ParameterScale::NegativeLog);
        table.push(0.1, 0.09, 0.12);
        table.push(1.0, 0.1, 0.11);
        table.push(10.0, 0.2, 0.21);

        let path = output_dir("error_table").join("ridge.svg");
        plot_error_table(&table, &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Ridge Regression"));
        assert!(svg.contains("training error"));
        assert!(svg.contains("test error"));
    }

    #[test]
    fn writes_cv_table_svg() {
        let mut table = CvTable::new("Lasso CV", 10);
        for (alpha, mean) in [(1e-3, 0.2), (1e-2, 0.15), (1e-1, 0.3)] {
            table.records.push(CvRecord {
                alpha,
                mean_rmse: mean,
                fold_rmse: vec![mean; 10],
            });
        }

        let path = output_dir("cv_table").join("lasso_cv.svg");
        plot_cv_table(&table, &path).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("<svg"));
    }

    #[test]
    fn zero_penalty_only_is_empty() {
        let mut table = ErrorTable::new("Ridge Regression", "alpha", ParameterScale::NegativeLog);
        table.push(0.0, 0.09, 0.12);

        let path = output_dir("empty").join("ridge.svg");
        let result = plot_error_table(&table, &path);
        assert!(matches!(result, Err(PlottingError::Empty(_))));
    }
}

use std::{ops::Range, path::Path};

use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};

use crate::plot::{PlotPalette, Palettes};

/// Error occurring during plotting
#[derive(Debug, thiserror::Error)]
pub enum PlottingError {
    /// Error drawing the plot
    #[error("Error drawing plot: {0}")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),

    /// The table has no points with a position on the chart axes
    #[error("Nothing to plot for `{0}`")]
    Empty(String),

    /// Error writing the output file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing SVG
    #[cfg(feature = "png")]
    #[error("Rendering error: {0}")]
    SvgParse(#[from] resvg::usvg::Error),

    /// Error encoding PNG
    #[cfg(feature = "png")]
    #[error("PNG encoding error: {0}")]
    PngEncode(String),
}

/// Type alias for the root drawing area.
pub type PlotRoot<'root> = DrawingArea<SVGBackend<'root>, Shift>;

/// Axis settings for a chart
#[derive(Debug, Clone)]
pub struct Axes {
    /// Label under the x axis
    pub x_label: String,

    /// Label beside the y axis
    pub y_label: String,

    /// Displayed x range
    pub x_range: Range<f64>,

    /// Displayed y range
    pub y_range: Range<f64>,

    /// Decimal places on x tick labels
    pub x_precision: usize,
}
impl Axes {
    /// Fits the axes around every point of the given curves, with a small margin.
    ///
    /// Returns `None` if there are no finite points.
    #[must_use]
    pub fn around(
        curves: &[&[(f64, f64)]],
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Option<Self> {
        let points = || {
            curves
                .iter()
                .flat_map(|c| c.iter())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
        };

        let x_range = padded_range(points().map(|(x, _)| *x))?;
        let y_range = padded_range(points().map(|(_, y)| *y))?;
        Some(Self {
            x_label: x_label.into(),
            y_label: y_label.into(),
            x_range,
            y_range,
            x_precision: 1,
        })
    }

    /// Sets the decimal places on x tick labels.
    #[must_use]
    pub fn with_x_precision(mut self, precision: usize) -> Self {
        self.x_precision = precision;
        self
    }
}

/// Range covering all values, widened by 5% on each side
fn padded_range(values: impl Iterator<Item = f64>) -> Option<Range<f64>> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| {
        Some(match acc {
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
            None => (v, v),
        })
    })?;

    let width = max - min;
    let pad = if width > 0.0 { width * 0.05 } else { 0.5 };
    Some((min - pad)..(max + pad))
}

/// A line chart of error curves, drawn on a borrowed [`PlotRoot`]
pub struct Plot<'area, 'root> {
    chart: ChartContext<'area, SVGBackend<'root>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_precision: usize,
    palettes: Palettes,
}
impl<'area, 'root: 'area> Plot<'area, 'root> {
    /// Create a new plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be created.
    pub fn new(
        root: &'area PlotRoot<'root>,
        title: &str,
        axes: &Axes,
    ) -> Result<Self, PlottingError> {
        let chart = ChartBuilder::on(root)
            .caption(title, ("sans-serif", 24).into_font())
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(axes.x_range.clone(), axes.y_range.clone())?;

        let mut plot = Plot {
            chart,
            x_precision: axes.x_precision,
            palettes: Palettes::default(),
        };
        plot.draw_mesh(&axes.x_label, &axes.y_label)?;
        Ok(plot)
    }

    fn draw_mesh(&mut self, x_label: &str, y_label: &str) -> Result<(), PlottingError> {
        let precision = self.x_precision;
        self.chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .x_label_formatter(&|v| format!("{v:.precision$}"))
            .y_label_formatter(&|v| format!("{v:.3}"))
            .draw()?;
        Ok(())
    }

    /// Add a line to the plot, in the next color of the palette
    ///
    /// Points are marked when there are few enough of them to tell apart.
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    pub fn with_line(mut self, data: &[(f64, f64)], label: &str) -> Result<Self, PlottingError> {
        const MAX_MARKED_POINTS: usize = 12;

        let PlotPalette { line, marker } = self.palettes.next();
        let style = ShapeStyle::from(line).stroke_width(2);
        self.chart
            .draw_series(LineSeries::new(data.iter().copied(), style))?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));

        if data.len() <= MAX_MARKED_POINTS {
            self.chart.draw_series(
                data.iter()
                    .map(|&point| Circle::new(point, 3, ShapeStyle::from(marker).filled())),
            )?;
        }

        Ok(self)
    }

    /// Build the final plot
    ///
    /// # Errors
    /// Returns an error if the plot cannot be modified.
    pub fn build(mut self) -> Result<(), PlottingError> {
        self.chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;

        self.chart.plotting_area().present()?;
        Ok(())
    }

    /// Build a PNG file from the SVG data
    ///
    /// Text is rendered with the system fonts.
    ///
    /// # Errors
    /// Returns an error if the PNG cannot be created.
    #[cfg(feature = "png")]
    pub fn build_png(svg: &str, target: &Path) -> Result<(), PlottingError> {
        use resvg::usvg;

        let mut opt = usvg::Options::default();
        opt.fontdb_mut().load_system_fonts();

        let rtree = usvg::Tree::from_str(svg, &opt)?;
        let pixmap_size = rtree.size().to_int_size();

        let mut pixmap = resvg::tiny_skia::Pixmap::new(pixmap_size.width(), pixmap_size.height())
            .ok_or_else(|| PlottingError::PngEncode("empty image".to_string()))?;
        resvg::render(&rtree, usvg::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .save_png(target)
            .map_err(|e| PlottingError::PngEncode(e.to_string()))?;
        Ok(())
    }
}

/// Renders a chart into an SVG string, then writes it to `target`.
///
/// With the `png` feature a PNG rendering is written next to it.
///
/// # Errors
/// Returns an error if drawing or writing fails.
pub fn write_chart(
    target: &Path,
    size: (u32, u32),
    draw: impl FnOnce(&PlotRoot<'_>) -> Result<(), PlottingError>,
) -> Result<(), PlottingError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    std::fs::write(target, &svg)?;

    #[cfg(feature = "png")]
    Plot::build_png(&svg, &target.with_extension("png"))?;

    Ok(())
}

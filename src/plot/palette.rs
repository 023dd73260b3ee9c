use plotters::prelude::*;

/// Cycles through line colors, one per series
pub struct Palettes {
    palettes: Vec<PlotPalette>,
    index: usize,
}
impl Palettes {
    /// The next palette, wrapping around after the last one
    pub fn next(&mut self) -> PlotPalette {
        let palette = self.palettes[self.index];
        self.index = (self.index + 1) % self.palettes.len();
        palette
    }
}
impl Default for Palettes {
    fn default() -> Self {
        use plotters::prelude::full_palette::*;

        Self {
            palettes: vec![
                PlotPalette::new(BLUE_700),
                PlotPalette::new(RED_700),
                PlotPalette::new(GREEN_700),
                PlotPalette::new(ORANGE),
                PlotPalette::new(PURPLE),
            ],
            index: 0,
        }
    }
}

/// Colors for one series
#[derive(Debug, Clone, Copy)]
pub struct PlotPalette {
    /// Line stroke
    pub line: RGBColor,

    /// Point markers, a translucent shade of the line color
    pub marker: RGBAColor,
}
impl PlotPalette {
    /// Derives the marker color from the line color.
    pub const fn new(line: RGBColor) -> Self {
        let marker = RGBAColor(line.0, line.1, line.2, 0.6);
        Self { line, marker }
    }
}

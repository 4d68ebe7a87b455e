use super::{Canvas, CanvasGeometry};
use crate::config::{ConfigurationParser, Format, Printer, Representation};
use crate::error::Result;
use crate::geometry::{Point, Rectangle};

/// Sampling step in mm used when the printer does not configure one.
pub const DEFAULT_RESOLUTION: f64 = 0.5;

/// A page of freely positioned dots, in mm from the page's top-left corner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloatingPointData {
    points: Vec<Point>,
}

impl FloatingPointData {
    /// Create an empty page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a dot.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Dots in placement order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of dots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether no dot was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Canvas for floating-dot printers.
#[derive(Debug, Clone)]
pub struct PlotCanvas {
    geometry: CanvasGeometry,
    resolution: f64,
    dot_distance: (f64, f64),
    cell_distance: (f64, f64),
    dot_diameter: f64,
    pages: Vec<FloatingPointData>,
}

impl PlotCanvas {
    /// Create a canvas with one empty page.
    pub fn new(printer: &Printer, format: &Format, representation: &Representation) -> Result<Self> {
        Ok(Self {
            geometry: CanvasGeometry::new(printer, format, representation)?,
            resolution: printer.floating_dot_resolution().unwrap_or(DEFAULT_RESOLUTION),
            dot_distance: printer.dot_distance(),
            cell_distance: printer.cell_distance(),
            dot_diameter: printer.dot_diameter(),
            pages: vec![FloatingPointData::new()],
        })
    }

    /// Build from a parsed configuration and a format name.
    pub fn from_config(config: &ConfigurationParser, format: &str) -> Result<Self> {
        Self::new(config.printer(), config.format(format)?, config.representation())
    }

    /// Step between sampled dots along a line, in mm.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// `(horizontal, vertical)` dot distance of braille text, in mm.
    #[must_use]
    pub fn dot_distance(&self) -> (f64, f64) {
        self.dot_distance
    }

    /// `(horizontal, vertical)` cell distance of braille text, in mm.
    #[must_use]
    pub fn cell_distance(&self) -> (f64, f64) {
        self.cell_distance
    }

    /// Dot diameter in mm.
    #[must_use]
    pub fn dot_diameter(&self) -> f64 {
        self.dot_diameter
    }

    /// Printable area in mm.
    #[must_use]
    pub fn printable_area(&self) -> Rectangle {
        self.geometry.printable_area()
    }

    /// Height of one braille text line (cell plus line gap) in mm, for 2x3 cells.
    #[must_use]
    pub fn text_line_height(&self) -> f64 {
        2.0 * self.dot_distance.1 + self.cell_distance.1
    }
}

impl Canvas for PlotCanvas {
    type Page = FloatingPointData;

    fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    fn pages(&self) -> &[FloatingPointData] {
        &self.pages
    }

    fn new_page(&mut self) -> &mut FloatingPointData {
        self.pages.push(FloatingPointData::new());
        self.current_page_mut()
    }

    fn current_page(&self) -> &FloatingPointData {
        &self.pages[self.pages.len() - 1]
    }

    fn current_page_mut(&mut self) -> &mut FloatingPointData {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plot_canvas_defaults() {
        let config = ConfigurationParser::with_defaults().unwrap();
        let canvas = PlotCanvas::from_config(&config, "A5").unwrap();
        assert_relative_eq!(canvas.resolution(), DEFAULT_RESOLUTION);
        assert_relative_eq!(canvas.printable_width(), 148.0);
        assert_relative_eq!(canvas.text_line_height(), 10.0);
        assert!(canvas.current_page().is_empty());
    }

    #[test]
    fn test_configured_resolution_and_pages() {
        let config = ConfigurationParser::with_overrides("printer.floatingDot.resolution = 0.1\n").unwrap();
        let mut canvas = PlotCanvas::from_config(&config, "A4").unwrap();
        assert_relative_eq!(canvas.resolution(), 0.1);
        canvas.current_page_mut().add_point(Point::new(1.0, 2.0));
        canvas.new_page().add_point(Point::new(3.0, 4.0));
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.pages()[0].points(), &[Point::new(1.0, 2.0)]);
        assert_eq!(canvas.current_page().len(), 1);
    }
}

use super::{Canvas, CanvasGeometry, MatrixData};
use crate::config::{ConfigurationParser, Format, Printer, RasterType, Representation};
use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use tracing::debug;

/// Canvas for embossers printing on a fixed braille cell grid.
///
/// Dots are addressed in absolute page coordinates: dot `(row, column)` belongs to
/// cell `(row / cell_height, column / cell_width)`. The usable part of the grid is
/// [`RasterCanvas::cell_rectangle`], which the printer's raster constraint may
/// narrow down.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    geometry: CanvasGeometry,
    raster: RasterType,
    dot_distance: (f64, f64),
    cell_distance: (f64, f64),
    dot_diameter: f64,
    cell_rect: Rectangle,
    x_positions: Vec<f64>,
    y_positions: Vec<f64>,
    blank: MatrixData<bool>,
    pages: Vec<MatrixData<bool>>,
}

impl RasterCanvas {
    /// Build the raster geometry and the first page.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for missing printer or format values, or
    /// [`Error::InsufficientArea`] if no cell fits the printable area.
    pub fn new(printer: &Printer, format: &Format, representation: &Representation) -> Result<Self> {
        let geometry = CanvasGeometry::new(printer, format, representation)?;
        let raster = printer.raster_type();
        let dot_distance = printer.dot_distance();
        let cell_distance = printer.cell_distance();
        let dot_diameter = printer.dot_diameter();

        let (w, h) = (raster.cell_width, raster.cell_height);
        let pitch_x = (w - 1) as f64 * dot_distance.0 + cell_distance.0;
        let pitch_y = (h - 1) as f64 * dot_distance.1 + cell_distance.1;
        let area = geometry.printable_area();
        let columns = ((area.width + cell_distance.0) / pitch_x).floor().max(0.0);
        let rows = ((area.height + cell_distance.1) / pitch_y).floor().max(0.0);

        let cell_rect = Rectangle::new(0.0, 0.0, columns, rows)
            .intersected_with(&printer.raster_constraint())
            .as_int();
        if cell_rect.width <= 0 || cell_rect.height <= 0 {
            return Err(Error::insufficient_area(format!(
                "no braille cell fits the printable area of format '{}' ({:.1} x {:.1} mm)",
                format.name(),
                area.width,
                area.height
            )));
        }
        let cell_rect = Rectangle::from(cell_rect);

        let dot_columns = (cell_rect.right() as usize) * w;
        let dot_rows = (cell_rect.bottom() as usize) * h;
        let x_positions = (0..dot_columns)
            .map(|c| area.x + (c / w) as f64 * pitch_x + (c % w) as f64 * dot_distance.0)
            .collect();
        let y_positions = (0..dot_rows)
            .map(|r| area.y + (r / h) as f64 * pitch_y + (r % h) as f64 * dot_distance.1)
            .collect();

        let blank = MatrixData::new(dot_rows, dot_columns)?;

        debug!(
            format = format.name(),
            cells_x = cell_rect.width,
            cells_y = cell_rect.height,
            cell_width = w,
            cell_height = h,
            "raster canvas geometry"
        );

        Ok(Self {
            geometry,
            raster,
            dot_distance,
            cell_distance,
            dot_diameter,
            cell_rect,
            x_positions,
            y_positions,
            blank: blank.clone(),
            pages: vec![blank],
        })
    }

    /// Build from a parsed configuration and a format name.
    pub fn from_config(config: &ConfigurationParser, format: &str) -> Result<Self> {
        Self::new(config.printer(), config.format(format)?, config.representation())
    }

    /// Cell geometry.
    #[must_use]
    pub fn raster_type(&self) -> RasterType {
        self.raster
    }

    /// Dots per cell horizontally.
    #[must_use]
    pub fn cell_width(&self) -> usize {
        self.raster.cell_width
    }

    /// Dots per cell vertically.
    #[must_use]
    pub fn cell_height(&self) -> usize {
        self.raster.cell_height
    }

    /// Usable cells.
    #[must_use]
    pub fn cell_rectangle(&self) -> Rectangle {
        self.cell_rect
    }

    /// Usable dots.
    #[must_use]
    pub fn dot_rectangle(&self) -> Rectangle {
        self.cell_rect.scaled_by(self.cell_width() as f64, self.cell_height() as f64)
    }

    /// Cell column containing a dot column.
    #[must_use]
    pub fn cell_x_from_dot_x(&self, dot_x: i64) -> i64 {
        dot_x.div_euclid(self.cell_width() as i64)
    }

    /// Cell row containing a dot row.
    #[must_use]
    pub fn cell_y_from_dot_y(&self, dot_y: i64) -> i64 {
        dot_y.div_euclid(self.cell_height() as i64)
    }

    /// `(horizontal, vertical)` dot distance in mm.
    #[must_use]
    pub fn dot_distance(&self) -> (f64, f64) {
        self.dot_distance
    }

    /// `(horizontal, vertical)` cell distance in mm.
    #[must_use]
    pub fn cell_distance(&self) -> (f64, f64) {
        self.cell_distance
    }

    /// Dot diameter in mm.
    #[must_use]
    pub fn dot_diameter(&self) -> f64 {
        self.dot_diameter
    }

    /// Physical x position (mm from the page's left edge) of a dot column.
    #[must_use]
    pub fn dot_x_position(&self, column: usize) -> Option<f64> {
        self.x_positions.get(column).copied()
    }

    /// Physical y position (mm from the page's top edge) of a dot row.
    #[must_use]
    pub fn dot_y_position(&self, row: usize) -> Option<f64> {
        self.y_positions.get(row).copied()
    }

    /// Physical x positions of all dot columns.
    #[must_use]
    pub fn x_positions(&self) -> &[f64] {
        &self.x_positions
    }

    /// Physical y positions of all dot rows.
    #[must_use]
    pub fn y_positions(&self) -> &[f64] {
        &self.y_positions
    }

    /// Dot column whose physical position is nearest to `mm`.
    #[must_use]
    pub fn quantify_x(&self, mm: f64) -> usize {
        nearest(&self.x_positions, mm)
    }

    /// Dot row whose physical position is nearest to `mm`.
    #[must_use]
    pub fn quantify_y(&self, mm: f64) -> usize {
        nearest(&self.y_positions, mm)
    }
}

/// Index of the value in sorted `positions` closest to `target`; ties go to the
/// lower index.
fn nearest(positions: &[f64], target: f64) -> usize {
    let upper = positions.partition_point(|p| *p < target);
    if upper == 0 {
        return 0;
    }
    if upper >= positions.len() {
        return positions.len().saturating_sub(1);
    }
    if target - positions[upper - 1] <= positions[upper] - target {
        upper - 1
    } else {
        upper
    }
}

impl Canvas for RasterCanvas {
    type Page = MatrixData<bool>;

    fn geometry(&self) -> &CanvasGeometry {
        &self.geometry
    }

    fn pages(&self) -> &[MatrixData<bool>] {
        &self.pages
    }

    fn new_page(&mut self) -> &mut MatrixData<bool> {
        self.pages.push(self.blank.clone());
        self.current_page_mut()
    }

    fn current_page(&self) -> &MatrixData<bool> {
        &self.pages[self.pages.len() - 1]
    }

    fn current_page_mut(&mut self) -> &mut MatrixData<bool> {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

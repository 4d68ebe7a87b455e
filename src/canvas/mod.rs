//! Printable canvases.
//!
//! A canvas owns the pages of one render job and knows the physical geometry they
//! map to. [`RasterCanvas`] models braille embossers printing on a fixed cell grid;
//! [`PlotCanvas`] models floating-dot printers placing dots anywhere in the
//! printable area.

mod matrix;
mod plot;
mod raster;

pub use matrix::{DotIter, MatrixData};
pub use plot::{FloatingPointData, PlotCanvas};
pub use raster::RasterCanvas;

use crate::config::{ConfigurationParser, Format, Printer, Representation};
use crate::error::{Error, Result};
use crate::geometry::Rectangle;

/// Configuration and physical page geometry shared by every canvas type.
#[derive(Debug, Clone)]
pub struct CanvasGeometry {
    printer: Printer,
    format: Format,
    representation: Representation,
    page_width: f64,
    page_height: f64,
    printable_area: Rectangle,
}

impl CanvasGeometry {
    /// Derive the printable area (page minus margins, clipped to the printer
    /// constraint) from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientArea`] if nothing of the page is printable.
    pub fn new(printer: &Printer, format: &Format, representation: &Representation) -> Result<Self> {
        let page_width = format.page_width();
        let page_height = format.page_height();
        let printable_area = format.printable_area().intersected_with(&printer.constraint());

        if printable_area.is_empty() {
            return Err(Error::insufficient_area(format!(
                "format '{}' leaves no printable area for printer '{}'",
                format.name(),
                printer.name
            )));
        }

        Ok(Self {
            printer: printer.clone(),
            format: format.clone(),
            representation: representation.clone(),
            page_width,
            page_height,
            printable_area,
        })
    }

    /// Build from a parsed configuration and a format name.
    pub fn from_config(config: &ConfigurationParser, format: &str) -> Result<Self> {
        Self::new(config.printer(), config.format(format)?, config.representation())
    }

    /// Printer configuration.
    #[must_use]
    pub fn printer(&self) -> &Printer {
        &self.printer
    }

    /// Paper format.
    #[must_use]
    pub fn format(&self) -> &Format {
        &self.format
    }

    /// Representation parameters.
    #[must_use]
    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    /// Page width in mm.
    #[must_use]
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    /// Page height in mm.
    #[must_use]
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Printable area in mm, relative to the page's top-left corner.
    #[must_use]
    pub fn printable_area(&self) -> Rectangle {
        self.printable_area
    }
}

/// Operations common to all canvases.
pub trait Canvas {
    /// Page type stored by this canvas.
    type Page;

    /// Shared configuration and geometry.
    fn geometry(&self) -> &CanvasGeometry;

    /// All pages, oldest first.
    fn pages(&self) -> &[Self::Page];

    /// Append a new empty page and make it current.
    fn new_page(&mut self) -> &mut Self::Page;

    /// The page rasterizers draw on.
    fn current_page(&self) -> &Self::Page;

    /// Mutable access to the current page.
    fn current_page_mut(&mut self) -> &mut Self::Page;

    /// Number of pages.
    fn page_count(&self) -> usize {
        self.pages().len()
    }

    /// Printable width in mm.
    fn printable_width(&self) -> f64 {
        self.geometry().printable_area().width
    }

    /// Printable height in mm.
    fn printable_height(&self) -> f64 {
        self.geometry().printable_area().height
    }
}

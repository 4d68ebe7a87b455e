//! Rendering context: configuration plus the handler registry.

use super::RenderingBase;
use crate::canvas::{PlotCanvas, RasterCanvas};
use crate::config::{ConfigurationParser, Format, Printer, Representation};
use crate::diagram::Renderable;
use crate::error::Result;
use tracing::info;

/// Renders diagrams onto canvases matching the current printer and format.
///
/// Every call builds a fresh canvas, so results of earlier calls are never
/// touched by later ones.
#[derive(Debug)]
pub struct MasterRenderer {
    printer: Printer,
    format: Format,
    representation: Representation,
    rendering_base: RenderingBase,
}

impl MasterRenderer {
    /// Renderer with the built-in rasterizers and plotters.
    pub fn new(printer: Printer, format: Format, representation: Representation) -> Result<Self> {
        let rendering_base = RenderingBase::with_defaults(&printer, &representation)?;
        info!(printer = %printer.name, format = format.name(), "creating renderer with default context");
        Ok(Self { printer, format, representation, rendering_base })
    }

    /// Renderer for the configured printer and the format called `format`.
    pub fn from_config(config: &ConfigurationParser, format: &str) -> Result<Self> {
        Self::new(config.printer().clone(), config.format(format)?.clone(), config.representation().clone())
    }

    /// Renderer with a custom registry.
    #[must_use]
    pub fn with_rendering_base(
        printer: Printer,
        format: Format,
        representation: Representation,
        rendering_base: RenderingBase,
    ) -> Self {
        info!(format = format.name(), "creating renderer with custom context");
        Self { printer, format, representation, rendering_base }
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

    /// Handler registry.
    #[must_use]
    pub fn rendering_base(&self) -> &RenderingBase {
        &self.rendering_base
    }

    /// Mutable handler registry, e.g. to swap in a custom rasterizer.
    pub fn rendering_base_mut(&mut self) -> &mut RenderingBase {
        &mut self.rendering_base
    }

    /// Switch to another paper format.
    pub fn set_format(&mut self, format: Format) {
        info!(format = format.name(), "rendering context format changed");
        self.format = format;
    }

    /// Rasterize `renderable` onto a new raster canvas.
    ///
    /// # Errors
    ///
    /// Propagates canvas construction failures, [`crate::Error::NoRasterizer`] and
    /// any rasterizer error.
    pub fn rasterize(&self, renderable: &Renderable) -> Result<RasterCanvas> {
        let kind = renderable.kind();
        info!(%kind, "starting rasterization");
        let mut canvas = RasterCanvas::new(&self.printer, &self.format, &self.representation)?;
        self.rendering_base.rasterize(renderable, &mut canvas)?;
        info!(%kind, "rasterization finished");
        Ok(canvas)
    }

    /// Plot `renderable` onto a new floating-dot canvas.
    pub fn plot(&self, renderable: &Renderable) -> Result<PlotCanvas> {
        let kind = renderable.kind();
        info!(%kind, "starting plot");
        let mut canvas = PlotCanvas::new(&self.printer, &self.format, &self.representation)?;
        self.rendering_base.plot(renderable, &mut canvas)?;
        info!(%kind, "plot finished");
        Ok(canvas)
    }
}

//! Rasterizers, plotters and the registry dispatching renderables to them.
//!
//! A [`Rasterizer`] turns one renderable type into dots on a [`RasterCanvas`];
//! a [`Plotter`] does the same on a [`PlotCanvas`]. [`RenderingBase`] keeps one
//! type-erased handler per [`RenderableKind`] and routes a [`Renderable`] to it.
//!
//! # Algorithms
//!
//! - **Uniform texture bar chart**: horizontal bars textured with alternating
//!   solid and dotted columns, laid out on the braille cell grid
//! - **Image mapping**: linear pixel-to-dot mapping or quantified physical positions
//! - **Bresenham's Line**: axis lines and sampled plot segments
//!
//! # References
//!
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."
//! - ISO/TR 11548-1 (2001). "Communication aids for blind persons."

mod axis;
mod bar_chart;
mod image;
mod line;
mod master;
mod primitives;
mod text;

pub use axis::LinearMappingAxisRasterizer;
pub use bar_chart::{BarChartLayout, BarChartPlan, BarPlan, CaptionPosition, UniformTextureBarChartRasterizer};
pub use image::{ImageMapping, ImageRasterizer};
pub use line::LineChartPlotter;
pub use master::MasterRenderer;
pub use primitives::{dotted_vertical, draw_line, fill, rectangle};
pub use text::{BrailleTable, BrailleTextRasterizer, SimpleBrailleTable, CAPITAL_SIGN, NUMBER_SIGN};

use crate::canvas::{PlotCanvas, RasterCanvas};
use crate::config::{Printer, Representation};
use crate::diagram::{
    AxisMarks, BarChart, BrailleText, CategoricalBarChart, Image, LineChart, Renderable, RenderableKind,
};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Draws one renderable type onto a raster canvas.
pub trait Rasterizer<T> {
    /// Draw `data` onto the current page of `canvas`.
    ///
    /// # Errors
    ///
    /// Implementations fail before touching the page when preconditions or the
    /// layout do not hold.
    fn rasterize(&self, data: &T, canvas: &mut RasterCanvas) -> Result<()>;
}

/// Places floating dots for one renderable type onto a plot canvas.
pub trait Plotter<T> {
    /// Plot `data` onto the current page of `canvas`.
    fn plot(&self, data: &T, canvas: &mut PlotCanvas) -> Result<()>;
}

/// A concrete renderable type that can be recovered from [`Renderable`].
pub trait RenderableVariant: Sized + 'static {
    /// Kind tag of this type.
    const KIND: RenderableKind;

    /// The payload, if `renderable` is of this type.
    fn extract(renderable: &Renderable) -> Option<&Self>;
}

macro_rules! renderable_variant {
    ($($variant:ident),* $(,)?) => {
        $(impl RenderableVariant for $variant {
            const KIND: RenderableKind = RenderableKind::$variant;

            fn extract(renderable: &Renderable) -> Option<&Self> {
                match renderable {
                    Renderable::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        })*
    };
}

renderable_variant!(BarChart, CategoricalBarChart, LineChart, Image, BrailleText, AxisMarks);

fn extract<T: RenderableVariant>(renderable: &Renderable) -> Result<&T> {
    T::extract(renderable).ok_or(Error::RenderableMismatch { expected: T::KIND.name(), found: renderable.kind().name() })
}

type RasterFn = Box<dyn Fn(&Renderable, &mut RasterCanvas) -> Result<()> + Send + Sync>;
type PlotFn = Box<dyn Fn(&Renderable, &mut PlotCanvas) -> Result<()> + Send + Sync>;

/// Type-erased rasterizer bound to one renderable kind.
pub struct FunctionalRasterizer {
    kind: RenderableKind,
    func: RasterFn,
}

impl FunctionalRasterizer {
    /// Wrap a closure drawing renderables of type `T`.
    pub fn new<T, F>(func: F) -> Self
    where
        T: RenderableVariant,
        F: Fn(&T, &mut RasterCanvas) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            kind: T::KIND,
            func: Box::new(move |renderable: &Renderable, canvas: &mut RasterCanvas| func(extract(renderable)?, canvas)),
        }
    }

    /// Wrap a [`Rasterizer`] implementation.
    pub fn from_rasterizer<T, R>(rasterizer: R) -> Self
    where
        T: RenderableVariant,
        R: Rasterizer<T> + Send + Sync + 'static,
    {
        Self::new(move |data: &T, canvas: &mut RasterCanvas| rasterizer.rasterize(data, canvas))
    }

    /// Kind this rasterizer accepts.
    #[must_use]
    pub fn kind(&self) -> RenderableKind {
        self.kind
    }

    /// Draw `renderable`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderableMismatch`] for a renderable of another kind.
    pub fn rasterize(&self, renderable: &Renderable, canvas: &mut RasterCanvas) -> Result<()> {
        (self.func)(renderable, canvas)
    }
}

impl fmt::Debug for FunctionalRasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalRasterizer").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Type-erased plotter bound to one renderable kind.
pub struct FunctionalPlotter {
    kind: RenderableKind,
    func: PlotFn,
}

impl FunctionalPlotter {
    /// Wrap a closure plotting renderables of type `T`.
    pub fn new<T, F>(func: F) -> Self
    where
        T: RenderableVariant,
        F: Fn(&T, &mut PlotCanvas) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            kind: T::KIND,
            func: Box::new(move |renderable: &Renderable, canvas: &mut PlotCanvas| func(extract(renderable)?, canvas)),
        }
    }

    /// Wrap a [`Plotter`] implementation.
    pub fn from_plotter<T, P>(plotter: P) -> Self
    where
        T: RenderableVariant,
        P: Plotter<T> + Send + Sync + 'static,
    {
        Self::new(move |data: &T, canvas: &mut PlotCanvas| plotter.plot(data, canvas))
    }

    /// Kind this plotter accepts.
    #[must_use]
    pub fn kind(&self) -> RenderableKind {
        self.kind
    }

    /// Plot `renderable`.
    pub fn plot(&self, renderable: &Renderable, canvas: &mut PlotCanvas) -> Result<()> {
        (self.func)(renderable, canvas)
    }
}

impl fmt::Debug for FunctionalPlotter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionalPlotter").field("kind", &self.kind).finish_non_exhaustive()
    }
}

/// Registry of rasterizers and plotters, one per renderable kind.
#[derive(Debug, Default)]
pub struct RenderingBase {
    rasterizers: HashMap<RenderableKind, FunctionalRasterizer>,
    plotters: HashMap<RenderableKind, FunctionalPlotter>,
}

impl RenderingBase {
    /// A registry without any handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in handlers configured from `printer` (braille table) and
    /// `representation` (bar chart and image parameters).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid representation values or an
    /// unreadable braille table.
    pub fn with_defaults(printer: &Printer, representation: &Representation) -> Result<Self> {
        let text = BrailleTextRasterizer::for_printer(printer)?;
        let bars = UniformTextureBarChartRasterizer::new(BarChartLayout::from_representation(representation)?, text.clone());
        let categorical = bars.clone();

        let mut base = Self::empty();
        base.register_rasterizer(FunctionalRasterizer::from_rasterizer::<BarChart, _>(bars));
        base.register_rasterizer(FunctionalRasterizer::from_rasterizer::<CategoricalBarChart, _>(categorical));
        base.register_rasterizer(FunctionalRasterizer::from_rasterizer::<Image, _>(
            ImageRasterizer::from_representation(representation),
        ));
        base.register_rasterizer(FunctionalRasterizer::from_rasterizer::<AxisMarks, _>(
            LinearMappingAxisRasterizer::new(text.clone()),
        ));
        base.register_rasterizer(FunctionalRasterizer::from_rasterizer::<BrailleText, _>(text));
        base.register_plotter(FunctionalPlotter::from_plotter::<LineChart, _>(LineChartPlotter::default()));
        Ok(base)
    }

    /// Register a rasterizer, replacing and returning any previous one of the same kind.
    pub fn register_rasterizer(&mut self, rasterizer: FunctionalRasterizer) -> Option<FunctionalRasterizer> {
        self.rasterizers.insert(rasterizer.kind(), rasterizer)
    }

    /// Register a plotter, replacing and returning any previous one of the same kind.
    pub fn register_plotter(&mut self, plotter: FunctionalPlotter) -> Option<FunctionalPlotter> {
        self.plotters.insert(plotter.kind(), plotter)
    }

    /// Whether a rasterizer handles `kind`.
    #[must_use]
    pub fn has_rasterizer(&self, kind: RenderableKind) -> bool {
        self.rasterizers.contains_key(&kind)
    }

    /// Whether a plotter handles `kind`.
    #[must_use]
    pub fn has_plotter(&self, kind: RenderableKind) -> bool {
        self.plotters.contains_key(&kind)
    }

    /// Route `renderable` to its rasterizer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRasterizer`] if no rasterizer is registered for its kind.
    pub fn rasterize(&self, renderable: &Renderable, canvas: &mut RasterCanvas) -> Result<()> {
        let kind = renderable.kind();
        self.rasterizers
            .get(&kind)
            .ok_or(Error::NoRasterizer { kind: kind.name(), stage: "rasterizer" })?
            .rasterize(renderable, canvas)
    }

    /// Route `renderable` to its plotter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRasterizer`] if no plotter is registered for its kind.
    pub fn plot(&self, renderable: &Renderable, canvas: &mut PlotCanvas) -> Result<()> {
        let kind = renderable.kind();
        self.plotters
            .get(&kind)
            .ok_or(Error::NoRasterizer { kind: kind.name(), stage: "plotter" })?
            .plot(renderable, canvas)
    }
}

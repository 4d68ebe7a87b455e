//! # brailleplot
//!
//! Layout and rasterization engine for tactile diagrams on braille embossers.
//!
//! Diagrams (bar charts, line charts, images, braille text) are laid out on the
//! physical geometry of a printer and paper format and turned into pages of
//! embossable dots: fixed braille cell grids for regular embossers, free
//! millimetre positions for floating-dot printers.
//!
//! ## Features
//!
//! - **Configuration**: validated `printer.*`, `format.<name>.*` and
//!   `representation.*` properties with built-in defaults
//! - **Layout**: nice axis intervals, rectangle carving, bar thickness search
//! - **Rasterizers**: uniform-texture bar charts, thresholded images, braille text, axes
//! - **Outputs**: cell-major printer documents, SVG and terminal previews
//!
//! ## Quick Start
//!
//! ```rust
//! use brailleplot::prelude::*;
//!
//! let config = ConfigurationParser::with_defaults()?;
//! let renderer = MasterRenderer::from_config(&config, "A4")?;
//!
//! let data = PointListContainer::from_categories([("a", 1.0), ("b", 4.5), ("c", -2.0)]);
//! let chart = BarChart::new(data)?;
//!
//! let canvas = renderer.rasterize(&chart.into())?;
//! let preview = TerminalEncoder::new().render_canvas(&canvas)?;
//! assert!(!preview.is_empty());
//! # Ok::<(), brailleplot::Error>(())
//! ```
//!
//! ## References
//!
//! - ISO/TR 11548-1 (2001). "Communication aids for blind persons: identifiers,
//!   names and assignation to coded character sets for 8-dot Braille characters."
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// unwrap() only in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Dot-grid arithmetic mixes signed, unsigned and float coordinates
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Geometric primitives (points, ranges, rectangles).
pub mod geometry;

/// Printer, format and representation configuration.
pub mod config;

/// Named point-list data containers.
pub mod data;

/// Diagram and renderable types.
pub mod diagram;

// ============================================================================
// Layout and Rendering Modules
// ============================================================================

/// Axis scaling and coordinate systems.
pub mod axis;

/// Raster and floating-dot canvases.
pub mod canvas;

/// Rasterizers, plotters and dispatch.
pub mod render;

/// Render jobs with teardown hooks.
pub mod job;

/// Output encoders (printer document, SVG, terminal).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for brailleplot operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use brailleplot::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::{Canvas, MatrixData, PlotCanvas, RasterCanvas};
    pub use crate::config::{ConfigurationParser, Format, Printer, Representation};
    pub use crate::data::{Point2, PointList, PointListContainer};
    pub use crate::diagram::{
        AxisMarks, AxisOrientation, BarChart, BrailleText, CategoricalBarChart, Image, LineChart, Renderable,
        RenderableKind,
    };
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Point, Range, Rectangle};
    pub use crate::job::RenderJob;
    pub use crate::output::{CellDocumentBuilder, SvgEncoder, TerminalEncoder};
    pub use crate::render::{MasterRenderer, Plotter, Rasterizer, RenderingBase};
}

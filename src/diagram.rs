//! Renderable descriptions: diagrams, text blocks and axis marks.
//!
//! A [`Renderable`] is what the dispatch layer routes to a rasterizer or plotter.
//! Diagrams wrap a [`PointListContainer`]; they own their data and never change it
//! during rendering.

use crate::data::{PointList, PointListContainer};
use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Title and axis names shared by all diagram types.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DiagramLabels {
    /// Diagram title.
    pub title: Option<String>,
    /// Name of the x axis.
    pub x_axis_name: Option<String>,
    /// Name of the y axis.
    pub y_axis_name: Option<String>,
}

macro_rules! diagram_labels {
    ($ty:ty) => {
        impl $ty {
            /// Diagram title, if set.
            #[must_use]
            pub fn title(&self) -> Option<&str> {
                self.labels.title.as_deref()
            }

            /// Set the diagram title.
            pub fn set_title(&mut self, title: impl Into<String>) {
                self.labels.title = Some(title.into());
            }

            /// Builder-style title.
            #[must_use]
            pub fn with_title(mut self, title: impl Into<String>) -> Self {
                self.set_title(title);
                self
            }

            /// Name of the x axis, if set.
            #[must_use]
            pub fn x_axis_name(&self) -> Option<&str> {
                self.labels.x_axis_name.as_deref()
            }

            /// Set the x axis name.
            pub fn set_x_axis_name(&mut self, name: impl Into<String>) {
                self.labels.x_axis_name = Some(name.into());
            }

            /// Name of the y axis, if set.
            #[must_use]
            pub fn y_axis_name(&self) -> Option<&str> {
                self.labels.y_axis_name.as_deref()
            }

            /// Set the y axis name.
            pub fn set_y_axis_name(&mut self, name: impl Into<String>) {
                self.labels.y_axis_name = Some(name.into());
            }
        }
    };
}

fn require_data(data: &PointListContainer) -> Result<()> {
    if data.is_empty() {
        Err(Error::EmptyData)
    } else {
        Ok(())
    }
}

/// Horizontal bar chart with one value per category.
///
/// Each series of the container is one category; its first point's y value is
/// the bar value and its name the caption.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    data: PointListContainer,
    labels: DiagramLabels,
}

impl BarChart {
    /// Create a bar chart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if the container holds no points.
    pub fn new(data: PointListContainer) -> Result<Self> {
        require_data(&data)?;
        Ok(Self { data, labels: DiagramLabels::default() })
    }

    /// Underlying data.
    #[must_use]
    pub fn data(&self) -> &PointListContainer {
        &self.data
    }

    /// Category names in order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.data.names()
    }

    /// `(name, value)` per category. Series without points count as zero.
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> {
        self.data.iter().map(|l| (l.name(), l.first().map_or(0.0, |p| p.y)))
    }

    /// Smallest category value.
    pub fn min_y(&self) -> Result<f64> {
        self.data.min_y()
    }

    /// Largest category value.
    pub fn max_y(&self) -> Result<f64> {
        self.data.max_y()
    }
}

diagram_labels!(BarChart);

/// Bar chart with several values (one per series) per category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalBarChart {
    data: PointListContainer,
    series_names: Vec<String>,
    labels: DiagramLabels,
}

impl CategoricalBarChart {
    /// Create a categorical bar chart. Each series of `data` is a category whose
    /// points hold the values of the series named in `series_names`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if the container holds no points.
    pub fn new(data: PointListContainer, series_names: Vec<String>) -> Result<Self> {
        require_data(&data)?;
        Ok(Self { data, series_names, labels: DiagramLabels::default() })
    }

    /// Underlying data.
    #[must_use]
    pub fn data(&self) -> &PointListContainer {
        &self.data
    }

    /// Names of the value series.
    #[must_use]
    pub fn series_names(&self) -> &[String] {
        &self.series_names
    }

    /// Reduce to a plain bar chart using the first value of each category.
    pub fn first_series(&self) -> Result<BarChart> {
        let data = self
            .data
            .iter()
            .map(|l| PointList::single(l.name(), l.first().map_or(0.0, |p| p.y)))
            .collect();
        let mut chart = BarChart::new(data)?;
        chart.labels = self.labels.clone();
        Ok(chart)
    }
}

diagram_labels!(CategoricalBarChart);

/// Line chart: each series is drawn as a polyline in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    data: PointListContainer,
    labels: DiagramLabels,
}

impl LineChart {
    /// Create a line chart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if the container holds no points.
    pub fn new(data: PointListContainer) -> Result<Self> {
        require_data(&data)?;
        Ok(Self { data, labels: DiagramLabels::default() })
    }

    /// Underlying data.
    #[must_use]
    pub fn data(&self) -> &PointListContainer {
        &self.data
    }
}

diagram_labels!(LineChart);

/// An RGB raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 3]>,
}

impl Image {
    /// Create an image from row-major RGB pixels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a side is zero or the pixel count does not
    /// match.
    pub fn from_rgb(width: usize, height: usize, pixels: Vec<[u8; 3]>) -> Result<Self> {
        if width == 0 || height == 0 || pixels.len() != width * height {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, pixels })
    }

    /// A single-colour image.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Result<Self> {
        Self::from_rgb(width, height, vec![rgb; width * height])
    }

    /// Decode a PNG stream. Alpha is ignored; palette, grey and 16-bit images are
    /// expanded to 8-bit RGB.
    pub fn decode_png(source: impl Read) -> Result<Self> {
        let mut decoder = png::Decoder::new(source);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        let bytes = &buf[..info.buffer_size()];

        let pixels: Vec<[u8; 3]> = match info.color_type {
            png::ColorType::Rgb => bytes.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
            png::ColorType::Rgba => bytes.chunks_exact(4).map(|c| [c[0], c[1], c[2]]).collect(),
            png::ColorType::Grayscale => bytes.iter().map(|&g| [g, g, g]).collect(),
            png::ColorType::GrayscaleAlpha => bytes.chunks_exact(2).map(|c| [c[0], c[0], c[0]]).collect(),
            png::ColorType::Indexed => {
                return Err(Error::InvalidDimensions { width: info.width as usize, height: info.height as usize })
            }
        };
        Self::from_rgb(info.width as usize, info.height as usize, pixels)
    }

    /// Load a PNG file.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::decode_png(std::io::BufReader::new(file))
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// RGB value at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn rgb(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// Braille text to place inside an area given in dots.
#[derive(Debug, Clone, PartialEq)]
pub struct BrailleText {
    /// Text to write.
    pub text: String,
    /// Target area in dots.
    pub area: Rectangle,
}

impl BrailleText {
    /// Create a text block.
    pub fn new(text: impl Into<String>, area: Rectangle) -> Self {
        Self { text: text.into(), area }
    }
}

/// Direction of an axis line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrientation {
    /// Horizontal axis; ticks point down.
    X,
    /// Vertical axis; ticks point left.
    Y,
}

/// Axis line with tick marks and per-tick labels, in dot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarks {
    /// Axis direction.
    pub orientation: AxisOrientation,
    /// Origin column.
    pub origin_x: i64,
    /// Origin row.
    pub origin_y: i64,
    /// Distance between ticks in dots.
    pub step_width: i64,
    /// Tick length in dots; zero draws no ticks.
    pub tick_size: i64,
    /// Area the axis line is clipped to.
    pub boundary: Option<Rectangle>,
    /// Tick index (negative left of / below the origin) to label text.
    pub labels: BTreeMap<i64, String>,
}

impl AxisMarks {
    /// Create an axis without boundary or labels.
    #[must_use]
    pub fn new(orientation: AxisOrientation, origin_x: i64, origin_y: i64, step_width: i64, tick_size: i64) -> Self {
        Self { orientation, origin_x, origin_y, step_width, tick_size, boundary: None, labels: BTreeMap::new() }
    }

    /// Clip the axis to `boundary`.
    #[must_use]
    pub fn with_boundary(mut self, boundary: Rectangle) -> Self {
        self.boundary = Some(boundary);
        self
    }

    /// Attach tick labels.
    #[must_use]
    pub fn with_labels(mut self, labels: BTreeMap<i64, String>) -> Self {
        self.labels = labels;
        self
    }
}

/// Tag identifying the variant of a [`Renderable`], used as registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderableKind {
    /// [`BarChart`]
    BarChart,
    /// [`CategoricalBarChart`]
    CategoricalBarChart,
    /// [`LineChart`]
    LineChart,
    /// [`Image`]
    Image,
    /// [`BrailleText`]
    BrailleText,
    /// [`AxisMarks`]
    AxisMarks,
}

impl RenderableKind {
    /// All kinds.
    pub const ALL: [RenderableKind; 6] = [
        Self::BarChart,
        Self::CategoricalBarChart,
        Self::LineChart,
        Self::Image,
        Self::BrailleText,
        Self::AxisMarks,
    ];

    /// Stable name used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BarChart => "bar_chart",
            Self::CategoricalBarChart => "categorical_bar_chart",
            Self::LineChart => "line_chart",
            Self::Image => "image",
            Self::BrailleText => "braille_text",
            Self::AxisMarks => "axis_marks",
        }
    }
}

impl std::fmt::Display for RenderableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Anything the renderer can put on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum Renderable {
    /// Horizontal bar chart.
    BarChart(BarChart),
    /// Bar chart with several series per category.
    CategoricalBarChart(CategoricalBarChart),
    /// Line chart.
    LineChart(LineChart),
    /// Raster image.
    Image(Image),
    /// Text block.
    BrailleText(BrailleText),
    /// Axis line with ticks.
    AxisMarks(AxisMarks),
}

impl Renderable {
    /// Variant tag.
    #[must_use]
    pub const fn kind(&self) -> RenderableKind {
        match self {
            Self::BarChart(_) => RenderableKind::BarChart,
            Self::CategoricalBarChart(_) => RenderableKind::CategoricalBarChart,
            Self::LineChart(_) => RenderableKind::LineChart,
            Self::Image(_) => RenderableKind::Image,
            Self::BrailleText(_) => RenderableKind::BrailleText,
            Self::AxisMarks(_) => RenderableKind::AxisMarks,
        }
    }
}

macro_rules! renderable_from {
    ($($variant:ident),*) => {
        $(impl From<$variant> for Renderable {
            fn from(value: $variant) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

renderable_from!(BarChart, CategoricalBarChart, LineChart, Image, BrailleText, AxisMarks);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Point2;

    #[test]
    fn test_empty_data_rejected() {
        assert!(matches!(BarChart::new(PointListContainer::new()), Err(Error::EmptyData)));
        assert!(matches!(LineChart::new(PointListContainer::new()), Err(Error::EmptyData)));
    }

    #[test]
    fn test_bar_chart_values() {
        let chart = BarChart::new(PointListContainer::from_categories([("x", 1.0), ("y", -2.0)]))
            .unwrap()
            .with_title("Results");
        assert_eq!(chart.title(), Some("Results"));
        assert_eq!(chart.values().collect::<Vec<_>>(), vec![("x", 1.0), ("y", -2.0)]);
        assert_eq!(chart.category_names().collect::<Vec<_>>(), vec!["x", "y"]);
    }

    #[test]
    fn test_axis_names() {
        let mut chart = BarChart::new(PointListContainer::from_categories([("x", 1.0)])).unwrap();
        assert_eq!(chart.x_axis_name(), None);
        chart.set_x_axis_name("count");
        chart.set_y_axis_name("fruit");
        assert_eq!(chart.x_axis_name(), Some("count"));
        assert_eq!(chart.y_axis_name(), Some("fruit"));
    }

    #[test]
    fn test_categorical_first_series() {
        let data: PointListContainer = [
            PointList::with_points("north", [Point2::new(0.0, 3.0), Point2::new(1.0, 7.0)]),
            PointList::with_points("south", [Point2::new(0.0, -1.0), Point2::new(1.0, 2.0)]),
        ]
        .into_iter()
        .collect();
        let mut chart = CategoricalBarChart::new(data, vec!["2018".into(), "2019".into()]).unwrap();
        chart.set_title("Sales");
        let bars = chart.first_series().unwrap();
        assert_eq!(bars.values().collect::<Vec<_>>(), vec![("north", 3.0), ("south", -1.0)]);
        assert_eq!(bars.title(), Some("Sales"));
    }

    #[test]
    fn test_image_dimensions_checked() {
        assert!(Image::from_rgb(2, 2, vec![[0, 0, 0]; 3]).is_err());
        assert!(Image::from_rgb(0, 2, vec![]).is_err());
        let img = Image::filled(2, 3, [255, 255, 255]).unwrap();
        assert_eq!(img.rgb(1, 2), Some([255, 255, 255]));
        assert_eq!(img.rgb(2, 0), None);
    }

    #[test]
    fn test_renderable_kind() {
        let text = Renderable::from(BrailleText::new("a", Rectangle::new(0.0, 0.0, 4.0, 3.0)));
        assert_eq!(text.kind(), RenderableKind::BrailleText);
        assert_eq!(RenderableKind::BarChart.to_string(), "bar_chart");
    }
}

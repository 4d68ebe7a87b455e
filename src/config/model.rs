//! Typed printer, format and representation settings.
//!
//! Validated properties of a namespace are nested on their dotted names and
//! deserialized into the structs below; optional settings carry serde defaults.

use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Braille cell geometry in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct RasterType {
    /// Dots per cell horizontally.
    pub cell_width: usize,
    /// Dots per cell vertically.
    pub cell_height: usize,
}

impl RasterType {
    /// Classic 6-dot braille (2x3).
    pub const SIX_DOT: Self = Self { cell_width: 2, cell_height: 3 };
    /// Computer braille (2x4).
    pub const EIGHT_DOT: Self = Self { cell_width: 2, cell_height: 4 };

    /// Dots per cell.
    #[must_use]
    pub const fn dots_per_cell(&self) -> usize {
        self.cell_width * self.cell_height
    }
}

impl FromStr for RasterType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ConfigInvalid {
            key: "printer.raster.type".to_string(),
            value: s.to_string(),
            message: "expected '6-dot', '8-dot' or '<width>x<height>'".to_string(),
        };
        match s.to_ascii_lowercase().as_str() {
            "6-dot" => Ok(Self::SIX_DOT),
            "8-dot" => Ok(Self::EIGHT_DOT),
            other => {
                let (w, h) = other.split_once('x').ok_or_else(invalid)?;
                let cell_width: usize = w.trim().parse().map_err(|_| invalid())?;
                let cell_height: usize = h.trim().parse().map_err(|_| invalid())?;
                if cell_width == 0 || cell_height == 0 {
                    return Err(invalid());
                }
                Ok(Self { cell_width, cell_height })
            }
        }
    }
}

impl TryFrom<String> for RasterType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Validated properties of one namespace, keyed by name relative to the namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    namespace: String,
    values: BTreeMap<String, Value>,
}

impl PropertySet {
    pub(crate) fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), values: BTreeMap::new() }
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Namespace label, e.g. `printer` or `format.A4`.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Property names in this namespace.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Whether the property is set.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Value of a property, typed by its schema.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Properties as a tree: `raster.dotDistance.horizontal` becomes
    /// `{"raster": {"dotDistance": {"horizontal": ..}}}`.
    fn to_tree(&self) -> Result<Value> {
        let mut root = Map::new();
        for (name, value) in &self.values {
            let mut parts = name.split('.').peekable();
            let mut node = &mut root;
            while let Some(part) = parts.next() {
                if parts.peek().is_none() {
                    node.insert(part.to_string(), value.clone());
                    break;
                }
                let child = node.entry(part.to_string()).or_insert_with(|| Value::Object(Map::new()));
                node = child.as_object_mut().ok_or_else(|| Error::ConfigInvalid {
                    key: format!("{}.{name}", self.namespace),
                    value: value.to_string(),
                    message: format!("'{part}' is both a value and a group"),
                })?;
            }
        }
        Ok(Value::Object(root))
    }

    /// Deserialize the namespace into a typed settings struct.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] when a value does not fit its field and
    /// [`Error::ConfigMissing`] when a required field is absent.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.to_tree()?).map_err(|e| {
            let message = e.to_string();
            match message.strip_prefix("missing field `").and_then(|m| m.split('`').next()) {
                Some(field) => Error::ConfigMissing { namespace: self.namespace.clone(), keys: vec![field.to_string()] },
                None => Error::ConfigInvalid { key: self.namespace.clone(), value: String::new(), message },
            }
        })
    }
}

/// A horizontal/vertical pair in mm.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Spacing {
    /// Horizontal component.
    pub horizontal: f64,
    /// Vertical component.
    pub vertical: f64,
}

/// Page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

/// Position and optional size limits of an area.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Constraint<T> {
    /// Top edge.
    pub top: T,
    /// Left edge.
    pub left: T,
    /// Maximum width, unbounded when absent.
    #[serde(default)]
    pub width: Option<T>,
    /// Maximum height, unbounded when absent.
    #[serde(default)]
    pub height: Option<T>,
}

/// Floating-dot capabilities of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FloatingDot {
    /// Whether dots can be placed at arbitrary positions.
    pub support: bool,
    /// Positioning resolution in mm.
    #[serde(default)]
    pub resolution: Option<f64>,
}

/// Raster geometry of a printer.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Raster {
    /// Cell geometry.
    #[serde(rename = "type")]
    pub raster_type: RasterType,
    /// Usable cell area.
    pub constraint: Constraint<i64>,
    /// Distance between dots inside a cell.
    pub dot_distance: Spacing,
    /// Gap between neighbouring cells.
    pub cell_distance: Spacing,
    /// Dot diameter in mm.
    pub dot_diameter: f64,
}

/// Embosser description (`printer.*`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    /// Printer name.
    pub name: String,
    /// Printer mode used by document builders.
    pub mode: String,
    /// Path of the braille table file.
    #[serde(default)]
    pub brailletable: Option<String>,
    /// Floating-dot capabilities.
    pub floating_dot: FloatingDot,
    /// Printable area constraint in mm.
    pub constraint: Constraint<f64>,
    /// Raster geometry.
    pub raster: Raster,
}

impl Printer {
    /// Path of the braille table file, if one is configured.
    #[must_use]
    pub fn braille_table(&self) -> Option<&str> {
        self.brailletable.as_deref()
    }

    /// Cell geometry of the printer raster.
    #[must_use]
    pub fn raster_type(&self) -> RasterType {
        self.raster.raster_type
    }

    /// Whether the printer can place dots at arbitrary positions.
    #[must_use]
    pub fn floating_dot_support(&self) -> bool {
        self.floating_dot.support
    }

    /// Floating dot positioning resolution in mm.
    #[must_use]
    pub fn floating_dot_resolution(&self) -> Option<f64> {
        self.floating_dot.resolution
    }

    /// `(horizontal, vertical)` distance between dots inside a cell, in mm.
    #[must_use]
    pub fn dot_distance(&self) -> (f64, f64) {
        (self.raster.dot_distance.horizontal, self.raster.dot_distance.vertical)
    }

    /// `(horizontal, vertical)` gap between neighbouring cells, in mm.
    #[must_use]
    pub fn cell_distance(&self) -> (f64, f64) {
        (self.raster.cell_distance.horizontal, self.raster.cell_distance.vertical)
    }

    /// Dot diameter in mm.
    #[must_use]
    pub fn dot_diameter(&self) -> f64 {
        self.raster.dot_diameter
    }

    /// Printable area constraint in mm. Width and height default to unbounded.
    #[must_use]
    pub fn constraint(&self) -> Rectangle {
        let c = &self.constraint;
        Rectangle::new(c.left, c.top, c.width.unwrap_or(f64::MAX), c.height.unwrap_or(f64::MAX))
    }

    /// Raster constraint in cells. Width and height default to unbounded.
    #[must_use]
    pub fn raster_constraint(&self) -> Rectangle {
        let c = &self.raster.constraint;
        let bound = |v: Option<i64>| v.map_or(f64::MAX, |v| v as f64);
        Rectangle::new(c.left as f64, c.top as f64, bound(c.width), bound(c.height))
    }
}

/// Page size in mm.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PageSize {
    /// Page width.
    pub width: f64,
    /// Page height.
    pub height: f64,
}

/// Paper format description (`format.<name>.*`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Format {
    #[serde(skip)]
    name: String,
    /// Page size.
    pub page: PageSize,
    /// Page margins.
    pub margin: Margins,
}

impl Format {
    /// Format with the given name and geometry.
    #[must_use]
    pub fn new(name: impl Into<String>, page: PageSize, margin: Margins) -> Self {
        Self { name: name.into(), page, margin }
    }

    pub(crate) fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Format name, e.g. `A4`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Page width in mm.
    #[must_use]
    pub fn page_width(&self) -> f64 {
        self.page.width
    }

    /// Page height in mm.
    #[must_use]
    pub fn page_height(&self) -> f64 {
        self.page.height
    }

    /// Page margins in mm.
    #[must_use]
    pub fn margins(&self) -> Margins {
        self.margin
    }

    /// Page area minus margins, in mm.
    #[must_use]
    pub fn printable_area(&self) -> Rectangle {
        let m = self.margin;
        Rectangle::new(m.left, m.top, self.page.width - m.left - m.right, self.page.height - m.top - m.bottom)
    }
}

/// General diagram settings (`representation.general.*`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Braille table language.
    #[serde(default = "default_braille_language")]
    pub braille_language: String,
    /// Word introducing legends.
    #[serde(default = "default_legend_keyword")]
    pub legend_keyword: String,
    /// Maximum number of cell rows a title may use.
    #[serde(default = "default_max_title_height")]
    pub max_title_height: usize,
}

fn default_braille_language() -> String {
    "DE_BASISSCHRIFT".to_string()
}
fn default_legend_keyword() -> String {
    "Legende".to_string()
}
fn default_max_title_height() -> usize {
    2
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            braille_language: default_braille_language(),
            legend_keyword: default_legend_keyword(),
            max_title_height: default_max_title_height(),
        }
    }
}

/// Bar chart layout (`representation.rasterizer.barChart.*`). Sizes in dots,
/// except `caption_length` in cells.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChartSettings {
    /// Largest bar thickness tried.
    #[serde(default = "default_max_bar_thickness")]
    pub max_bar_thickness: usize,
    /// Smallest acceptable bar thickness.
    #[serde(default = "default_min_bar_thickness")]
    pub min_bar_thickness: usize,
    /// Gap between neighbouring bars.
    #[serde(default = "default_bar_dot_padding")]
    pub bar_dot_padding: usize,
    /// Offset of a bar inside its first cell.
    #[serde(default = "default_bar_in_cell_padding")]
    pub bar_in_cell_padding: usize,
    /// Extra empty cells between bars.
    #[serde(default)]
    pub extra_bar_cell_padding: usize,
    /// Caption width in cells.
    #[serde(default = "default_caption_length")]
    pub caption_length: usize,
    /// `left` or `right`.
    #[serde(default = "default_caption_position")]
    pub caption_position: String,
    /// Texture pitch and value unit.
    #[serde(default = "default_texture_unit_size")]
    pub texture_unit_size: usize,
}

fn default_max_bar_thickness() -> usize {
    9
}
fn default_min_bar_thickness() -> usize {
    5
}
fn default_bar_dot_padding() -> usize {
    1
}
fn default_bar_in_cell_padding() -> usize {
    2
}
fn default_caption_length() -> usize {
    6
}
fn default_caption_position() -> String {
    "left".to_string()
}
fn default_texture_unit_size() -> usize {
    2
}

impl Default for BarChartSettings {
    fn default() -> Self {
        Self {
            max_bar_thickness: default_max_bar_thickness(),
            min_bar_thickness: default_min_bar_thickness(),
            bar_dot_padding: default_bar_dot_padding(),
            bar_in_cell_padding: default_bar_in_cell_padding(),
            extra_bar_cell_padding: 0,
            caption_length: default_caption_length(),
            caption_position: default_caption_position(),
            texture_unit_size: default_texture_unit_size(),
        }
    }
}

/// Image rasterization (`representation.rasterizer.image.*`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    /// Grey level at or below which a pixel is dark.
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    /// Snap pixel positions to the nearest dot.
    #[serde(default = "default_true")]
    pub quantified_positions: bool,
    /// Never map a pixel onto more than one dot.
    #[serde(default = "default_true")]
    pub prevent_over_stretch: bool,
    /// Use the same scale on both axes.
    #[serde(default = "default_true")]
    pub preserve_aspect_ratio: bool,
}

fn default_threshold() -> u8 {
    80
}
fn default_true() -> bool {
    true
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            quantified_positions: true,
            prevent_over_stretch: true,
            preserve_aspect_ratio: true,
        }
    }
}

/// Rasterizer settings (`representation.rasterizer.*`).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterizerSettings {
    /// Bar chart layout.
    #[serde(default)]
    pub bar_chart: BarChartSettings,
    /// Image rasterization.
    #[serde(default)]
    pub image: ImageSettings,
}

/// Floating-dot diagram settings (`representation.floatingDot.*`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingDotSettings {
    /// Minimum bar width in mm.
    #[serde(default)]
    pub min_bar_width: Option<f64>,
    /// Maximum bar width in mm.
    #[serde(default)]
    pub max_bar_width: Option<f64>,
    /// Minimum distance between bars in mm.
    #[serde(default)]
    pub min_bar_dist: Option<f64>,
    /// Draw a grid.
    #[serde(default)]
    pub grid: bool,
    /// Draw frames around bars.
    #[serde(default)]
    pub frames: bool,
    /// Draw a second y axis.
    #[serde(default)]
    pub second_axis: bool,
    /// Plot the derivative.
    #[serde(default)]
    pub derivation: bool,
    /// Dotted frames.
    #[serde(default)]
    pub dot_frame: bool,
    /// Stack bars.
    #[serde(default)]
    pub bar_accumulation: bool,
}

/// Layout parameters for diagrams (`representation.*`). Every property is optional.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Representation {
    /// General settings.
    #[serde(default)]
    pub general: GeneralSettings,
    /// Rasterizer settings.
    #[serde(default)]
    pub rasterizer: RasterizerSettings,
    /// Floating-dot settings.
    #[serde(default)]
    pub floating_dot: FloatingDotSettings,
}

//! Horizontal bar charts with a uniform texture on the braille cell grid.
//!
//! Layout works in cells first: a title strip on top, a two-cell x-axis strip at
//! the bottom, a caption column on one side and one spare cell on the right for
//! the y-axis. The remaining bar area is split into negative and positive value
//! units of `texture_unit` dots each, and bars are stacked bottom-up with the
//! largest odd thickness that fits all categories.
//!
//! [`UniformTextureBarChartRasterizer::plan`] computes the whole layout up
//! front so that a layout failure never leaves a half-drawn page.

use super::axis::LinearMappingAxisRasterizer;
use super::primitives::{dotted_vertical, fill, rectangle};
use super::text::BrailleTextRasterizer;
use super::Rasterizer;
use crate::canvas::{Canvas, MatrixData, RasterCanvas};
use crate::config::Representation;
use crate::diagram::{AxisMarks, AxisOrientation, BarChart, BrailleText, CategoricalBarChart};
use crate::error::{Error, Result};
use crate::geometry::Rectangle;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Candidate axis steps per order of magnitude, smallest first.
const UNIT_SCALINGS: [f64; 5] = [0.1, 0.125, 0.25, 0.5, 1.0];

/// Height of the x-axis strip in cells.
const X_AXIS_CELLS: f64 = 2.0;

/// Side of the bars the category captions are written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionPosition {
    /// Captions left of the bars.
    #[default]
    Left,
    /// Captions right of the bars.
    Right,
}

impl FromStr for CaptionPosition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(Error::ConfigInvalid {
                key: "representation.rasterizer.barChart.captionPosition".to_string(),
                value: s.to_string(),
                message: "expected 'left' or 'right'".to_string(),
            }),
        }
    }
}

/// Tunable bar chart layout parameters. Sizes are in dots unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarChartLayout {
    /// Largest bar thickness tried; made odd if even.
    pub max_thickness: usize,
    /// Smallest acceptable bar thickness.
    pub min_thickness: usize,
    /// Empty dot rows between neighbouring bars.
    pub bar_dot_padding: usize,
    /// Empty dot rows between a bar and the bottom of its reference cell.
    pub bar_in_cell_padding: usize,
    /// Extra empty cells between neighbouring bars.
    pub extra_bar_cell_padding: usize,
    /// Caption width in cells.
    pub caption_length: usize,
    /// Caption side.
    pub caption_position: CaptionPosition,
    /// Width of one texture unit (one value step) in dots.
    pub texture_unit: usize,
    /// Maximum title height in cells.
    pub max_title_rows: usize,
}

impl Default for BarChartLayout {
    fn default() -> Self {
        Self {
            max_thickness: 9,
            min_thickness: 5,
            bar_dot_padding: 1,
            bar_in_cell_padding: 2,
            extra_bar_cell_padding: 0,
            caption_length: 6,
            caption_position: CaptionPosition::Left,
            texture_unit: 2,
            max_title_rows: 2,
        }
    }
}

impl BarChartLayout {
    /// Read `rasterizer.barChart.*` and `general.maxTitleHeight`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for an unknown caption position or a
    /// maximum bar thickness below the minimum.
    pub fn from_representation(representation: &Representation) -> Result<Self> {
        let s = &representation.rasterizer.bar_chart;
        let layout = Self {
            max_thickness: s.max_bar_thickness,
            min_thickness: s.min_bar_thickness,
            bar_dot_padding: s.bar_dot_padding,
            bar_in_cell_padding: s.bar_in_cell_padding,
            extra_bar_cell_padding: s.extra_bar_cell_padding,
            caption_length: s.caption_length,
            caption_position: s.caption_position.parse()?,
            texture_unit: s.texture_unit_size.max(1),
            max_title_rows: representation.general.max_title_height,
        };
        layout.check_thickness_bounds()?;
        Ok(layout)
    }

    /// Reject a maximum bar thickness below the minimum.
    fn check_thickness_bounds(&self) -> Result<()> {
        if self.max_thickness < self.min_thickness {
            return Err(Error::ConfigInvalid {
                key: "representation.rasterizer.barChart.maxBarThickness".to_string(),
                value: self.max_thickness.to_string(),
                message: format!("must not be below minBarThickness ({})", self.min_thickness),
            });
        }
        Ok(())
    }

    /// Cells needed to stack `categories` bars of `thickness` dots in cells
    /// `cell_height` dots high.
    #[must_use]
    pub fn required_cells(&self, thickness: usize, categories: usize, cell_height: usize) -> usize {
        let bar_size = self.bar_in_cell_padding + thickness;
        let size_inclusive = bar_size + self.extra_bar_cell_padding * cell_height + self.bar_dot_padding + 1;
        let bar_cells = bar_size.div_ceil(cell_height);
        let cells_inclusive = size_inclusive.div_ceil(cell_height);
        bar_cells + (cells_inclusive - 1) * categories.saturating_sub(1)
    }

    /// Largest odd thickness not above the maximum whose bars fit `available_cells`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] if the maximum is below the minimum and
    /// [`Error::InsufficientArea`] once the candidate drops below the minimum.
    pub fn find_thickness(&self, categories: usize, available_cells: usize, cell_height: usize) -> Result<usize> {
        self.check_thickness_bounds()?;
        let mut thickness = self.max_thickness as i64;
        if thickness % 2 == 0 {
            thickness += 1;
        }
        loop {
            let required = self.required_cells(thickness.max(0) as usize, categories, cell_height);
            if required <= available_cells {
                return Ok(thickness as usize);
            }
            thickness -= 2;
            if thickness < self.min_thickness as i64 {
                return Err(Error::insufficient_area(format!(
                    "Not enough space to render given amount of categories in bar chart. \
                     {categories} categories given. {required} cells required but only \
                     {available_cells} available. (Minimum bar thickness is set to {} dots)",
                    self.min_thickness
                )));
            }
        }
    }
}

/// Smallest step from [`UNIT_SCALINGS`] × 10^k that fits `range` into `units`.
#[must_use]
pub(crate) fn axis_step(range: f64, units: usize) -> f64 {
    let min_per_unit = range / units as f64;
    if min_per_unit <= 0.0 || !min_per_unit.is_finite() {
        return 1.0;
    }
    let order = 10f64.powf(min_per_unit.log10().ceil());
    UNIT_SCALINGS
        .iter()
        .map(|s| s * order)
        .find(|step| *step >= min_per_unit)
        .unwrap_or(order)
}

/// Split `units` between the negative and positive value range.
///
/// The side with the smaller magnitude is rounded; the other side takes the rest,
/// so both always sum to `units`.
#[must_use]
pub(crate) fn split_units(negative: f64, positive: f64, units: usize) -> (usize, usize) {
    let total = negative + positive;
    if total <= 0.0 {
        return (0, units);
    }
    let share = |part: f64| ((part / total) * units as f64).round().clamp(0.0, units as f64) as usize;
    if negative <= positive {
        let neg = share(negative);
        (neg, units - neg)
    } else {
        let pos = share(positive);
        (units - pos, pos)
    }
}

/// Geometry of one bar in dots.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlan {
    /// Category value.
    pub value: f64,
    /// Signed bar length in dots.
    pub length: i64,
    /// Column of the bar's axis side.
    pub lower_x: i64,
    /// Bottom row of the bar.
    pub lower_y: i64,
    /// Column of the bar's value end.
    pub upper_x: i64,
    /// Top row of the bar.
    pub upper_y: i64,
    /// Category caption.
    pub caption: BrailleText,
}

/// Complete bar chart layout, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartPlan {
    /// Title text placed in the title strip.
    pub title: Option<BrailleText>,
    /// Area left for the bars, in cells.
    pub bar_area: Rectangle,
    /// X-axis strip, in cells.
    pub x_axis_area: Rectangle,
    /// Texture units across the bar area.
    pub available_units: usize,
    /// Value covered by one texture unit.
    pub step: f64,
    /// Units left of the zero axis.
    pub negative_units: usize,
    /// Units right of the zero axis.
    pub positive_units: usize,
    /// Cell column holding the zero axis.
    pub origin_cell_x: i64,
    /// Bar thickness in dots.
    pub thickness: usize,
    /// Bars bottom-up, in category order.
    pub bars: Vec<BarPlan>,
    /// Vertical axis through the zero column.
    pub y_axis: AxisMarks,
    /// Horizontal axis with lettered ticks.
    pub x_axis: AxisMarks,
}

/// Bar chart rasterizer filling bars with alternating solid and dotted columns.
#[derive(Debug, Clone, Default)]
pub struct UniformTextureBarChartRasterizer {
    layout: BarChartLayout,
    text: BrailleTextRasterizer,
    axis: LinearMappingAxisRasterizer,
}

impl UniformTextureBarChartRasterizer {
    /// Rasterizer with `layout`, writing captions with `text`.
    #[must_use]
    pub fn new(layout: BarChartLayout, text: BrailleTextRasterizer) -> Self {
        let axis = LinearMappingAxisRasterizer::new(text.clone());
        Self { layout, text, axis }
    }

    /// Layout parameters.
    #[must_use]
    pub fn layout(&self) -> &BarChartLayout {
        &self.layout
    }

    /// Compute the layout for `chart` on `canvas` without drawing.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRaster`] unless cells are 2 dots wide and 3 or 4 dots high
    /// - [`Error::InsufficientArea`] if the strips, units or bars do not fit
    pub fn plan(&self, chart: &BarChart, canvas: &RasterCanvas) -> Result<BarChartPlan> {
        let (w, h) = (canvas.cell_width(), canvas.cell_height());
        if w != 2 || !(3..=4).contains(&h) {
            return Err(Error::InvalidRaster { cell_width: w, cell_height: h });
        }
        let layout = &self.layout;
        let texture = layout.texture_unit as i64;

        let mut bar_area = canvas.cell_rectangle();
        let title = chart.title().map(|t| self.fit_title(t, bar_area, canvas)).transpose()?;
        let title_dots = match &title {
            Some(t) => self.text.required_height(t, bar_area.as_int().width.max(0) as usize * w, canvas)?,
            None => 0,
        };
        let (title_area, x_axis_area) = self
            .carve(&mut bar_area, canvas.cell_y_from_dot_y(title_dots as i64))
            .map_err(|e| Error::insufficient_area_from("Not enough space to build bar chart layout", e))?;
        let bar = bar_area.as_int();

        let negative = chart.min_y()?.min(0.0).abs();
        let positive = chart.max_y()?.max(0.0);
        let available_units = (bar.width.max(0) as usize * w) / layout.texture_unit;
        if available_units == 0 {
            return Err(Error::insufficient_area("Not enough space to build bar chart layout: no value units fit"));
        }
        let step = axis_step(negative + positive, available_units);
        let (negative_units, positive_units) = split_units(negative, positive, available_units);
        let origin_cell_x = bar.x + canvas.cell_x_from_dot_x(negative_units as i64 * texture);

        let categories = chart.data().len();
        let thickness = layout.find_thickness(categories, bar.height.max(0) as usize, h)?;
        debug!(
            available_units,
            step, negative_units, positive_units, origin_cell_x, thickness, categories, "bar chart layout"
        );

        let mut bars = Vec::with_capacity(categories);
        let mut ref_cell_y = bar.bottom();
        for (name, value) in chart.values() {
            // rounding per bar may exceed the rounded split of the units
            let units = ((value / step).round() as i64).clamp(-(negative_units as i64), positive_units as i64);
            let length = units * texture;
            let plan = self.plan_bar(canvas, origin_cell_x, ref_cell_y, length, thickness as i64, name, value)?;
            ref_cell_y = canvas.cell_y_from_dot_y(plan.upper_y - (layout.bar_dot_padding as i64 + 1))
                - layout.extra_bar_cell_padding as i64;
            bars.push(plan);
        }

        let (wf, hf) = (w as f64, h as f64);
        let y_bound = bar_area.scaled_by(wf, hf);
        let x_bound = x_axis_area.scaled_by(wf, hf);
        let origin_x = (origin_cell_x + 1) * w as i64 - 1;
        let origin_y = x_bound.as_int().y;

        let y_axis = AxisMarks::new(AxisOrientation::Y, origin_x, origin_y, 1, 0).with_boundary(y_bound);
        let labels: BTreeMap<i64, String> = (-((negative_units / 2) as i64)..=(positive_units / 2) as i64)
            .enumerate()
            .map(|(i, tick)| (tick, char::from(b'a' + (i % 26) as u8).to_string()))
            .collect();
        if labels.len() > 26 {
            warn!(ticks = labels.len(), "x-axis tick letters repeat after 'z'");
        }
        let x_axis = AxisMarks::new(AxisOrientation::X, origin_x, origin_y, texture * 2, 2)
            .with_boundary(x_bound)
            .with_labels(labels);

        Ok(BarChartPlan {
            title: title.map(|t| BrailleText::new(t, title_area.scaled_by(wf, hf))),
            bar_area,
            x_axis_area,
            available_units,
            step,
            negative_units,
            positive_units,
            origin_cell_x,
            thickness,
            bars,
            y_axis,
            x_axis,
        })
    }

    /// Title shortened to the maximum title height, if necessary.
    fn fit_title(&self, title: &str, area: Rectangle, canvas: &RasterCanvas) -> Result<String> {
        let per_line = area.as_int().width.max(0) as usize;
        let max_cells = per_line * self.layout.max_title_rows;
        let fitted = self.text.truncate_to_cells(title, max_cells)?;
        if fitted.len() < title.len() {
            warn!(title, max_rows = self.layout.max_title_rows, cell_height = canvas.cell_height(), "bar chart title truncated");
        }
        Ok(fitted.to_string())
    }

    /// Carve title, x-axis, caption and y-axis strips off `area`; returns the
    /// title and x-axis strips.
    fn carve(&self, area: &mut Rectangle, title_rows: i64) -> Result<(Rectangle, Rectangle)> {
        let title = area.remove_from_top(title_rows as f64)?;
        let x_axis = area.remove_from_bottom(X_AXIS_CELLS)?;
        let caption = self.layout.caption_length as f64;
        match self.layout.caption_position {
            CaptionPosition::Left => area.remove_from_left(caption)?,
            CaptionPosition::Right => area.remove_from_right(caption)?,
        };
        area.remove_from_right(1.0)?;
        Ok((title, x_axis))
    }

    #[allow(clippy::too_many_arguments)]
    fn plan_bar(
        &self,
        canvas: &RasterCanvas,
        cell_x: i64,
        cell_y: i64,
        length: i64,
        thickness: i64,
        name: &str,
        value: f64,
    ) -> Result<BarPlan> {
        let (w, h) = (canvas.cell_width() as i64, canvas.cell_height() as i64);
        let layout = &self.layout;
        let caption_len = layout.caption_length as i64;

        let lower_x = (cell_x + 1) * w - 1;
        let lower_y = (cell_y + 1) * h - 1 - layout.bar_in_cell_padding as i64;
        let upper_x = lower_x + length;
        let upper_y = lower_y - (thickness - 1);

        let caption = self.text.truncate_to_cells(name, layout.caption_length)?;
        if caption.len() < name.len() {
            warn!(category = name, caption, "bar caption truncated");
        }

        let cells = canvas.cell_rectangle().as_int();
        let caption_y = canvas.cell_y_from_dot_y(upper_y + thickness / 2);
        let caption_x = match layout.caption_position {
            CaptionPosition::Left => canvas.cell_x_from_dot_x(lower_x.min(upper_x) - 1) - caption_len,
            CaptionPosition::Right => canvas.cell_x_from_dot_x(lower_x.max(upper_x) + 1),
        }
        .clamp(cells.x, (cells.x + cells.width - caption_len).max(cells.x));
        let area = Rectangle::new(caption_x as f64, caption_y as f64, caption_len as f64, 1.0).scaled_by(w as f64, h as f64);

        Ok(BarPlan {
            value,
            length,
            lower_x,
            lower_y,
            upper_x,
            upper_y,
            caption: BrailleText::new(caption, area),
        })
    }

    /// Draw a planned chart onto the current page.
    pub fn draw(&self, plan: &BarChartPlan, canvas: &mut RasterCanvas) -> Result<()> {
        if let Some(title) = &plan.title {
            self.text.rasterize(title, canvas)?;
        }
        for bar in &plan.bars {
            draw_bar(canvas.current_page_mut(), bar, self.layout.texture_unit as i64);
            self.text.rasterize(&bar.caption, canvas)?;
        }
        self.axis.rasterize(&plan.y_axis, canvas)?;
        self.axis.rasterize(&plan.x_axis, canvas)?;
        trace!(bars = plan.bars.len(), "bar chart drawn");
        Ok(())
    }
}

/// Outline the bar and fill it with solid and dotted columns one texture unit apart.
fn draw_bar(page: &mut MatrixData<bool>, bar: &BarPlan, texture: i64) {
    rectangle(page, bar.lower_x, bar.lower_y, bar.upper_x, bar.upper_y, true);
    let step = (bar.upper_x - bar.lower_x).signum() * texture;
    if step == 0 {
        return;
    }
    let mut x = bar.lower_x;
    let mut solid = true;
    while x != bar.upper_x {
        if solid {
            fill(page, x, bar.lower_y, x, bar.upper_y, true);
        } else {
            dotted_vertical(page, x, bar.lower_y, bar.upper_y, true);
        }
        solid = !solid;
        x += step;
    }
}

impl Rasterizer<BarChart> for UniformTextureBarChartRasterizer {
    fn rasterize(&self, chart: &BarChart, canvas: &mut RasterCanvas) -> Result<()> {
        let plan = self.plan(chart, canvas)?;
        self.draw(&plan, canvas)
    }
}

impl Rasterizer<CategoricalBarChart> for UniformTextureBarChartRasterizer {
    fn rasterize(&self, chart: &CategoricalBarChart, canvas: &mut RasterCanvas) -> Result<()> {
        Rasterizer::<BarChart>::rasterize(self, &chart.first_series()?, canvas)
    }
}

//! Axis lines with tick marks and braille tick labels.

use super::primitives::{draw_line, fill};
use super::text::BrailleTextRasterizer;
use super::Rasterizer;
use crate::canvas::{Canvas, RasterCanvas};
use crate::diagram::{AxisMarks, AxisOrientation, BrailleText};
use crate::error::Result;
use crate::geometry::Rectangle;
use tracing::trace;

/// Draws [`AxisMarks`] by mapping tick indices linearly onto dot positions.
///
/// X axes run along `origin_y` with ticks hanging below the line and labels one
/// cell row under the ticks. Y axes run along `origin_x` with ticks to the left
/// and labels in the cell left of the tick.
#[derive(Debug, Clone, Default)]
pub struct LinearMappingAxisRasterizer {
    text: BrailleTextRasterizer,
}

impl LinearMappingAxisRasterizer {
    /// Axis rasterizer writing labels with `text`.
    #[must_use]
    pub fn new(text: BrailleTextRasterizer) -> Self {
        Self { text }
    }

    fn label_areas(&self, axis: &AxisMarks, canvas: &RasterCanvas, bounds: Rectangle) -> Result<Vec<BrailleText>> {
        let (w, h) = (canvas.cell_width() as i64, canvas.cell_height() as i64);
        let dots = canvas.dot_rectangle();
        let mut labels = Vec::new();

        for (index, text) in &axis.labels {
            let Some(position) = tick_position(axis, *index, bounds) else {
                trace!(index, "axis label outside boundary");
                continue;
            };
            let cells = self.text.length_in_cells(text)? as i64;
            let (cell_x, cell_y) = match axis.orientation {
                AxisOrientation::X => (
                    canvas.cell_x_from_dot_x(position),
                    canvas.cell_y_from_dot_y(axis.origin_y + axis.tick_size) + 1,
                ),
                AxisOrientation::Y => (
                    canvas.cell_x_from_dot_x(axis.origin_x - axis.tick_size - 1) - (cells - 1),
                    canvas.cell_y_from_dot_y(position),
                ),
            };
            let area = Rectangle::new((cell_x * w) as f64, (cell_y * h) as f64, (cells * w) as f64, h as f64);
            if dots.intersected_with(&area) != area {
                trace!(index, "axis label outside canvas");
                continue;
            }
            labels.push(BrailleText::new(text.clone(), area));
        }
        Ok(labels)
    }
}

/// Dot coordinate of tick `index` along the axis, if it lies within `bounds`.
fn tick_position(axis: &AxisMarks, index: i64, bounds: Rectangle) -> Option<i64> {
    let b = bounds.as_int();
    match axis.orientation {
        AxisOrientation::X => {
            let x = axis.origin_x + index * axis.step_width;
            (x >= b.x && x <= b.right()).then_some(x)
        }
        AxisOrientation::Y => {
            let y = axis.origin_y - index * axis.step_width;
            (y >= b.y && y <= b.bottom()).then_some(y)
        }
    }
}

impl Rasterizer<AxisMarks> for LinearMappingAxisRasterizer {
    fn rasterize(&self, axis: &AxisMarks, canvas: &mut RasterCanvas) -> Result<()> {
        let bounds = axis.boundary.unwrap_or_else(|| canvas.dot_rectangle());
        let labels = self.label_areas(axis, canvas, bounds)?;
        let b = bounds.as_int();

        let page = canvas.current_page_mut();
        match axis.orientation {
            AxisOrientation::X => draw_line(page, b.x, axis.origin_y, b.right(), axis.origin_y, true),
            AxisOrientation::Y => draw_line(page, axis.origin_x, b.y, axis.origin_x, b.bottom(), true),
        }

        if axis.tick_size > 0 && axis.step_width > 0 {
            let (lo, hi) = match axis.orientation {
                AxisOrientation::X => {
                    ((b.x - axis.origin_x).div_euclid(axis.step_width), (b.right() - axis.origin_x).div_euclid(axis.step_width))
                }
                AxisOrientation::Y => {
                    ((axis.origin_y - b.bottom()).div_euclid(axis.step_width), (axis.origin_y - b.y).div_euclid(axis.step_width))
                }
            };
            for index in lo..=hi {
                let Some(position) = tick_position(axis, index, bounds) else { continue };
                match axis.orientation {
                    AxisOrientation::X => {
                        fill(page, position, axis.origin_y + 1, position, axis.origin_y + axis.tick_size, true);
                    }
                    AxisOrientation::Y => {
                        fill(page, axis.origin_x - axis.tick_size, position, axis.origin_x - 1, position, true);
                    }
                }
            }
        }

        trace!(orientation = ?axis.orientation, labels = labels.len(), "axis drawn");
        for label in &labels {
            self.text.rasterize(label, canvas)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;
    use std::collections::BTreeMap;

    fn canvas() -> RasterCanvas {
        RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    #[test]
    fn test_x_axis_line_and_ticks() {
        let mut c = canvas();
        let axis = AxisMarks::new(AxisOrientation::X, 9, 30, 4, 2)
            .with_boundary(Rectangle::new(0.0, 30.0, 20.0, 6.0));
        LinearMappingAxisRasterizer::default().rasterize(&axis, &mut c).unwrap();
        let page = c.current_page();

        for x in 0..20 {
            assert_eq!(page.get(30, x), Some(true), "axis line at column {x}");
        }
        assert_eq!(page.get(30, 20), Some(false));
        // ticks at 1, 5, 9, 13, 17
        for x in [1, 5, 9, 13, 17] {
            assert_eq!(page.get(31, x), Some(true));
            assert_eq!(page.get(32, x), Some(true));
        }
        assert_eq!(page.get(31, 3), Some(false));
        assert_eq!(page.count_set(), 20 + 5 * 2);
    }

    #[test]
    fn test_y_axis_without_ticks() {
        let mut c = canvas();
        let axis = AxisMarks::new(AxisOrientation::Y, 15, 30, 1, 0)
            .with_boundary(Rectangle::new(12.0, 0.0, 20.0, 30.0));
        LinearMappingAxisRasterizer::default().rasterize(&axis, &mut c).unwrap();
        let page = c.current_page();
        assert_eq!(page.count_set(), 30);
        assert_eq!(page.get(0, 15), Some(true));
        assert_eq!(page.get(29, 15), Some(true));
    }

    #[test]
    fn test_x_axis_labels_below_ticks() {
        let mut c = canvas();
        let labels: BTreeMap<i64, String> = [(-1, "a".to_string()), (0, "b".to_string()), (9, "z".to_string())].into();
        let axis = AxisMarks::new(AxisOrientation::X, 9, 30, 4, 2)
            .with_boundary(Rectangle::new(0.0, 30.0, 20.0, 6.0))
            .with_labels(labels);
        LinearMappingAxisRasterizer::default().rasterize(&axis, &mut c).unwrap();
        let page = c.current_page();
        // 'a' (dot 1) for tick x = 5 lands in cell column 2, cell row 11 (dot row 33)
        assert_eq!(page.get(33, 4), Some(true));
        // 'b' (dots 1 2) for tick x = 9 lands in cell column 4
        assert_eq!(page.get(33, 8), Some(true));
        assert_eq!(page.get(34, 8), Some(true));
        // tick 9 lies outside the boundary: no label
        assert_eq!(page.count_set(), 20 + 5 * 2 + 1 + 2);
    }
}

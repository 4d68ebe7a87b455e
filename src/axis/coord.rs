use super::{Axis, MetricAxis, NominalAxis};
use crate::config::Margins;
use crate::error::Result;
use crate::geometry::{Point, Range, Rectangle};

/// Two axes mapped onto a drawable area in mm.
///
/// The drawable area is `area` minus `margins`; virtual y grows upward while
/// physical y grows downward.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateSystem {
    x_axis: Axis,
    y_axis: Axis,
    origin: Point,
    size: Point,
}

impl CoordinateSystem {
    /// Combine prepared axes with an area.
    #[must_use]
    pub fn new(x_axis: Axis, y_axis: Axis, area: Rectangle, margins: Margins) -> Self {
        let (origin, size) = drawable(area, margins);
        Self { x_axis, y_axis, origin, size }
    }

    /// Two metric axes fitted to the drawable size.
    pub fn metric(x_range: Range, y_range: Range, area: Rectangle, margins: Margins) -> Result<Self> {
        let (origin, size) = drawable(area, margins);
        Ok(Self {
            x_axis: MetricAxis::new(x_range, size.x)?.into(),
            y_axis: MetricAxis::new(y_range, size.y)?.into(),
            origin,
            size,
        })
    }

    /// A nominal x axis over `categories` and a metric y axis.
    pub fn nominal_x(categories: Vec<String>, y_range: Range, area: Rectangle, margins: Margins) -> Result<Self> {
        let (origin, size) = drawable(area, margins);
        Ok(Self {
            x_axis: NominalAxis::new(categories, size.x)?.into(),
            y_axis: MetricAxis::new(y_range, size.y)?.into(),
            origin,
            size,
        })
    }

    /// Horizontal axis.
    #[must_use]
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// Vertical axis.
    #[must_use]
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Top-left corner of the drawable area.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Drawable width (`x`) and height (`y`).
    #[must_use]
    pub fn size(&self) -> Point {
        self.size
    }

    /// Map a virtual point to mm.
    #[must_use]
    pub fn convert(&self, x: f64, y: f64) -> Point {
        let xr = self.x_axis.range();
        let yr = self.y_axis.range();
        Point::new(
            self.origin.x + (x - xr.from) * self.size.x / xr.distance(),
            self.origin.y + self.size.y - (y - yr.from) * self.size.y / yr.distance(),
        )
    }

    /// Map a virtual point shifted by each axis' point offset.
    #[must_use]
    pub fn convert_with_offset(&self, x: f64, y: f64) -> Point {
        self.convert(x + self.x_axis.point_offset(), y + self.y_axis.point_offset())
    }

    /// Map a virtual x distance to mm.
    #[must_use]
    pub fn convert_x_distance(&self, distance: f64) -> f64 {
        distance * self.size.x / self.x_axis.range().distance()
    }

    /// Map a virtual y distance to mm.
    #[must_use]
    pub fn convert_y_distance(&self, distance: f64) -> f64 {
        distance * self.size.y / self.y_axis.range().distance()
    }

    /// Physical distance between two virtual points.
    #[must_use]
    pub fn convert_distance(&self, a: Point, b: Point) -> f64 {
        self.convert(a.x, a.y).distance(self.convert(b.x, b.y))
    }

    /// Label for an x value.
    #[must_use]
    pub fn format_x(&self, x: f64) -> Option<String> {
        self.x_axis.format_label(x)
    }

    /// Label for a y value.
    #[must_use]
    pub fn format_y(&self, y: f64) -> Option<String> {
        self.y_axis.format_label(y)
    }
}

fn drawable(area: Rectangle, margins: Margins) -> (Point, Point) {
    (
        Point::new(area.x + margins.left, area.y + margins.top),
        Point::new(
            (area.width - margins.left - margins.right).max(0.0),
            (area.height - margins.top - margins.bottom).max(0.0),
        ),
    )
}

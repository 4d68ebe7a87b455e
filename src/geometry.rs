//! Geometric primitives for layout.
//!
//! Rectangles live in an implicit unit system (cells, dots or millimetres). Callers
//! are responsible for keeping track of which one; [`Rectangle::scaled_by`] is the only
//! conversion between them.

use crate::error::{Error, Result};

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Translate the point by the given offsets.
    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A closed real interval `[from, to]`.
///
/// Axis construction mutates ranges while searching for tick intervals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range {
    /// Lower bound.
    pub from: f64,
    /// Upper bound.
    pub to: f64,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Signed length of the interval.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.to - self.from
    }

    /// Check whether `value` lies inside the range (inclusive, with a small relative
    /// tolerance for accumulated rounding).
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let tolerance = 1e-9 * self.from.abs().max(self.to.abs()).max(1.0);
        value >= self.from - tolerance && value <= self.to + tolerance
    }

    /// Check whether `other` lies completely inside this range.
    #[must_use]
    pub fn encloses(&self, other: &Range) -> bool {
        self.contains(other.from) && self.contains(other.to)
    }
}

/// Which side of a rectangle a strip is carved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Smaller y.
    Top,
    /// Larger y.
    Bottom,
    /// Smaller x.
    Left,
    /// Larger x.
    Right,
}

/// A rectangle defined by position and size.
///
/// Invariant: `width >= 0` and `height >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rectangle {
    /// X coordinate of the top-left corner.
    pub x: f64,
    /// Y coordinate of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

impl Rectangle {
    /// Create a new rectangle. Negative sizes are clamped to zero.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width: width.max(0.0), height: height.max(0.0) }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Get the area of the rectangle.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether either extent is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Remove a strip of size `amount` from the given side and return it.
    ///
    /// On failure the rectangle is left untouched.
    pub fn remove_from(&mut self, side: Side, amount: f64) -> Result<Rectangle> {
        let available = match side {
            Side::Top | Side::Bottom => self.height,
            Side::Left | Side::Right => self.width,
        };
        if !(0.0..=available).contains(&amount) {
            return Err(Error::OutOfSpace { requested: amount, available });
        }

        let strip = match side {
            Side::Top => {
                let strip = Rectangle::new(self.x, self.y, self.width, amount);
                self.y += amount;
                self.height -= amount;
                strip
            }
            Side::Bottom => {
                self.height -= amount;
                Rectangle::new(self.x, self.y + self.height, self.width, amount)
            }
            Side::Left => {
                let strip = Rectangle::new(self.x, self.y, amount, self.height);
                self.x += amount;
                self.width -= amount;
                strip
            }
            Side::Right => {
                self.width -= amount;
                Rectangle::new(self.x + self.width, self.y, amount, self.height)
            }
        };
        Ok(strip)
    }

    /// Remove a strip from the top.
    pub fn remove_from_top(&mut self, amount: f64) -> Result<Rectangle> {
        self.remove_from(Side::Top, amount)
    }

    /// Remove a strip from the bottom.
    pub fn remove_from_bottom(&mut self, amount: f64) -> Result<Rectangle> {
        self.remove_from(Side::Bottom, amount)
    }

    /// Remove a strip from the left.
    pub fn remove_from_left(&mut self, amount: f64) -> Result<Rectangle> {
        self.remove_from(Side::Left, amount)
    }

    /// Remove a strip from the right.
    pub fn remove_from_right(&mut self, amount: f64) -> Result<Rectangle> {
        self.remove_from(Side::Right, amount)
    }

    /// Overlap of two rectangles. Disjoint rectangles yield a zero-sized rectangle.
    #[must_use]
    pub fn intersected_with(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rectangle::new(x, y, right - x, bottom - y)
    }

    /// Multiply position and size by per-axis factors (e.g. cells to dots).
    #[must_use]
    pub fn scaled_by(&self, fx: f64, fy: f64) -> Rectangle {
        Rectangle::new(self.x * fx, self.y * fy, self.width * fx, self.height * fy)
    }

    /// Integer view of the rectangle.
    #[must_use]
    pub fn as_int(&self) -> IntRect {
        IntRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: self.width.round() as i64,
            height: self.height.round() as i64,
        }
    }
}

/// Integer view of a [`Rectangle`], used for cell and dot addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntRect {
    /// Left column.
    pub x: i64,
    /// Top row.
    pub y: i64,
    /// Number of columns.
    pub width: i64,
    /// Number of rows.
    pub height: i64,
}

impl IntRect {
    /// Last column inside the rectangle.
    #[must_use]
    pub const fn right(&self) -> i64 {
        self.x + self.width - 1
    }

    /// Last row inside the rectangle.
    #[must_use]
    pub const fn bottom(&self) -> i64 {
        self.y + self.height - 1
    }

    /// Whether the grid position lies inside.
    #[must_use]
    pub const fn contains(&self, column: i64, row: i64) -> bool {
        column >= self.x && column <= self.right() && row >= self.y && row <= self.bottom()
    }
}

impl From<IntRect> for Rectangle {
    fn from(r: IntRect) -> Self {
        Rectangle::new(r.x as f64, r.y as f64, r.width as f64, r.height as f64)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn side() -> impl Strategy<Value = Side> {
        prop_oneof![Just(Side::Top), Just(Side::Bottom), Just(Side::Left), Just(Side::Right)]
    }

    proptest! {
        /// Carving splits a rectangle into two disjoint pieces covering the original.
        #[test]
        fn prop_carve_partitions_rectangle(
            x in -100i32..100,
            y in -100i32..100,
            w in 0i32..200,
            h in 0i32..200,
            frac in 0.0f64..=1.0,
            side in side(),
        ) {
            let original = Rectangle::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h));
            let extent = match side {
                Side::Top | Side::Bottom => original.height,
                Side::Left | Side::Right => original.width,
            };
            let n = (extent * frac).floor();

            let mut rest = original;
            let strip = rest.remove_from(side, n).unwrap();

            prop_assert!((strip.area() + rest.area() - original.area()).abs() < 1e-9);
            prop_assert!(rest.intersected_with(&strip).area() < 1e-9);
            prop_assert_eq!(original.intersected_with(&strip), strip);
            prop_assert_eq!(original.intersected_with(&rest), rest);
        }

        /// Over-carving always fails and never mutates.
        #[test]
        fn prop_over_carve_fails(
            w in 0i32..200,
            h in 0i32..200,
            extra in 1i32..50,
            side in side(),
        ) {
            let original = Rectangle::new(0.0, 0.0, f64::from(w), f64::from(h));
            let extent = match side {
                Side::Top | Side::Bottom => original.height,
                Side::Left | Side::Right => original.width,
            };
            let mut rect = original;
            let is_out_of_space = matches!(
                rect.remove_from(side, extent + f64::from(extra)),
                Err(Error::OutOfSpace { .. })
            );
            prop_assert!(is_out_of_space);
            prop_assert_eq!(rect, original);
        }
    }
}

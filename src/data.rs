//! Named point series that diagrams are built from.
//!
//! Containers are assembled by the caller (for example from a CSV reader) and are
//! never modified by the rendering engine.

use crate::error::{Error, Result};

/// A data point in virtual (data) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    /// X value.
    pub x: f64,
    /// Y value.
    pub y: f64,
}

impl Point2 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An ordered, named series of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointList {
    name: String,
    points: Vec<Point2>,
}

impl PointList {
    /// Create an empty series.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), points: Vec::new() }
    }

    /// Create a series from points.
    pub fn with_points(name: impl Into<String>, points: impl IntoIterator<Item = Point2>) -> Self {
        Self { name: name.into(), points: points.into_iter().collect() }
    }

    /// Create a series holding a single value at `x = 0`.
    ///
    /// This is the shape of one bar chart category.
    pub fn single(name: impl Into<String>, value: f64) -> Self {
        Self::with_points(name, [Point2::new(0.0, value)])
    }

    /// Append a point.
    pub fn push(&mut self, point: Point2) {
        self.points.push(point);
    }

    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points in insertion order.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// First point, if any.
    #[must_use]
    pub fn first(&self) -> Option<Point2> {
        self.points.first().copied()
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn fold(&self, f: impl Fn(&Point2) -> f64, pick: fn(f64, f64) -> f64) -> Option<f64> {
        self.points.iter().map(f).reduce(pick)
    }

    /// Smallest x value.
    #[must_use]
    pub fn min_x(&self) -> Option<f64> {
        self.fold(|p| p.x, f64::min)
    }

    /// Largest x value.
    #[must_use]
    pub fn max_x(&self) -> Option<f64> {
        self.fold(|p| p.x, f64::max)
    }

    /// Smallest y value.
    #[must_use]
    pub fn min_y(&self) -> Option<f64> {
        self.fold(|p| p.y, f64::min)
    }

    /// Largest y value.
    #[must_use]
    pub fn max_y(&self) -> Option<f64> {
        self.fold(|p| p.y, f64::max)
    }
}

/// An ordered collection of named series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointListContainer {
    lists: Vec<PointList>,
}

impl PointListContainer {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a series.
    pub fn push(&mut self, list: PointList) {
        self.lists.push(list);
    }

    /// Build a bar-chart style container: one single-value series per category.
    pub fn from_categories<S: Into<String>>(categories: impl IntoIterator<Item = (S, f64)>) -> Self {
        categories.into_iter().map(|(name, value)| PointList::single(name, value)).collect()
    }

    /// Series in insertion order.
    #[must_use]
    pub fn lists(&self) -> &[PointList] {
        &self.lists
    }

    /// Iterate over series.
    pub fn iter(&self) -> std::slice::Iter<'_, PointList> {
        self.lists.iter()
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Whether the container has no series or no series has points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(PointList::is_empty)
    }

    /// Series names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.lists.iter().map(PointList::name)
    }

    fn fold(&self, f: fn(&PointList) -> Option<f64>, pick: fn(f64, f64) -> f64) -> Result<f64> {
        self.lists.iter().filter_map(f).reduce(pick).ok_or(Error::EmptyData)
    }

    /// Smallest x over all series.
    pub fn min_x(&self) -> Result<f64> {
        self.fold(PointList::min_x, f64::min)
    }

    /// Largest x over all series.
    pub fn max_x(&self) -> Result<f64> {
        self.fold(PointList::max_x, f64::max)
    }

    /// Smallest y over all series.
    pub fn min_y(&self) -> Result<f64> {
        self.fold(PointList::min_y, f64::min)
    }

    /// Largest y over all series.
    pub fn max_y(&self) -> Result<f64> {
        self.fold(PointList::max_y, f64::max)
    }
}

impl FromIterator<PointList> for PointListContainer {
    fn from_iter<I: IntoIterator<Item = PointList>>(iter: I) -> Self {
        Self { lists: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a PointListContainer {
    type Item = &'a PointList;
    type IntoIter = std::slice::Iter<'a, PointList>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_container_extrema() {
        let c = PointListContainer::from_categories([("a", 1.0), ("b", 4.5), ("c", -2.0)]);
        assert_eq!(c.len(), 3);
        assert_relative_eq!(c.min_y().unwrap(), -2.0);
        assert_relative_eq!(c.max_y().unwrap(), 4.5);
        assert_eq!(c.names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_container() {
        let mut c = PointListContainer::new();
        assert!(c.is_empty());
        c.push(PointList::new("nothing"));
        assert!(c.is_empty());
        assert!(matches!(c.max_y(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_point_list() {
        let mut l = PointList::new("series");
        l.push(Point2::new(1.0, 3.0));
        l.push(Point2::new(-1.0, 5.0));
        assert_eq!(l.first(), Some(Point2::new(1.0, 3.0)));
        assert_relative_eq!(l.min_x().unwrap(), -1.0);
        assert_relative_eq!(l.max_y().unwrap(), 5.0);
    }
}

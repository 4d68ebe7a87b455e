//! Axis scaling and virtual-to-physical coordinate conversion.
//!
//! An axis maps a data range onto a physical extent. [`MetricAxis`] searches a
//! "nice" tick interval for numeric data; [`NominalAxis`] gives each category one
//! unit. [`CoordinateSystem`] combines two axes with a drawable area in mm.

mod coord;
mod metric;
mod nominal;

pub use coord::CoordinateSystem;
pub use metric::{MetricAxis, MIN_GRID_DISTANCE};
pub use nominal::{NominalAxis, CHAR_WIDTH};

use crate::geometry::Range;

/// Interval parameters every axis exposes.
///
/// Invariant: `label_range ⊆ tick_range ⊆ range`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisScale {
    /// Full virtual range of the axis.
    pub range: Range,
    /// Distance between tick marks.
    pub tick_interval: f64,
    /// Range covered by tick marks.
    pub tick_range: Range,
    /// Distance between labelled ticks.
    pub label_interval: f64,
    /// Range covered by labels.
    pub label_range: Range,
    /// Distance between grid lines.
    pub grid_interval: f64,
}

/// Values `from, from + step, ...` up to and including `to` (with tolerance).
pub(crate) fn steps(range: Range, step: f64) -> Vec<f64> {
    if step <= 0.0 || range.distance() < 0.0 {
        return Vec::new();
    }
    let count = (range.distance() / step + 1e-9).floor() as usize;
    (0..=count).map(|i| range.from + i as f64 * step).collect()
}

/// A metric or nominal axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Axis {
    /// Numeric axis with searched intervals.
    Metric(MetricAxis),
    /// Categorical axis, one unit per category.
    Nominal(NominalAxis),
}

impl Axis {
    /// Interval parameters.
    #[must_use]
    pub fn scale(&self) -> &AxisScale {
        match self {
            Axis::Metric(a) => a.scale(),
            Axis::Nominal(a) => a.scale(),
        }
    }

    /// Full virtual range.
    #[must_use]
    pub fn range(&self) -> Range {
        self.scale().range
    }

    /// Distance between ticks.
    #[must_use]
    pub fn tick_interval(&self) -> f64 {
        self.scale().tick_interval
    }

    /// Range covered by ticks.
    #[must_use]
    pub fn tick_range(&self) -> Range {
        self.scale().tick_range
    }

    /// Distance between labels.
    #[must_use]
    pub fn label_interval(&self) -> f64 {
        self.scale().label_interval
    }

    /// Range covered by labels.
    #[must_use]
    pub fn label_range(&self) -> Range {
        self.scale().label_range
    }

    /// Distance between grid lines.
    #[must_use]
    pub fn grid_interval(&self) -> f64 {
        self.scale().grid_interval
    }

    /// Virtual positions of all ticks.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        steps(self.tick_range(), self.tick_interval())
    }

    /// Virtual positions of all labels.
    #[must_use]
    pub fn label_positions(&self) -> Vec<f64> {
        steps(self.label_range(), self.label_interval())
    }

    /// Offset added to data points before conversion (slot centre for nominal axes).
    #[must_use]
    pub fn point_offset(&self) -> f64 {
        match self {
            Axis::Metric(_) => 0.0,
            Axis::Nominal(_) => 0.5,
        }
    }

    /// Label text for a virtual position.
    #[must_use]
    pub fn format_label(&self, value: f64) -> Option<String> {
        match self {
            Axis::Metric(a) => Some(a.format_label(value)),
            Axis::Nominal(a) => a.format_label(value).map(str::to_string),
        }
    }

    /// Axis title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Axis::Metric(a) => a.title(),
            Axis::Nominal(_) => None,
        }
    }

    /// Unit shown next to the axis, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match self {
            Axis::Metric(a) => a.unit(),
            Axis::Nominal(a) => a.unit(),
        }
    }
}

impl From<MetricAxis> for Axis {
    fn from(a: MetricAxis) -> Self {
        Axis::Metric(a)
    }
}

impl From<NominalAxis> for Axis {
    fn from(a: NominalAxis) -> Self {
        Axis::Nominal(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_inclusive() {
        let s = steps(Range::new(0.0, 1.0), 0.25);
        assert_eq!(s.len(), 5);
        assert!((s[4] - 1.0).abs() < 1e-12);
        assert!(steps(Range::new(0.0, 1.0), 0.0).is_empty());
    }

    #[test]
    fn test_axis_enum_delegates() {
        let nominal: Axis = NominalAxis::new(vec!["a".into(), "b".into()], 100.0).unwrap().into();
        assert_eq!(nominal.ticks(), vec![0.0, 1.0, 2.0]);
        assert_eq!(nominal.label_positions(), vec![0.0, 1.0]);
        assert_eq!(nominal.format_label(1.0).as_deref(), Some("b"));
        assert!((nominal.point_offset() - 0.5).abs() < f64::EPSILON);

        let metric: Axis = MetricAxis::new(Range::new(0.0, 10.0), 100.0).unwrap().into();
        assert_eq!(metric.format_label(5.0).as_deref(), Some("5"));
        assert!(metric.range().encloses(&Range::new(0.0, 10.0)));
    }

    #[test]
    fn test_axis_unit() {
        let metric: Axis = MetricAxis::new(Range::new(0.0, 10.0), 100.0).unwrap().with_unit("kg").into();
        assert_eq!(metric.unit(), Some("kg"));
        let nominal: Axis = NominalAxis::new(vec!["a".into()], 50.0).unwrap().into();
        assert_eq!(nominal.unit(), None);
        let nominal: Axis = NominalAxis::new(vec!["a".into()], 50.0).unwrap().with_unit("city").into();
        assert_eq!(nominal.unit(), Some("city"));
    }
}

use super::AxisScale;
use crate::error::{Error, Result};
use crate::geometry::Range;
use tracing::{debug, trace};

/// Minimum physical distance between grid lines, in mm.
pub const MIN_GRID_DISTANCE: f64 = 10.0;

/// Interval factors tried per order of magnitude, smallest first.
const LADDER: [f64; 5] = [0.1, 0.125, 0.25, 0.5, 1.0];

const MAX_ITERATIONS: usize = 64;
const TOLERANCE: f64 = 1e-9;

/// Numeric axis whose range is widened to multiples of a "nice" interval.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricAxis {
    scale: AxisScale,
    decimals: usize,
    title: Option<String>,
    unit: Option<String>,
}

impl MetricAxis {
    /// Search the tick interval for `data` on an axis `size` mm long.
    ///
    /// The resulting range encloses `data` and both bounds are multiples of the
    /// interval.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientArea`] if `size` has no room for a single grid
    /// interval or the search does not settle.
    pub fn new(data: Range, size: f64) -> Result<Self> {
        let max_ticks = (size / MIN_GRID_DISTANCE).floor();
        if !(max_ticks >= 1.0) {
            return Err(Error::insufficient_area(format!(
                "axis of {size:.1} mm is shorter than the minimum grid distance of {MIN_GRID_DISTANCE} mm"
            )));
        }

        let mut range = if data.from <= data.to { data } else { Range::new(data.to, data.from) };
        if range.distance() == 0.0 {
            range = Range::new(range.from - 0.5, range.to + 0.5);
        }

        for iteration in 0..MAX_ITERATIONS {
            let interval = nice_interval(range.distance() / max_ticks);
            let from = (range.from / interval + TOLERANCE).floor() * interval;
            let to = (range.to / interval - TOLERANCE).ceil() * interval;
            trace!(iteration, interval, from, to, "metric axis widening");

            let settled = (from - range.from).abs() <= TOLERANCE * interval
                && (to - range.to).abs() <= TOLERANCE * interval;
            range = Range::new(from, to);
            if settled {
                debug!(interval, from, to, max_ticks, "metric axis interval");
                return Ok(Self {
                    scale: AxisScale {
                        range,
                        tick_interval: interval,
                        tick_range: range,
                        label_interval: 2.0 * interval,
                        label_range: range,
                        grid_interval: interval,
                    },
                    decimals: decimals_for(interval),
                    title: None,
                    unit: None,
                });
            }
        }

        Err(Error::insufficient_area(format!(
            "axis interval search for [{}, {}] did not settle",
            data.from, data.to
        )))
    }

    /// Attach an axis title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach a unit.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Interval parameters.
    #[must_use]
    pub fn scale(&self) -> &AxisScale {
        &self.scale
    }

    /// The chosen interval.
    #[must_use]
    pub fn interval(&self) -> f64 {
        self.scale.tick_interval
    }

    /// Axis title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Axis unit.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Format a value with as many decimals as the interval needs.
    #[must_use]
    pub fn format_label(&self, value: f64) -> String {
        let mut s = format!("{value:.prec$}", prec = self.decimals);
        if s.contains('.') {
            s = s.trim_end_matches('0').trim_end_matches('.').to_string();
        }
        if s == "-0" {
            s = "0".to_string();
        }
        s
    }
}

/// Smallest ladder value at or above `min`.
fn nice_interval(min: f64) -> f64 {
    let order = 10f64.powf(min.log10().ceil());
    LADDER
        .iter()
        .map(|f| f * order)
        .find(|candidate| *candidate >= min * (1.0 - TOLERANCE))
        .unwrap_or(order)
}

/// Fraction digits needed to print multiples of `interval` exactly.
fn decimals_for(interval: f64) -> usize {
    (0..=12)
        .find(|d| {
            let scaled = interval * 10f64.powi(*d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nice_interval_ladder() {
        assert_relative_eq!(nice_interval(0.232), 0.25);
        assert_relative_eq!(nice_interval(1.0), 1.0);
        assert_relative_eq!(nice_interval(1.1), 1.25);
        assert_relative_eq!(nice_interval(0.09), 0.1);
        assert_relative_eq!(nice_interval(6.0), 10.0);
        assert_relative_eq!(nice_interval(40.0), 50.0);
    }

    #[test]
    fn test_simple_range() {
        // 100 mm -> 10 ticks, [0, 10] -> interval 1
        let axis = MetricAxis::new(Range::new(0.0, 10.0), 100.0).unwrap();
        assert_relative_eq!(axis.interval(), 1.0);
        assert_eq!(axis.scale().range, Range::new(0.0, 10.0));
        assert_relative_eq!(axis.scale().label_interval, 2.0);
        assert_relative_eq!(axis.scale().grid_interval, 1.0);
    }

    #[test]
    fn test_range_is_widened() {
        let axis = MetricAxis::new(Range::new(-2.0, 4.5), 50.0).unwrap();
        let r = axis.scale().range;
        assert!(r.encloses(&Range::new(-2.0, 4.5)));
        let k_from = r.from / axis.interval();
        let k_to = r.to / axis.interval();
        assert!((k_from - k_from.round()).abs() < 1e-9);
        assert!((k_to - k_to.round()).abs() < 1e-9);
    }

    #[test]
    fn test_zero_width_range_is_padded() {
        let axis = MetricAxis::new(Range::new(3.0, 3.0), 100.0).unwrap();
        assert!(axis.scale().range.encloses(&Range::new(2.5, 3.5)));
    }

    #[test]
    fn test_too_short_axis() {
        let err = MetricAxis::new(Range::new(0.0, 1.0), 9.9).unwrap_err();
        assert!(matches!(err, Error::InsufficientArea { .. }));
    }

    #[test]
    fn test_label_formatting() {
        let axis = MetricAxis::new(Range::new(0.0, 1.0), 80.0).unwrap();
        assert_relative_eq!(axis.interval(), 0.125);
        assert_eq!(axis.format_label(0.375), "0.375");
        assert_eq!(axis.format_label(0.5), "0.5");
        assert_eq!(axis.format_label(1.0), "1");
        assert_eq!(axis.format_label(-0.0), "0");

        let coarse = MetricAxis::new(Range::new(0.0, 1000.0), 100.0).unwrap();
        assert_eq!(coarse.format_label(-200.0), "-200");
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let axis = MetricAxis::new(Range::new(10.0, 0.0), 100.0).unwrap();
        assert_eq!(axis.scale().range, Range::new(0.0, 10.0));
    }
}

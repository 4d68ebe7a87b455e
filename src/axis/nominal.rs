use super::AxisScale;
use crate::error::{Error, Result};
use crate::geometry::Range;
use tracing::warn;

/// Approximate physical width of one label character, in mm.
pub const CHAR_WIDTH: f64 = 6.5;

/// Categorical axis: category `i` occupies the unit slot `[i, i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct NominalAxis {
    scale: AxisScale,
    categories: Vec<String>,
    unit: Option<String>,
}

impl NominalAxis {
    /// Create an axis for `categories` on an axis `size` mm long.
    ///
    /// Logs a warning when the longest label does not fit its slot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if there are no categories.
    pub fn new(categories: Vec<String>, size: f64) -> Result<Self> {
        if categories.is_empty() {
            return Err(Error::EmptyData);
        }
        let n = categories.len() as f64;

        let slot = size / n;
        let longest = categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
        if slot < CHAR_WIDTH * (longest + 1) as f64 {
            warn!(slot_mm = slot, longest_label = longest, "not enough space for nominal axis labels");
        }

        let range = Range::new(0.0, n);
        Ok(Self {
            scale: AxisScale {
                range,
                tick_interval: 1.0,
                tick_range: range,
                label_interval: 1.0,
                label_range: Range::new(0.0, n - 1.0),
                grid_interval: 1.0,
            },
            categories,
            unit: None,
        })
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

    /// Category names.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Axis unit.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Category name at the rounded position, or `None` outside `[0, N - 1]`.
    #[must_use]
    pub fn format_label(&self, value: f64) -> Option<&str> {
        let index = value.round();
        if index < 0.0 {
            return None;
        }
        self.categories.get(index as usize).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(n: usize) -> NominalAxis {
        NominalAxis::new((0..n).map(|i| format!("c{i}")).collect(), 200.0).unwrap()
    }

    #[test]
    fn test_unit_slots() {
        let a = axis(4);
        let s = a.scale();
        assert_eq!(s.range, Range::new(0.0, 4.0));
        assert_eq!(s.tick_range, Range::new(0.0, 4.0));
        assert_eq!(s.label_range, Range::new(0.0, 3.0));
        assert!((s.tick_interval - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_labels() {
        let a = axis(3);
        assert_eq!(a.format_label(0.0), Some("c0"));
        assert_eq!(a.format_label(1.6), Some("c2"));
        assert_eq!(a.format_label(2.0), Some("c2"));
        assert_eq!(a.format_label(3.0), None);
        assert_eq!(a.format_label(-1.0), None);
    }

    #[test]
    fn test_empty_categories() {
        assert!(matches!(NominalAxis::new(Vec::new(), 100.0), Err(Error::EmptyData)));
    }

    #[test]
    fn test_long_labels_still_build() {
        let a = NominalAxis::new(vec!["a very long category name".into()], 20.0).unwrap();
        assert_eq!(a.categories().len(), 1);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// N categories give N + 1 unit ticks and labels exactly for 0..N.
        #[test]
        fn prop_nominal_labels(n in 1usize..50) {
            let a = NominalAxis::new((0..n).map(|i| i.to_string()).collect(), 500.0).unwrap();
            let ticks = super::super::steps(a.scale().tick_range, a.scale().tick_interval);
            prop_assert_eq!(ticks.len(), n + 1);
            let first = a.format_label(0.0).map(str::to_string);
            let last = a.format_label((n - 1) as f64).map(str::to_string);
            prop_assert_eq!(first, Some("0".to_string()));
            prop_assert_eq!(last, Some((n - 1).to_string()));
            prop_assert!(a.format_label(n as f64).is_none());
        }
    }
}

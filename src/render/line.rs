//! Line charts on floating-dot canvases.

use super::Plotter;
use crate::axis::CoordinateSystem;
use crate::canvas::{Canvas, FloatingPointData, PlotCanvas};
use crate::config::Margins;
use crate::diagram::LineChart;
use crate::error::{Error, Result};
use crate::geometry::{Point, Range};
use tracing::{debug, trace};

/// Length of axis tick marks in mm.
pub const TICK_LENGTH: f64 = 2.0;

/// Place dots every `resolution` mm along the segment `a`-`b`, both ends included.
pub(crate) fn plot_segment(page: &mut FloatingPointData, a: Point, b: Point, resolution: f64) {
    let steps = (a.distance(b) / resolution).ceil().max(1.0) as usize;
    for i in 0..=steps {
        page.add_point(a.lerp(b, i as f64 / steps as f64));
    }
}

/// Plots every series of a [`LineChart`] as sampled straight segments between
/// consecutive points, over a frame of two metric axes with tick marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineChartPlotter {
    /// Space kept free around the drawable area for axis labels, in text lines.
    pub label_lines: f64,
}

impl Default for LineChartPlotter {
    fn default() -> Self {
        Self { label_lines: 2.0 }
    }
}

impl LineChartPlotter {
    /// Coordinate system for `chart` on `canvas`, with room for a title line and
    /// axis labels.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientArea`] if the margins swallow the printable
    /// area or the axes cannot fit a single tick.
    pub fn coordinate_system(&self, chart: &LineChart, canvas: &PlotCanvas) -> Result<CoordinateSystem> {
        let mut area = canvas.printable_area();
        let line = canvas.text_line_height();
        if chart.title().is_some() {
            area.remove_from_top(line)
                .map_err(|e| Error::insufficient_area_from("Not enough space for the line chart title", e))?;
        }
        let margin = self.label_lines * line;
        let margins = Margins { top: 0.0, right: 0.0, bottom: margin, left: margin };
        if area.width <= margin || area.height <= margin {
            return Err(Error::insufficient_area(format!(
                "line chart needs more than {margin:.1} mm for axis labels, area is {:.1} x {:.1} mm",
                area.width, area.height
            )));
        }

        let data = chart.data();
        let x = Range::new(data.min_x()?, data.max_x()?);
        let y = Range::new(data.min_y()?, data.max_y()?);
        let system = CoordinateSystem::metric(x, y, area, margins)?;
        debug!(
            x_interval = system.x_axis().tick_interval(),
            y_interval = system.y_axis().tick_interval(),
            "line chart axes"
        );
        Ok(system)
    }
}

impl Plotter<LineChart> for LineChartPlotter {
    fn plot(&self, chart: &LineChart, canvas: &mut PlotCanvas) -> Result<()> {
        let system = self.coordinate_system(chart, canvas)?;
        let resolution = canvas.resolution();
        let page = canvas.current_page_mut();

        let (xr, yr) = (system.x_axis().range(), system.y_axis().range());
        let origin = system.convert(xr.from, yr.from);
        plot_segment(page, origin, system.convert(xr.to, yr.from), resolution);
        plot_segment(page, origin, system.convert(xr.from, yr.to), resolution);
        for tick in system.x_axis().ticks() {
            let p = system.convert(tick, yr.from);
            plot_segment(page, p, p.translated(0.0, TICK_LENGTH), resolution);
        }
        for tick in system.y_axis().ticks() {
            let p = system.convert(xr.from, tick);
            plot_segment(page, p, p.translated(-TICK_LENGTH, 0.0), resolution);
        }

        for series in chart.data() {
            let points: Vec<Point> = series.points().iter().map(|p| system.convert(p.x, p.y)).collect();
            match points.as_slice() {
                [] => {}
                [single] => page.add_point(*single),
                _ => {
                    for pair in points.windows(2) {
                        plot_segment(page, pair[0], pair[1], resolution);
                    }
                }
            }
            trace!(series = series.name(), points = points.len(), "series plotted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;
    use crate::data::{Point2, PointList, PointListContainer};
    use approx::assert_relative_eq;

    fn canvas() -> PlotCanvas {
        PlotCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    fn chart() -> LineChart {
        let data: PointListContainer =
            std::iter::once(PointList::with_points("s", [Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)])).collect();
        LineChart::new(data).unwrap()
    }

    #[test]
    fn test_plot_segment_spacing() {
        let mut page = FloatingPointData::new();
        plot_segment(&mut page, Point::new(0.0, 0.0), Point::new(10.0, 0.0), 0.5);
        assert_eq!(page.len(), 21);
        for pair in page.points().windows(2) {
            assert!(pair[0].distance(pair[1]) <= 0.5 + 1e-9);
        }
        assert_relative_eq!(page.points()[20].x, 10.0);
    }

    #[test]
    fn test_zero_length_segment() {
        let mut page = FloatingPointData::new();
        plot_segment(&mut page, Point::new(3.0, 3.0), Point::new(3.0, 3.0), 0.5);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn test_plot_stays_in_printable_area() {
        let mut c = canvas();
        LineChartPlotter::default().plot(&chart(), &mut c).unwrap();
        let area = c.printable_area();
        let page = c.current_page();
        assert!(!page.is_empty());
        for p in page.points() {
            assert!(area.contains(*p), "{p:?} outside {area:?}");
        }
    }

    #[test]
    fn test_series_endpoints_plotted() {
        let mut c = canvas();
        let plotter = LineChartPlotter::default();
        let system = plotter.coordinate_system(&chart(), &c).unwrap();
        plotter.plot(&chart(), &mut c).unwrap();
        let end = system.convert(10.0, 10.0);
        assert!(c.current_page().points().iter().any(|p| p.distance(end) < 1e-9));
    }

    #[test]
    fn test_title_reserves_a_line() {
        let c = canvas();
        let plotter = LineChartPlotter::default();
        let plain = plotter.coordinate_system(&chart(), &c).unwrap();
        let titled = plotter.coordinate_system(&chart().with_title("t"), &c).unwrap();
        assert_relative_eq!(titled.origin().y - plain.origin().y, c.text_line_height());
    }

    #[test]
    fn test_area_too_small() {
        let c = canvas();
        let plotter = LineChartPlotter { label_lines: 100.0 };
        assert!(matches!(plotter.coordinate_system(&chart(), &c), Err(Error::InsufficientArea { .. })));
    }
}

//! SVG preview encoder.
//!
//! Draws every dot of a page as a circle at its physical position, so the preview
//! shows the real spacing of cells and dots. Coordinates are in millimetres.

use crate::canvas::{Canvas, PlotCanvas, RasterCanvas};
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Colour of embossed dots.
const DOT_FILL: &str = "black";
/// Colour of the printable area outline.
const AREA_STROKE: &str = "#bbbbbb";

/// SVG encoder for braille pages.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// Page width in mm.
    width: f64,
    /// Page height in mm.
    height: f64,
    /// Background colour (`None` for transparent).
    background: Option<String>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<String>,
        stroke: Option<String>,
        stroke_width: f64,
    },
    /// Circle
    Circle { cx: f64, cy: f64, r: f64, fill: String },
    /// Text
    Text { x: f64, y: f64, text: String, font_size: f64, fill: String },
}

impl SvgEncoder {
    /// Create an empty page of `width` x `height` mm.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, background: Some("white".to_string()), elements: Vec::new() }
    }

    /// Preview of the current page of a raster canvas.
    #[must_use]
    pub fn from_raster_canvas(canvas: &RasterCanvas) -> Self {
        Self::from_raster_page(canvas, canvas.page_count() - 1)
    }

    /// Preview of page `index` of a raster canvas. Unknown pages give an empty sheet.
    #[must_use]
    pub fn from_raster_page(canvas: &RasterCanvas, index: usize) -> Self {
        let geometry = canvas.geometry();
        let mut encoder = Self::new(geometry.page_width(), geometry.page_height()).printable_outline(canvas);
        let r = canvas.dot_diameter() / 2.0;

        if let Some(page) = canvas.pages().get(index) {
            for row in 0..page.rows() {
                let (Some(cy), Some(cells)) = (canvas.dot_y_position(row), page.row(row)) else { continue };
                for (column, set) in cells.iter().enumerate() {
                    if let (true, Some(cx)) = (*set, canvas.dot_x_position(column)) {
                        encoder = encoder.circle(cx, cy, r, DOT_FILL);
                    }
                }
            }
        }
        encoder
    }

    /// Preview of the current page of a floating-dot canvas.
    #[must_use]
    pub fn from_plot_canvas(canvas: &PlotCanvas) -> Self {
        let geometry = canvas.geometry();
        let mut encoder = Self::new(geometry.page_width(), geometry.page_height()).printable_outline(canvas);
        let r = canvas.dot_diameter() / 2.0;
        for p in canvas.current_page().points() {
            encoder = encoder.circle(p.x, p.y, r, DOT_FILL);
        }
        encoder
    }

    fn printable_outline(self, canvas: &impl Canvas) -> Self {
        let area = canvas.geometry().printable_area();
        self.rect_outlined(area.x, area.y, area.width, area.height, AREA_STROKE, 0.2)
    }

    /// Set background colour (`None` for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<&str>) -> Self {
        self.background = color.map(str::to_string);
        self
    }

    /// Add an unfilled rectangle.
    #[must_use]
    pub fn rect_outlined(mut self, x: f64, y: f64, width: f64, height: f64, stroke: &str, stroke_width: f64) -> Self {
        self.elements.push(SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill: None,
            stroke: Some(stroke.to_string()),
            stroke_width,
        });
        self
    }

    /// Add a filled circle.
    #[must_use]
    pub fn circle(mut self, cx: f64, cy: f64, r: f64, fill: &str) -> Self {
        self.elements.push(SvgElement::Circle { cx, cy, r, fill: fill.to_string() });
        self
    }

    /// Add text.
    #[must_use]
    pub fn text(mut self, x: f64, y: f64, text: &str, font_size: f64, fill: &str) -> Self {
        self.elements.push(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size,
            fill: fill.to_string(),
        });
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements in drawing order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Number of dot circles.
    #[must_use]
    pub fn dot_count(&self) -> usize {
        self.elements.iter().filter(|e| matches!(e, SvgElement::Circle { .. })).count()
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(64 * (self.elements.len() + 4));

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}mm" height="{h}mm" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(bg) = &self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{bg}"/>"#);
        }

        for element in &self.elements {
            match element {
                SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width } => {
                    let _ = write!(
                        svg,
                        r#"  <rect x="{x:.2}" y="{y:.2}" width="{width:.2}" height="{height:.2}" fill="{}""#,
                        fill.as_deref().unwrap_or("none")
                    );
                    if let Some(s) = stroke {
                        let _ = write!(svg, r#" stroke="{s}" stroke-width="{stroke_width}""#);
                    }
                    svg.push_str("/>\n");
                }
                SvgElement::Circle { cx, cy, r, fill } => {
                    let _ = writeln!(svg, r#"  <circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}" fill="{fill}"/>"#);
                }
                SvgElement::Text { x, y, text, font_size, fill } => {
                    let _ = writeln!(
                        svg,
                        r#"  <text x="{x:.2}" y="{y:.2}" font-size="{font_size}" fill="{fill}">{}</text>"#,
                        escape_xml(text)
                    );
                }
            }
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write SVG to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;

    fn canvas() -> RasterCanvas {
        RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    #[test]
    fn test_svg_empty_page() {
        let svg = SvgEncoder::from_raster_canvas(&canvas()).render();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="210mm""#));
        assert!(svg.contains(r#"viewBox="0 0 210 297""#));
        assert!(!svg.contains("<circle"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_dots_at_physical_positions() {
        let mut c = canvas();
        c.current_page_mut().set(1, 2, true);
        c.current_page_mut().set(4, 0, true);
        let encoder = SvgEncoder::from_raster_canvas(&c);
        assert_eq!(encoder.dot_count(), 2);
        // column 2 starts the second cell (6 mm), row 1 is 2.5 mm down
        assert!(encoder.elements().contains(&SvgElement::Circle { cx: 6.0, cy: 2.5, r: 0.75, fill: "black".into() }));
        // row 4 is the second dot row of the second cell line (10 + 2.5 mm)
        assert!(encoder.elements().contains(&SvgElement::Circle { cx: 0.0, cy: 12.5, r: 0.75, fill: "black".into() }));
    }

    #[test]
    fn test_svg_from_plot_canvas() {
        let mut c = PlotCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A5").unwrap();
        c.current_page_mut().add_point(crate::geometry::Point::new(10.0, 20.0));
        let svg = SvgEncoder::from_plot_canvas(&c).render();
        assert!(svg.contains(r#"<circle cx="10.00" cy="20.00" r="0.75" fill="black"/>"#));
        assert!(svg.contains(r#"width="148mm""#));
    }

    #[test]
    fn test_svg_text_escaping() {
        let svg = SvgEncoder::new(10.0, 10.0).text(1.0, 2.0, "a < b & \"c\"", 3.0, "black").render();
        assert!(svg.contains("a &lt; b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_svg_raw_rect_element() {
        let mut encoder = SvgEncoder::new(20.0, 20.0);
        encoder.add_element(SvgElement::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            fill: Some("grey".into()),
            stroke: None,
            stroke_width: 0.0,
        });
        assert_eq!(encoder.dot_count(), 0);
        assert!(encoder.render().contains(r#"<rect x="1.00" y="2.00" width="3.00" height="4.00" fill="grey"/>"#));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(10.0, 10.0).background(None).render();
        assert!(!svg.contains(r#"height="100%""#));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.svg");
        let mut c = canvas();
        c.current_page_mut().set(0, 0, true);
        SvgEncoder::from_raster_canvas(&c).write_to_file(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<circle"));
    }
}

//! Re-rastering of pixel images onto braille dots.

use super::Rasterizer;
use crate::canvas::{Canvas, RasterCanvas};
use crate::config::Representation;
use crate::diagram::Image;
use crate::error::Result;
use tracing::{info, trace};

/// Default grey value at or below which a pixel sets a dot.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// How pixel positions map onto the dot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMapping {
    /// Pixel index times a dot-per-pixel ratio; ignores dot and cell spacing.
    Linear,
    /// Pixel index to a physical position in mm, then to the nearest dot.
    Quantified,
}

/// Rasterizes an [`Image`] onto a fresh page by thresholding grey values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRasterizer {
    mapping: ImageMapping,
    prevent_over_stretch: bool,
    preserve_aspect_ratio: bool,
    threshold: u8,
}

impl Default for ImageRasterizer {
    fn default() -> Self {
        Self::new(ImageMapping::Quantified, true, true, DEFAULT_THRESHOLD)
    }
}

impl ImageRasterizer {
    /// Create a rasterizer.
    ///
    /// `prevent_over_stretch` caps the scale so that small images are not spread
    /// over the page with gaps; `preserve_aspect_ratio` uses the smaller ratio on
    /// both axes.
    #[must_use]
    pub fn new(mapping: ImageMapping, prevent_over_stretch: bool, preserve_aspect_ratio: bool, threshold: u8) -> Self {
        Self { mapping, prevent_over_stretch, preserve_aspect_ratio, threshold }
    }

    /// Read `rasterizer.image.*`, falling back to the defaults for unset keys.
    #[must_use]
    pub fn from_representation(representation: &Representation) -> Self {
        let s = &representation.rasterizer.image;
        Self::new(
            if s.quantified_positions { ImageMapping::Quantified } else { ImageMapping::Linear },
            s.prevent_over_stretch,
            s.preserve_aspect_ratio,
            s.threshold,
        )
    }

    /// Mapping strategy.
    #[must_use]
    pub fn mapping(&self) -> ImageMapping {
        self.mapping
    }

    /// Grey threshold.
    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    fn is_dark(&self, rgb: [u8; 3]) -> bool {
        let grey = (u16::from(rgb[0]) + u16::from(rgb[1]) + u16::from(rgb[2])) / 3;
        grey <= u16::from(self.threshold)
    }

    fn ratios(&self, mut h: f64, mut v: f64, cap: (f64, f64)) -> (f64, f64) {
        if self.prevent_over_stretch {
            h = h.min(cap.0);
            v = v.min(cap.1);
        }
        if self.preserve_aspect_ratio {
            let r = h.min(v);
            h = r;
            v = r;
        }
        (h, v)
    }

    /// Dot `(row, column)` for every dark pixel.
    fn dark_dots(&self, image: &Image, canvas: &RasterCanvas) -> Vec<(i64, i64)> {
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        let mut dots = Vec::new();

        match self.mapping {
            ImageMapping::Linear => {
                let area = canvas.dot_rectangle();
                let (h, v) = self.ratios((area.width - 1.0) / iw, (area.height - 1.0) / ih, (1.0, 1.0));
                trace!(h, v, "linear image mapping");
                for x in 0..image.width() {
                    let column = area.x as i64 + (h * (x + 1) as f64).round() as i64;
                    for y in 0..image.height() {
                        if image.rgb(x, y).is_some_and(|p| self.is_dark(p)) {
                            dots.push((area.y as i64 + (v * (y + 1) as f64).round() as i64, column));
                        }
                    }
                }
            }
            ImageMapping::Quantified => {
                let area = canvas.geometry().printable_area();
                let (h, v) = self.ratios(area.width / iw, area.height / ih, canvas.dot_distance());
                trace!(h, v, "quantified image mapping");
                for x in 0..image.width() {
                    let column = canvas.quantify_x(area.x + h * (x + 1) as f64) as i64;
                    for y in 0..image.height() {
                        if image.rgb(x, y).is_some_and(|p| self.is_dark(p)) {
                            dots.push((canvas.quantify_y(area.y + v * (y + 1) as f64) as i64, column));
                        }
                    }
                }
            }
        }
        dots
    }
}

impl Rasterizer<Image> for ImageRasterizer {
    fn rasterize(&self, image: &Image, canvas: &mut RasterCanvas) -> Result<()> {
        info!(width = image.width(), height = image.height(), mapping = ?self.mapping, "rasterizing image");
        let dots = self.dark_dots(image, canvas);
        let page = canvas.new_page();
        for (row, column) in dots {
            page.set(row, column, true);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;

    fn canvas() -> RasterCanvas {
        RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    #[test]
    fn test_white_image_sets_nothing() {
        let mut c = canvas();
        let image = Image::filled(20, 20, [255, 255, 255]).unwrap();
        ImageRasterizer::default().rasterize(&image, &mut c).unwrap();
        assert_eq!(c.page_count(), 2);
        assert_eq!(c.current_page().count_set(), 0);
    }

    #[test]
    fn test_black_image_linear() {
        let mut c = canvas();
        let image = Image::filled(10, 10, [0, 0, 0]).unwrap();
        ImageRasterizer::new(ImageMapping::Linear, true, true, 80).rasterize(&image, &mut c).unwrap();
        let page = c.current_page();
        assert_eq!(page.count_set(), 100);
        assert_eq!(page.get(1, 1), Some(true));
        assert_eq!(page.get(10, 10), Some(true));
        assert_eq!(page.get(0, 0), Some(false));
    }

    #[test]
    fn test_linear_stretch_without_cap() {
        let mut c = canvas();
        let image = Image::filled(2, 2, [0, 0, 0]).unwrap();
        ImageRasterizer::new(ImageMapping::Linear, false, false, 80).rasterize(&image, &mut c).unwrap();
        let page = c.current_page();
        // (70 - 1) / 2 = 34.5 dots per pixel horizontally, (87 - 1) / 2 = 43 vertically
        assert_eq!(page.get(43, 35), Some(true));
        assert_eq!(page.get(86, 69), Some(true));
        assert_eq!(page.count_set(), 4);
    }

    #[test]
    fn test_black_image_quantified() {
        let mut c = canvas();
        let image = Image::filled(2, 2, [0, 0, 0]).unwrap();
        ImageRasterizer::default().rasterize(&image, &mut c).unwrap();
        let page = c.current_page();
        // 2.5 mm per pixel lands on x 2.5 / 5.0 mm and y 2.5 / 5.0 mm
        for (row, column) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
            assert_eq!(page.get(row, column), Some(true));
        }
        assert_eq!(page.count_set(), 4);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let r = ImageRasterizer::default();
        assert!(r.is_dark([80, 80, 80]));
        assert!(r.is_dark([0, 120, 120]));
        assert!(!r.is_dark([81, 81, 81]));
    }

    #[test]
    fn test_from_representation() {
        let config = ConfigurationParser::with_overrides(
            "representation.rasterizer.image.quantifiedPositions = false\n\
             representation.rasterizer.image.threshold = 120\n",
        )
        .unwrap();
        let r = ImageRasterizer::from_representation(config.representation());
        assert_eq!(r.mapping(), ImageMapping::Linear);
        assert_eq!(r.threshold(), 120);
    }
}

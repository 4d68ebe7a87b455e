//! Terminal preview encoder.
//!
//! Renders dot pages as text. Supports two modes:
//! - Braille: one Unicode braille pattern (U+2800 block) per cell
//! - Dots: one character per dot, for rasters Unicode braille cannot show

use super::cell_bits;
use crate::canvas::{Canvas, MatrixData, RasterCanvas};
use crate::config::RasterType;
use crate::error::{Error, Result};
use std::fmt::Write as FmtWrite;

/// First code point of the Unicode braille patterns block.
const BRAILLE_BASE: u32 = 0x2800;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// One Unicode braille character per 2x3 or 2x4 cell.
    #[default]
    Braille,
    /// One character per dot.
    Dots,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    set: char,
    unset: char,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    /// Create a new terminal encoder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self { mode: TerminalMode::default(), set: 'o', unset: '.' }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Characters for set and unset dots in [`TerminalMode::Dots`].
    #[must_use]
    pub fn dot_chars(mut self, set: char, unset: char) -> Self {
        self.set = set;
        self.unset = unset;
        self
    }

    /// Render one page with the given cell geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRaster`] in braille mode for cells other than 2x3 or
    /// 2x4 dots.
    pub fn render(&self, page: &MatrixData<bool>, raster: RasterType) -> Result<String> {
        match self.mode {
            TerminalMode::Braille => render_braille(page, raster),
            TerminalMode::Dots => Ok(self.render_dots(page)),
        }
    }

    /// Render every page of a canvas, separated by an empty line.
    pub fn render_canvas(&self, canvas: &RasterCanvas) -> Result<String> {
        let pages = canvas
            .pages()
            .iter()
            .map(|page| self.render(page, canvas.raster_type()))
            .collect::<Result<Vec<_>>>()?;
        Ok(pages.join("\n"))
    }

    fn render_dots(&self, page: &MatrixData<bool>) -> String {
        let mut output = String::with_capacity((page.columns() + 1) * page.rows());
        for row in 0..page.rows() {
            for dot in page.row(row).unwrap_or_default() {
                output.push(if *dot { self.set } else { self.unset });
            }
            output.push('\n');
        }
        output
    }
}

fn render_braille(page: &MatrixData<bool>, raster: RasterType) -> Result<String> {
    let RasterType { cell_width, cell_height } = raster;
    if cell_width != 2 || !(3..=4).contains(&cell_height) {
        return Err(Error::InvalidRaster { cell_width, cell_height });
    }

    let (cells_x, _) = page.cell_grid(cell_width, cell_height);
    let per_cell = cell_width * cell_height;
    let dots: Vec<bool> = page.dot_iter(cell_width, cell_height).collect();

    let mut output = String::new();
    for (i, cell) in dots.chunks(per_cell).enumerate() {
        let bits = cell_bits(cell, cell_height);
        let _ = write!(output, "{}", char::from_u32(BRAILLE_BASE + u32::from(bits)).unwrap_or(' '));
        if (i + 1) % cells_x == 0 {
            output.push('\n');
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_braille_six_dot() {
        let mut page = MatrixData::<bool>::new(3, 4).unwrap();
        // dot 1 of the first cell, dots 1 2 4 of the second
        page.set(0, 0, true);
        page.set(0, 2, true);
        page.set(1, 2, true);
        page.set(0, 3, true);
        let out = TerminalEncoder::new().render(&page, RasterType::SIX_DOT).unwrap();
        assert_eq!(out, "\u{2801}\u{280B}\n");
    }

    #[test]
    fn test_braille_eight_dot_uses_lower_dots() {
        let mut page = MatrixData::<bool>::new(4, 2).unwrap();
        page.set(3, 0, true);
        page.set(3, 1, true);
        let out = TerminalEncoder::new().render(&page, RasterType::EIGHT_DOT).unwrap();
        assert_eq!(out, "\u{28C0}\n");
    }

    #[test]
    fn test_braille_rejects_other_rasters() {
        let page = MatrixData::<bool>::new(3, 3).unwrap();
        let err = TerminalEncoder::new().render(&page, RasterType { cell_width: 3, cell_height: 3 }).unwrap_err();
        assert!(matches!(err, Error::InvalidRaster { cell_width: 3, cell_height: 3 }));
    }

    #[test]
    fn test_dots_mode() {
        let mut page = MatrixData::<bool>::new(2, 3).unwrap();
        page.set(1, 2, true);
        let out = TerminalEncoder::new()
            .mode(TerminalMode::Dots)
            .render(&page, RasterType { cell_width: 3, cell_height: 3 })
            .unwrap();
        assert_eq!(out, "...\n..o\n");
    }

    #[test]
    fn test_custom_dot_chars() {
        let mut page = MatrixData::<bool>::new(1, 2).unwrap();
        page.set(0, 0, true);
        let out = TerminalEncoder::new().mode(TerminalMode::Dots).dot_chars('#', ' ').render(&page, RasterType::SIX_DOT);
        assert_eq!(out.unwrap(), "# \n");
    }
}

//! Cell-major printer documents.

use super::cell_bits;
use crate::canvas::{Canvas, MatrixData, RasterCanvas};
use crate::config::RasterType;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Ends a cell row.
pub const LINE_FEED: u8 = 0x0A;
/// Ends a page.
pub const FORM_FEED: u8 = 0x0C;

/// North American Braille ASCII, indexed by the ISO/TR 11548-1 bits of a 6-dot cell.
const BRAILLE_ASCII: &[u8; 64] = b" A1B'K2L@CIF/MSP\"E3H9O6R^DJG>NTQ,*5<-U8V.%[$+X!&;:4\\0Z7(_?W]#Y)=";

/// Byte written for each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellEncoding {
    /// The raw ISO/TR 11548-1 dot bits (6-dot and 8-dot). Rows have a fixed
    /// length, so readers split them by cell count rather than on line feeds.
    #[default]
    Iso11548,
    /// Braille ASCII characters, as accepted by text-mode embossers (6-dot only).
    BrailleAscii,
}

/// Serializes raster pages cell by cell: one byte per cell, a line feed after
/// each cell row and a form feed after each page.
#[derive(Debug, Clone, Default)]
pub struct CellDocumentBuilder {
    encoding: CellEncoding,
}

impl CellDocumentBuilder {
    /// Builder writing raw dot bits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the cell encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: CellEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Encode one page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRaster`] for cells other than 2x3 or 2x4 dots, or for
    /// 8-dot cells with Braille ASCII.
    pub fn encode_page(&self, page: &MatrixData<bool>, raster: RasterType) -> Result<Vec<u8>> {
        let RasterType { cell_width, cell_height } = raster;
        let max_height = match self.encoding {
            CellEncoding::Iso11548 => 4,
            CellEncoding::BrailleAscii => 3,
        };
        if cell_width != 2 || !(3..=max_height).contains(&cell_height) {
            return Err(Error::InvalidRaster { cell_width, cell_height });
        }

        let (cells_x, cells_y) = page.cell_grid(cell_width, cell_height);
        let dots: Vec<bool> = page.dot_iter(cell_width, cell_height).collect();
        let mut out = Vec::with_capacity((cells_x + 1) * cells_y + 1);

        for (i, cell) in dots.chunks(cell_width * cell_height).enumerate() {
            let bits = cell_bits(cell, cell_height);
            out.push(match self.encoding {
                CellEncoding::Iso11548 => bits,
                CellEncoding::BrailleAscii => BRAILLE_ASCII[usize::from(bits & 0x3F)],
            });
            if (i + 1) % cells_x == 0 {
                out.push(LINE_FEED);
            }
        }
        out.push(FORM_FEED);
        Ok(out)
    }

    /// Encode every page of a canvas.
    pub fn build(&self, canvas: &RasterCanvas) -> Result<Vec<u8>> {
        let mut document = Vec::new();
        for page in canvas.pages() {
            document.extend(self.encode_page(page, canvas.raster_type())?);
        }
        debug!(pages = canvas.page_count(), bytes = document.len(), "cell document built");
        Ok(document)
    }

    /// Encode a canvas and write it to a file.
    pub fn write_to_file<P: AsRef<Path>>(&self, canvas: &RasterCanvas, path: P) -> Result<()> {
        let document = self.build(canvas)?;
        File::create(path)?.write_all(&document)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;

    fn page() -> MatrixData<bool> {
        let mut page = MatrixData::<bool>::new(6, 4).unwrap();
        // cell (0, 0): dot 1, cell (0, 1): dots 1 2, cell (1, 1): dot 6
        page.set(0, 0, true);
        page.set(0, 2, true);
        page.set(1, 2, true);
        page.set(5, 3, true);
        page
    }

    #[test]
    fn test_iso_bits_cell_major() {
        let bytes = CellDocumentBuilder::new().encode_page(&page(), RasterType::SIX_DOT).unwrap();
        assert_eq!(bytes, vec![0x01, 0x03, LINE_FEED, 0x00, 0x20, LINE_FEED, FORM_FEED]);
    }

    #[test]
    fn test_braille_ascii() {
        let bytes = CellDocumentBuilder::new()
            .encoding(CellEncoding::BrailleAscii)
            .encode_page(&page(), RasterType::SIX_DOT)
            .unwrap();
        assert_eq!(bytes, b"AB\n ,\n\x0C".to_vec());
    }

    #[test]
    fn test_braille_ascii_rejects_eight_dot() {
        let err = CellDocumentBuilder::new()
            .encoding(CellEncoding::BrailleAscii)
            .encode_page(&page(), RasterType::EIGHT_DOT)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRaster { cell_width: 2, cell_height: 4 }));
    }

    #[test]
    fn test_build_canvas_pages() {
        let mut canvas = RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap();
        canvas.new_page();
        let document = CellDocumentBuilder::new().build(&canvas).unwrap();
        // 35 x 29 cells per page
        assert_eq!(document.len(), 2 * (29 * 36 + 1));
        assert_eq!(document.iter().filter(|b| **b == FORM_FEED).count(), 2);
    }

    #[test]
    fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.brl");
        let canvas = RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A5").unwrap();
        CellDocumentBuilder::new().write_to_file(&canvas, &path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap().last(), Some(&FORM_FEED));
    }
}

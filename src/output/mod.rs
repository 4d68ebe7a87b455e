//! Output encoders (printer document, SVG, terminal).

mod document;
mod svg;
mod terminal;

pub use document::{CellDocumentBuilder, CellEncoding, FORM_FEED, LINE_FEED};
pub use svg::{SvgElement, SvgEncoder};
pub use terminal::{TerminalEncoder, TerminalMode};

/// ISO/TR 11548-1 bit pattern of one cell given in column-major dot order.
///
/// Dots 1-3 (left column) map to bits 0-2, dots 4-6 (right column) to bits 3-5,
/// and the fourth row of 8-dot cells to bits 6 (left) and 7 (right).
pub(crate) fn cell_bits(dots: &[bool], cell_height: usize) -> u8 {
    dots.iter().enumerate().filter(|(_, set)| **set).fold(0u8, |bits, (k, _)| {
        let (column, row) = (k / cell_height, k % cell_height);
        let bit = match (column, row) {
            (0 | 1, 0..=2) => column * 3 + row,
            (0 | 1, 3) => 6 + column,
            _ => return bits,
        };
        bits | (1 << bit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_bits_six_dot() {
        // dots 1 and 5
        assert_eq!(cell_bits(&[true, false, false, false, true, false], 3), 0b01_0001);
        assert_eq!(cell_bits(&[true; 6], 3), 0x3F);
        assert_eq!(cell_bits(&[false; 6], 3), 0);
    }

    #[test]
    fn test_cell_bits_eight_dot() {
        // dot 7 is the bottom-left, dot 8 the bottom-right
        assert_eq!(cell_bits(&[false, false, false, true, false, false, false, false], 4), 0x40);
        assert_eq!(cell_bits(&[false, false, false, false, false, false, false, true], 4), 0x80);
        assert_eq!(cell_bits(&[true; 8], 4), 0xFF);
    }
}

//! Braille text layout and rasterization.

use super::Rasterizer;
use crate::canvas::{Canvas, RasterCanvas};
use crate::config::{Printer, Properties};
use crate::diagram::BrailleText;
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

/// Table key of the capital sign.
pub const CAPITAL_SIGN: &str = "CAP";
/// Table key of the number sign.
pub const NUMBER_SIGN: &str = "NUM";

/// Maps characters to dot patterns.
///
/// A pattern is a string of `0`/`1` with one entry per dot of a cell in column-major
/// order (for 6-dot braille this is dot 1 to dot 6). Symbols needing more than one
/// cell separate the cell patterns with `,`.
pub trait BrailleTable: std::fmt::Debug + Send + Sync {
    /// Pattern for a symbol, or `None` if the table has none.
    fn pattern(&self, symbol: &str) -> Option<&str>;
}

/// Hash map backed braille table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleBrailleTable {
    patterns: HashMap<String, String>,
}

/// Built-in 6-dot letters, digits (after the number sign) and punctuation as braille
/// dot numbers.
const BUILTIN: &[(&str, &str)] = &[
    ("a", "1"), ("b", "12"), ("c", "14"), ("d", "145"), ("e", "15"),
    ("f", "124"), ("g", "1245"), ("h", "125"), ("i", "24"), ("j", "245"),
    ("k", "13"), ("l", "123"), ("m", "134"), ("n", "1345"), ("o", "135"),
    ("p", "1234"), ("q", "12345"), ("r", "1235"), ("s", "234"), ("t", "2345"),
    ("u", "136"), ("v", "1236"), ("w", "2456"), ("x", "1346"), ("y", "13456"),
    ("z", "1356"), ("ä", "345"), ("ö", "246"), ("ü", "1256"), ("ß", "2346"),
    ("1", "1"), ("2", "12"), ("3", "14"), ("4", "145"), ("5", "15"),
    ("6", "124"), ("7", "1245"), ("8", "125"), ("9", "24"), ("0", "245"),
    (" ", ""), (".", "3"), (",", "2"), (";", "23"), (":", "25"), ("?", "26"),
    ("!", "235"), ("-", "36"), ("'", "6"), ("(", "2356"), (")", "2356"),
    ("%", "3456,245,356"), ("CAP", "46"), ("NUM", "3456"),
];

fn dots_to_pattern(dots: &str) -> String {
    dots.split(',')
        .map(|cell| (1..=6).map(|d| if cell.contains(char::from(b'0' + d)) { '1' } else { '0' }).collect::<String>())
        .collect::<Vec<_>>()
        .join(",")
}

impl Default for SimpleBrailleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleBrailleTable {
    /// The built-in 6-dot table.
    #[must_use]
    pub fn new() -> Self {
        let patterns = BUILTIN.iter().map(|(s, dots)| ((*s).to_string(), dots_to_pattern(dots))).collect();
        Self { patterns }
    }

    /// Table from `symbol = pattern` properties.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigInvalid`] for patterns containing anything but `0`, `1`
    /// and `,`.
    pub fn from_properties(properties: &Properties) -> Result<Self> {
        let mut patterns = HashMap::new();
        for (symbol, pattern) in properties.iter() {
            if pattern.is_empty() || !pattern.chars().all(|c| matches!(c, '0' | '1' | ',')) {
                return Err(Error::ConfigInvalid {
                    key: symbol.to_string(),
                    value: pattern.to_string(),
                    message: "braille patterns consist of '0', '1' and ','".to_string(),
                });
            }
            patterns.insert(symbol.to_string(), pattern.to_string());
        }
        Ok(Self { patterns })
    }

    /// Load a properties braille table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_properties(&Properties::load(path)?)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl BrailleTable for SimpleBrailleTable {
    fn pattern(&self, symbol: &str) -> Option<&str> {
        self.patterns.get(symbol).map(String::as_str)
    }
}

/// Writes text as braille cells onto a raster canvas.
#[derive(Debug, Clone)]
pub struct BrailleTextRasterizer {
    table: Arc<dyn BrailleTable>,
}

impl Default for BrailleTextRasterizer {
    fn default() -> Self {
        Self::new(Arc::new(SimpleBrailleTable::new()))
    }
}

impl BrailleTextRasterizer {
    /// Rasterizer using `table`.
    #[must_use]
    pub fn new(table: Arc<dyn BrailleTable>) -> Self {
        Self { table }
    }

    /// Rasterizer using the printer's configured braille table, or the built-in one.
    pub fn for_printer(printer: &Printer) -> Result<Self> {
        match printer.braille_table() {
            Some(path) => Ok(Self::new(Arc::new(SimpleBrailleTable::load(path)?))),
            None => Ok(Self::default()),
        }
    }

    /// Translate text into cell patterns, inserting capital and number signs.
    fn cells(&self, text: &str) -> Result<Vec<&str>> {
        let lookup = |symbol: &str| {
            self.table.pattern(symbol).ok_or_else(|| Error::UnknownBrailleCharacter(symbol.to_string()))
        };

        let mut cells = Vec::new();
        let mut in_number = false;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            if ch.is_ascii_digit() {
                if !in_number {
                    cells.push(lookup(NUMBER_SIGN)?);
                    in_number = true;
                }
            } else {
                in_number = false;
            }

            let symbol = if ch.is_uppercase() {
                cells.push(lookup(CAPITAL_SIGN)?);
                ch.to_lowercase().next().unwrap_or(ch)
            } else {
                ch
            };
            cells.extend(lookup(&*symbol.encode_utf8(&mut buf))?.split(','));
        }
        Ok(cells)
    }

    /// Number of cells `text` occupies.
    pub fn length_in_cells(&self, text: &str) -> Result<usize> {
        Ok(self.cells(text)?.len())
    }

    /// Height in dots needed to write `text` into a block `width_dots` wide.
    pub fn required_height(&self, text: &str, width_dots: usize, canvas: &RasterCanvas) -> Result<usize> {
        let cells = self.length_in_cells(text)?;
        if cells == 0 {
            return Ok(0);
        }
        let per_line = width_dots / canvas.cell_width();
        if per_line == 0 {
            return Err(Error::insufficient_area(format!(
                "text block of {width_dots} dots is narrower than one braille cell"
            )));
        }
        Ok(cells.div_ceil(per_line) * canvas.cell_height())
    }

    /// Longest prefix of `text` that fits into `max_cells` cells.
    pub fn truncate_to_cells<'a>(&self, text: &'a str, max_cells: usize) -> Result<&'a str> {
        let mut end = 0;
        for (idx, ch) in text.char_indices() {
            let next = idx + ch.len_utf8();
            if self.length_in_cells(&text[..next])? > max_cells {
                break;
            }
            end = next;
        }
        Ok(&text[..end])
    }
}

/// Stretch a 6-dot pattern to the canvas cell size by leaving extra dots empty.
fn fit_pattern(pattern: &str, cell_width: usize, cell_height: usize) -> Result<Vec<bool>> {
    let dots: Vec<bool> = pattern.chars().map(|c| c == '1').collect();
    if dots.len() == cell_width * cell_height {
        return Ok(dots);
    }
    if dots.len() % cell_width == 0 && dots.len() / cell_width < cell_height {
        let src_height = dots.len() / cell_width;
        let mut fitted = vec![false; cell_width * cell_height];
        for (i, dot) in dots.into_iter().enumerate() {
            fitted[(i / src_height) * cell_height + i % src_height] = dot;
        }
        return Ok(fitted);
    }
    Err(Error::InvalidRaster { cell_width, cell_height })
}

impl Rasterizer<BrailleText> for BrailleTextRasterizer {
    fn rasterize(&self, data: &BrailleText, canvas: &mut RasterCanvas) -> Result<()> {
        let (w, h) = (canvas.cell_width(), canvas.cell_height());
        let area = data.area.intersected_with(&canvas.dot_rectangle()).as_int();
        let cells = self.cells(&data.text)?;
        if cells.is_empty() {
            return Ok(());
        }

        let per_line = (area.width.max(0) as usize) / w;
        let lines = if per_line == 0 { usize::MAX } else { cells.len().div_ceil(per_line) };
        if per_line == 0 || lines.saturating_mul(h) > area.height.max(0) as usize {
            return Err(Error::insufficient_area(format!(
                "text '{}' needs {} cells but the area holds {} per line and {} lines",
                data.text,
                cells.len(),
                per_line,
                area.height.max(0) as usize / h
            )));
        }

        let fitted = cells.iter().map(|p| fit_pattern(p, w, h)).collect::<Result<Vec<_>>>()?;
        trace!(cells = fitted.len(), lines, "rasterizing braille text");

        let page = canvas.current_page_mut();
        for (i, dots) in fitted.iter().enumerate() {
            let x0 = area.x + ((i % per_line) * w) as i64;
            let y0 = area.y + ((i / per_line) * h) as i64;
            for (k, dot) in dots.iter().enumerate() {
                if *dot {
                    page.set(y0 + (k % h) as i64, x0 + (k / h) as i64, true);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigurationParser;
    use crate::geometry::Rectangle;

    fn canvas() -> RasterCanvas {
        RasterCanvas::from_config(&ConfigurationParser::with_defaults().unwrap(), "A4").unwrap()
    }

    #[test]
    fn test_builtin_patterns() {
        let table = SimpleBrailleTable::new();
        assert_eq!(table.pattern("a"), Some("100000"));
        assert_eq!(table.pattern("y"), Some("101111"));
        assert_eq!(table.pattern("NUM"), Some("001111"));
        assert_eq!(table.pattern("%"), Some("001111,010110,001011"));
        assert_eq!(table.pattern("€"), None);
    }

    #[test]
    fn test_length_in_cells() {
        let r = BrailleTextRasterizer::default();
        assert_eq!(r.length_in_cells("abc").unwrap(), 3);
        assert_eq!(r.length_in_cells("Abc").unwrap(), 4);
        assert_eq!(r.length_in_cells("a 12").unwrap(), 5);
        assert_eq!(r.length_in_cells("1a2").unwrap(), 5);
        assert_eq!(r.length_in_cells("%").unwrap(), 3);
    }

    #[test]
    fn test_unknown_character() {
        let r = BrailleTextRasterizer::default();
        assert!(matches!(r.length_in_cells("a€"), Err(Error::UnknownBrailleCharacter(s)) if s == "€"));
    }

    #[test]
    fn test_truncate_to_cells() {
        let r = BrailleTextRasterizer::default();
        assert_eq!(r.truncate_to_cells("category", 6).unwrap(), "catego");
        assert_eq!(r.truncate_to_cells("Abcdef", 3).unwrap(), "Ab");
        assert_eq!(r.truncate_to_cells("ab", 6).unwrap(), "ab");
    }

    #[test]
    fn test_required_height() {
        let r = BrailleTextRasterizer::default();
        let c = canvas();
        assert_eq!(r.required_height("", 70, &c).unwrap(), 0);
        assert_eq!(r.required_height("abc", 70, &c).unwrap(), 3);
        // 4 cells per line, 10 cells -> 3 lines
        assert_eq!(r.required_height("abcdefghij", 8, &c).unwrap(), 9);
        assert!(r.required_height("a", 1, &c).is_err());
    }

    #[test]
    fn test_rasterize_single_letter() {
        let r = BrailleTextRasterizer::default();
        let mut c = canvas();
        r.rasterize(&BrailleText::new("l", Rectangle::new(4.0, 6.0, 10.0, 3.0)), &mut c).unwrap();
        let page = c.current_page();
        // l = dots 1 2 3: the whole left column of the cell
        assert_eq!(page.get(6, 4), Some(true));
        assert_eq!(page.get(7, 4), Some(true));
        assert_eq!(page.get(8, 4), Some(true));
        assert_eq!(page.count_set(), 3);
    }

    #[test]
    fn test_rasterize_wraps_lines() {
        let r = BrailleTextRasterizer::default();
        let mut c = canvas();
        r.rasterize(&BrailleText::new("aaa", Rectangle::new(0.0, 0.0, 4.0, 6.0)), &mut c).unwrap();
        let page = c.current_page();
        assert_eq!(page.get(0, 0), Some(true));
        assert_eq!(page.get(0, 2), Some(true));
        assert_eq!(page.get(3, 0), Some(true));
        assert_eq!(page.count_set(), 3);
    }

    #[test]
    fn test_rasterize_overflow_leaves_page_untouched() {
        let r = BrailleTextRasterizer::default();
        let mut c = canvas();
        let err = r.rasterize(&BrailleText::new("aaaaa", Rectangle::new(0.0, 0.0, 4.0, 6.0)), &mut c).unwrap_err();
        assert!(matches!(err, Error::InsufficientArea { .. }));
        assert_eq!(c.current_page().count_set(), 0);
    }

    #[test]
    fn test_fit_pattern_to_eight_dots() {
        let fitted = fit_pattern("100100", 2, 4).unwrap();
        assert_eq!(fitted, vec![true, false, false, false, true, false, false, false]);
        assert!(fit_pattern("10000000", 2, 3).is_err());
        assert!(fit_pattern("1010101", 2, 4).is_err());
    }

    #[test]
    fn test_table_from_properties() {
        let props = Properties::parse("a = 100000\nCAP = 000101\n").unwrap();
        let table = SimpleBrailleTable::from_properties(&props).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.pattern("CAP"), Some("000101"));

        let bad = Properties::parse("a = 1x0000\n").unwrap();
        assert!(SimpleBrailleTable::from_properties(&bad).is_err());
    }
}

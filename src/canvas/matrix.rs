//! Dot matrix pages.
//!
//! A [`MatrixData`] stores one value per printable dot in row-major order. The
//! value type is generic: `bool` for plain embossing, `u8` for printers with graded
//! dot heights.

use crate::error::{Error, Result};

/// A page of dots addressed by `(row, column)`, zero-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixData<T> {
    rows: usize,
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + Default> MatrixData<T> {
    /// Create a page filled with `T::default()`.
    ///
    /// # Errors
    ///
    /// Returns an error if rows or columns is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use brailleplot::canvas::MatrixData;
    ///
    /// let page = MatrixData::<bool>::new(6, 4).unwrap();
    /// assert_eq!(page.rows(), 6);
    /// assert_eq!(page.columns(), 4);
    /// ```
    pub fn new(rows: usize, columns: usize) -> Result<Self> {
        if rows == 0 || columns == 0 {
            return Err(Error::InvalidDimensions { width: columns, height: rows });
        }
        Ok(Self { rows, columns, values: vec![T::default(); rows * columns] })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    fn index(&self, row: i64, column: i64) -> Option<usize> {
        if row < 0 || column < 0 {
            return None;
        }
        let (row, column) = (row as usize, column as usize);
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(row * self.columns + column)
    }

    /// Value at a position, or `None` outside the page.
    #[must_use]
    pub fn get(&self, row: i64, column: i64) -> Option<T> {
        self.index(row, column).map(|i| self.values[i])
    }

    /// Set a value. Positions outside the page are ignored.
    pub fn set(&mut self, row: i64, column: i64, value: T) {
        if let Some(i) = self.index(row, column) {
            self.values[i] = value;
        }
    }

    /// Reset every position to `T::default()`.
    pub fn clear(&mut self) {
        self.values.fill(T::default());
    }

    /// Fill a block of `height` rows by `width` columns, clamped to the page.
    pub fn fill_rect(&mut self, row: i64, column: i64, height: i64, width: i64, value: T) {
        let r0 = row.max(0);
        let c0 = column.clamp(0, self.columns as i64);
        let r1 = (row + height).min(self.rows as i64);
        let c1 = (column + width).clamp(c0, self.columns as i64);
        for r in r0..r1 {
            let start = r as usize * self.columns;
            self.values[start + c0 as usize..start + c1 as usize].fill(value);
        }
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[T]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.columns;
        Some(&self.values[start..start + self.columns])
    }

    /// All values in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }

    /// Walk the page braille-cell by braille-cell.
    ///
    /// Cells are `cell_width` x `cell_height` blocks visited left to right, then top
    /// to bottom. Inside a cell the dots are visited column by column, top to bottom,
    /// matching braille dot numbering. Cells hanging over the page edge yield
    /// `T::default()` for the missing dots.
    #[must_use]
    pub fn dot_iter(&self, cell_width: usize, cell_height: usize) -> DotIter<'_, T> {
        DotIter { matrix: self, cell_width: cell_width.max(1), cell_height: cell_height.max(1), position: 0 }
    }

    /// Number of cells per row and per column for the given cell size.
    #[must_use]
    pub fn cell_grid(&self, cell_width: usize, cell_height: usize) -> (usize, usize) {
        (self.columns.div_ceil(cell_width.max(1)), self.rows.div_ceil(cell_height.max(1)))
    }
}

impl MatrixData<bool> {
    /// Number of set dots.
    #[must_use]
    pub fn count_set(&self) -> usize {
        self.values.iter().filter(|v| **v).count()
    }
}

/// Iterator returned by [`MatrixData::dot_iter`].
#[derive(Debug, Clone)]
pub struct DotIter<'a, T> {
    matrix: &'a MatrixData<T>,
    cell_width: usize,
    cell_height: usize,
    position: usize,
}

impl<T: Copy + Default> Iterator for DotIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let (cells_x, cells_y) = self.matrix.cell_grid(self.cell_width, self.cell_height);
        let per_cell = self.cell_width * self.cell_height;
        if self.position >= cells_x * cells_y * per_cell {
            return None;
        }

        let cell = self.position / per_cell;
        let within = self.position % per_cell;
        self.position += 1;

        let row = (cell / cells_x) * self.cell_height + within % self.cell_height;
        let column = (cell % cells_x) * self.cell_width + within / self.cell_height;
        Some(self.matrix.get(row as i64, column as i64).unwrap_or_default())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (cells_x, cells_y) = self.matrix.cell_grid(self.cell_width, self.cell_height);
        let total = cells_x * cells_y * self.cell_width * self.cell_height;
        let left = total.saturating_sub(self.position);
        (left, Some(left))
    }
}

impl<T: Copy + Default> ExactSizeIterator for DotIter<'_, T> {}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The cell walk visits every dot exactly once.
        #[test]
        fn prop_dot_iter_preserves_set_dots(
            rows in 1usize..30,
            columns in 1usize..30,
            dots in proptest::collection::vec((0i64..30, 0i64..30), 0..50),
            cell_height in 3usize..=4,
        ) {
            let mut m = MatrixData::<bool>::new(rows, columns).unwrap();
            for (r, c) in dots {
                m.set(r, c, true);
            }
            prop_assert_eq!(m.dot_iter(2, cell_height).filter(|v| *v).count(), m.count_set());
        }
    }
}

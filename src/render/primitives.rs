//! Primitive drawing on dot matrix pages.
//!
//! All coordinates are dot positions `(x = column, y = row)` and corners are
//! inclusive. Dots falling outside the page are skipped.

use crate::canvas::MatrixData;

/// Draw a line using Bresenham's algorithm.
pub fn draw_line<T: Copy + Default>(page: &mut MatrixData<T>, x0: i64, y0: i64, x1: i64, y1: i64, value: T) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        page.set(y, x, value);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Fill the block spanned by two corners.
pub fn fill<T: Copy + Default>(page: &mut MatrixData<T>, x0: i64, y0: i64, x1: i64, y1: i64, value: T) {
    let (left, right) = (x0.min(x1), x0.max(x1));
    let (top, bottom) = (y0.min(y1), y0.max(y1));
    page.fill_rect(top, left, bottom - top + 1, right - left + 1, value);
}

/// Draw the outline of the rectangle spanned by two corners.
pub fn rectangle<T: Copy + Default>(page: &mut MatrixData<T>, x0: i64, y0: i64, x1: i64, y1: i64, value: T) {
    fill(page, x0, y0, x1, y0, value);
    fill(page, x0, y1, x1, y1, value);
    fill(page, x0, y0, x0, y1, value);
    fill(page, x1, y0, x1, y1, value);
}

/// Draw every second dot of a vertical line, starting with the dot at `y_start`.
///
/// `y_start` is set, `y_end` is excluded; the line may run in either direction.
pub fn dotted_vertical<T: Copy + Default>(page: &mut MatrixData<T>, x: i64, y_start: i64, y_end: i64, on: T) {
    let step = if y_end >= y_start { 1 } else { -1 };
    let mut y = y_start;
    let mut set = true;
    while y != y_end {
        page.set(y, x, if set { on } else { T::default() });
        set = !set;
        y += step;
    }
}

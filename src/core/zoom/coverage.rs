use crate::core::data::complex_rect::ComplexRect;
use crate::core::util::pixel_to_complex_coords::GridSize;
use std::ops::Range;

/// Slack, in display pixels, for edge pixels that land on a bound exactly.
const INDEX_EPSILON: f64 = 1e-9;

/// Which display pixels fall inside a buffer's world bounds.
///
/// Display pixel `(row, col)` sits at `min + index * extent / (n - 1)` on each
/// axis. Rows and columns outside the two ranges are not covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coverage {
    pub fully_contained: bool,
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Coverage {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.rows.contains(&row) && self.cols.contains(&col)
    }

    /// Number of display pixels left uncovered.
    #[cfg(test)]
    pub fn excluded_pixels(&self, display: GridSize) -> usize {
        display.len() - self.rows.len() * self.cols.len()
    }
}

pub fn coverage(
    display_bounds: &ComplexRect,
    display: GridSize,
    world_bounds: &ComplexRect,
) -> Coverage {
    let cols = covered_range(
        display_bounds.min_x(),
        display.step_x(display_bounds),
        display.cols,
        world_bounds.min_x(),
        world_bounds.max_x(),
    );
    let rows = covered_range(
        display_bounds.min_y(),
        display.step_y(display_bounds),
        display.rows,
        world_bounds.min_y(),
        world_bounds.max_y(),
    );

    Coverage {
        fully_contained: rows == (0..display.rows) && cols == (0..display.cols),
        rows,
        cols,
    }
}

fn covered_range(start: f64, step: f64, count: usize, min: f64, max: f64) -> Range<usize> {
    let first = ((min - start) / step - INDEX_EPSILON).ceil().max(0.0);
    let last = ((max - start) / step + INDEX_EPSILON).floor();

    if !(last >= first) {
        return 0..0;
    }

    let first = (first as usize).min(count);
    let end = (last as usize).saturating_add(1).min(count);

    if first >= end { 0..0 } else { first..end }
}

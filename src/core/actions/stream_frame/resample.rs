use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fractal_buffer::FractalBuffer;
use crate::core::util::pixel_to_complex_coords::GridSize;
use crate::core::zoom::coverage::{Coverage, coverage};
use std::ops::Range;

const SHIFT: u32 = 16;
const ONE: f64 = (1u32 << SHIFT) as f64;

/// Nearest-pixel stepping along one axis in 16.16 fixed point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisStepper {
    start: u32,
    step: u32,
    last_index: usize,
}

impl AxisStepper {
    /// Buffer indices for the first `count` covered display indices.
    pub fn indices(&self, count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..count).map(move |i| self.index_at(i))
    }

    /// Buffer index for the `i`th covered display index.
    #[must_use]
    pub fn index_at(&self, i: usize) -> usize {
        let acc = self.start.wrapping_add(self.step.wrapping_mul(i as u32));
        ((acc >> SHIFT) as usize).min(self.last_index)
    }
}

fn axis(
    display_min: f64,
    display_step: f64,
    first: usize,
    world_min: f64,
    world_step: f64,
    buffer_len: usize,
) -> AxisStepper {
    let position = (display_min + first as f64 * display_step - world_min) / world_step;
    let step = display_step / world_step;

    AxisStepper {
        start: ((position.max(0.0) + 0.5) * ONE) as u32,
        step: (step * ONE).round() as u32,
        last_index: buffer_len - 1,
    }
}

/// Maps display pixels onto the nearest pixels of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resample {
    pub coverage: Coverage,
    rows: AxisStepper,
    cols: AxisStepper,
}

impl Resample {
    #[must_use]
    pub fn new(display_bounds: &ComplexRect, display: GridSize, buffer: &FractalBuffer) -> Self {
        let world = buffer.world_bounds();
        let grid = buffer.grid();
        let coverage = coverage(display_bounds, display, &world);

        let cols = axis(
            display_bounds.min_x(),
            display.step_x(display_bounds),
            coverage.cols.start,
            world.min_x(),
            grid.step_x(&world),
            grid.cols,
        );
        let rows = axis(
            display_bounds.min_y(),
            display.step_y(display_bounds),
            coverage.rows.start,
            world.min_y(),
            grid.step_y(&world),
            grid.rows,
        );

        Self {
            coverage,
            rows,
            cols,
        }
    }

    /// Buffer row for a covered display row.
    #[must_use]
    pub fn buffer_row(&self, display_row: usize) -> usize {
        self.rows
            .index_at(display_row.saturating_sub(self.coverage.rows.start))
    }

    /// Buffer columns for the covered display columns, in order.
    pub fn buffer_cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.cols.indices(self.coverage.cols.len())
    }

    #[must_use]
    pub fn covered_cols(&self) -> Range<usize> {
        self.coverage.cols.clone()
    }
}

use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::point::Point;
use crate::core::util::pixel_to_complex_coords::{
    GridSize, complex_to_pixel_coords, pixel_to_complex_coords,
};
use std::error::Error;
use std::fmt;

/// Settings for one compute pass over a [`FractalBuffer`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PassParams {
    pub world_bounds: ComplexRect,
    pub max_iterations: u16,
    /// Subtracted from raw escape counts before storing.
    pub iteration_offset: u16,
    pub use_cycle_detection: bool,
}

impl PassParams {
    /// Largest value a pass with these settings can store.
    #[must_use]
    pub fn max_stored_value(&self) -> u8 {
        let span = self.max_iterations.saturating_sub(self.iteration_offset);
        span.min(u16::from(u8::MAX)) as u8
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FractalBufferError {
    InvalidDimensions { rows: usize, cols: usize },
    InvalidIterations { max_iterations: u16, iteration_offset: u16 },
}

impl fmt::Display for FractalBufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimensions { rows, cols } => {
                write!(f, "fractal buffer must be at least 2x2, got {}x{}", cols, rows)
            }
            Self::InvalidIterations {
                max_iterations,
                iteration_offset,
            } => {
                write!(
                    f,
                    "max iterations {} must exceed iteration offset {}",
                    max_iterations, iteration_offset
                )
            }
        }
    }
}

impl Error for FractalBufferError {}

/// Row-major grid of escape results.
///
/// A value of 0 means the pixel did not escape (or was classified as a
/// periodic orbit); any other value is the escape iteration minus the pass's
/// iteration offset, clamped to at least 1.
///
/// Generation is resumable: `next_row` records how far the current pass has
/// progressed, so a pass can be advanced a few rows at a time.
#[derive(Debug, Clone)]
pub struct FractalBuffer {
    grid: GridSize,
    params: PassParams,
    pass_id: u64,
    next_row: usize,
    count_inside: u32,
    min_iteration_seen: u8,
    data: Vec<u8>,
}

impl FractalBuffer {
    pub fn new(rows: usize, cols: usize, params: PassParams) -> Result<Self, FractalBufferError> {
        if rows < 2 || cols < 2 {
            return Err(FractalBufferError::InvalidDimensions { rows, cols });
        }

        validate_params(&params)?;

        Ok(Self {
            grid: GridSize::new(rows, cols),
            params,
            pass_id: 0,
            next_row: 0,
            count_inside: 0,
            min_iteration_seen: params.max_stored_value(),
            data: vec![0; rows * cols],
        })
    }

    /// Re-initialises the buffer for a new compute pass. Pixel data is left in
    /// place and overwritten row by row.
    pub fn begin_pass(&mut self, params: PassParams, pass_id: u64) -> Result<(), FractalBufferError> {
        validate_params(&params)?;

        self.params = params;
        self.pass_id = pass_id;
        self.next_row = 0;
        self.count_inside = 0;
        self.min_iteration_seen = params.max_stored_value();

        Ok(())
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.grid.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.grid.cols
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    #[must_use]
    pub fn params(&self) -> &PassParams {
        &self.params
    }

    #[must_use]
    pub fn world_bounds(&self) -> ComplexRect {
        self.params.world_bounds
    }

    #[must_use]
    pub fn pass_id(&self) -> u64 {
        self.pass_id
    }

    #[must_use]
    pub fn count_inside(&self) -> u32 {
        self.count_inside
    }

    /// Smallest nonzero value stored so far in this pass.
    #[must_use]
    pub fn min_iteration_seen(&self) -> u8 {
        self.min_iteration_seen
    }

    #[must_use]
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_row >= self.grid.rows
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.grid.cols;
        &self.data[start..start + self.grid.cols]
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.grid.cols + col]
    }

    #[must_use]
    pub fn get_point(&self, point: Point) -> Option<u8> {
        if !self.grid.contains(point) {
            return None;
        }

        Some(self.get(point.y as usize, point.x as usize))
    }

    #[must_use]
    pub fn world_of(&self, point: Point) -> Option<Complex> {
        pixel_to_complex_coords(point, self.grid, self.params.world_bounds).ok()
    }

    #[must_use]
    pub fn pixel_of(&self, world: Complex) -> Option<Point> {
        complex_to_pixel_coords(world, self.grid, self.params.world_bounds)
    }

    /// Hands out the next row to generate, if the pass is not yet complete.
    pub(crate) fn next_row_mut(&mut self) -> Option<(usize, &mut [u8])> {
        if self.is_complete() {
            return None;
        }

        let row = self.next_row;
        let start = row * self.grid.cols;
        Some((row, &mut self.data[start..start + self.grid.cols]))
    }

    /// Records statistics for the row handed out by [`Self::next_row_mut`].
    pub(crate) fn finish_row(&mut self, inside: u32, min_seen: u8) {
        self.count_inside += inside;
        self.min_iteration_seen = self.min_iteration_seen.min(min_seen);
        self.next_row += 1;
    }

    #[cfg(test)]
    pub(crate) fn fill(&mut self, value: u8) {
        self.data.fill(value);
        self.next_row = self.grid.rows;
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.grid.cols + col] = value;
    }
}

fn validate_params(params: &PassParams) -> Result<(), FractalBufferError> {
    if params.max_iterations <= params.iteration_offset {
        return Err(FractalBufferError::InvalidIterations {
            max_iterations: params.max_iterations,
            iteration_offset: params.iteration_offset,
        });
    }

    Ok(())
}

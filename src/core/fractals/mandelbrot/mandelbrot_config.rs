use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fixed::Fixed;
use crate::core::data::fractal_buffer::PassParams;
use crate::core::fractals::mandelbrot::cycle::CycleDetection;
use crate::core::fractals::mandelbrot::errors::MandelbrotError;

const DEFAULT_BUFFER_ROWS: usize = 320;
const DEFAULT_BUFFER_COLS: usize = 320;
const DEFAULT_MAX_ITERATIONS: u16 = 224;
const DEFAULT_CYCLE_ENABLE_DIVISOR: u32 = 16;

pub(crate) fn default_bounds() -> ComplexRect {
    ComplexRect::from_bounds(-2.1, 1.2, -1.3, 1.3).expect("default fractal region is valid")
}

/// Escape-time settings for a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MandelbrotConfig {
    pub initial_bounds: ComplexRect,
    pub buffer_rows: usize,
    pub buffer_cols: usize,
    /// Iteration budget of the first pass; later passes add the tracked offset.
    pub max_iterations: u16,
    /// Shift stored values down by the smallest escape count of the previous pass.
    pub track_iteration_offset: bool,
    /// Cycle detection is switched on for the next pass once more than
    /// `rows * cols / cycle_enable_divisor` pixels are inside.
    pub cycle_enable_divisor: u32,
    pub cycle_detection: CycleDetection,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            initial_bounds: default_bounds(),
            buffer_rows: DEFAULT_BUFFER_ROWS,
            buffer_cols: DEFAULT_BUFFER_COLS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            track_iteration_offset: true,
            cycle_enable_divisor: DEFAULT_CYCLE_ENABLE_DIVISOR,
            cycle_detection: CycleDetection::default(),
        }
    }
}

impl MandelbrotConfig {
    pub fn validate(&self) -> Result<(), MandelbrotError> {
        if self.max_iterations == 0 {
            return Err(MandelbrotError::ZeroMaxIterationsError);
        }

        if self.max_iterations > u16::from(u8::MAX) {
            return Err(MandelbrotError::IterationsExceedStorage {
                max_iterations: self.max_iterations,
            });
        }

        if self.buffer_rows < 2 || self.buffer_cols < 2 {
            return Err(MandelbrotError::BufferTooSmall {
                rows: self.buffer_rows,
                cols: self.buffer_cols,
            });
        }

        let limit = Fixed::range_limit();
        let bounds = self.initial_bounds;
        if [bounds.min_x(), bounds.max_x(), bounds.min_y(), bounds.max_y()]
            .iter()
            .any(|v| v.abs() >= limit)
        {
            return Err(MandelbrotError::BoundsOutOfRange { bounds, limit });
        }

        if self.cycle_enable_divisor == 0 {
            return Err(MandelbrotError::ZeroCycleEnableDivisor);
        }

        self.cycle_detection.validate()?;

        Ok(())
    }

    /// Settings for the first pass of a zoom sequence.
    #[must_use]
    pub fn initial_pass(&self) -> PassParams {
        PassParams {
            world_bounds: self.initial_bounds,
            max_iterations: self.max_iterations,
            iteration_offset: 0,
            use_cycle_detection: false,
        }
    }

    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.buffer_rows * self.buffer_cols
    }
}

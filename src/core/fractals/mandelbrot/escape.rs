//! Fixed-point escape-time generation into a [`FractalBuffer`].
//!
//! Pixel coordinates are stepped, not recomputed: the per-pixel increment is
//! derived once per pass, x accumulates along a row and each row start is
//! `min_y + inc_y * row`. Because the row start is an integer multiple, a pass
//! can stop after any row and resume later with bit-identical results.

use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fixed::Fixed;
use crate::core::data::fractal_buffer::FractalBuffer;
use crate::core::fractals::mandelbrot::cycle::CycleDetection;
use crate::core::util::pixel_to_complex_coords::GridSize;

/// Outcome of iterating a single point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Escape {
    /// `|z|^2 > 4` at this iteration (counted from 1).
    Escaped(u16),
    /// Reached the iteration limit.
    Inside,
    /// Returned to a checkpointed position; treated as inside.
    Periodic,
}

impl Escape {
    /// Byte stored in the buffer for this outcome.
    #[must_use]
    pub fn stored_value(self, iteration_offset: u16, max_stored: u8) -> u8 {
        match self {
            Self::Escaped(k) => k
                .saturating_sub(iteration_offset)
                .clamp(1, u16::from(max_stored.max(1))) as u8,
            Self::Inside | Self::Periodic => 0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GenerationProgress {
    pub rows_done: usize,
    pub complete: bool,
}

/// Fixed-point increments between adjacent columns and rows.
#[must_use]
pub fn pixel_increments(world_bounds: &ComplexRect, grid: GridSize) -> (Fixed, Fixed) {
    (
        Fixed::from_f64(grid.step_x(world_bounds)),
        Fixed::from_f64(grid.step_y(world_bounds)),
    )
}

#[derive(Debug, Copy, Clone)]
struct PassSteps {
    min_x: Fixed,
    min_y: Fixed,
    inc_x: Fixed,
    inc_y: Fixed,
    max_iterations: u16,
    iteration_offset: u16,
    max_stored: u8,
    use_cycle_detection: bool,
}

impl PassSteps {
    fn for_buffer(buffer: &FractalBuffer) -> Self {
        let params = buffer.params();
        let bounds = params.world_bounds;
        let (inc_x, inc_y) = pixel_increments(&bounds, buffer.grid());

        Self {
            min_x: Fixed::from_f64(bounds.min_x()),
            min_y: Fixed::from_f64(bounds.min_y()),
            inc_x,
            inc_y,
            max_iterations: params.max_iterations,
            iteration_offset: params.iteration_offset,
            max_stored: params.max_stored_value(),
            use_cycle_detection: params.use_cycle_detection,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EscapeEngine {
    cycle: CycleDetection,
    tolerance_raw: u32,
    escape_radius_squared: Fixed,
}

impl Default for EscapeEngine {
    fn default() -> Self {
        Self::new(CycleDetection::default())
    }
}

impl EscapeEngine {
    #[must_use]
    pub fn new(cycle: CycleDetection) -> Self {
        Self {
            tolerance_raw: cycle.tolerance_raw(),
            cycle,
            escape_radius_squared: Fixed::from_int(4),
        }
    }

    #[must_use]
    pub fn cycle_detection(&self) -> &CycleDetection {
        &self.cycle
    }

    /// Runs the current pass of `buffer` to completion.
    pub fn generate(&self, buffer: &mut FractalBuffer) {
        self.generate_rows(buffer, usize::MAX);
    }

    /// Advances the current pass by at most `max_rows` rows.
    pub fn generate_rows(&self, buffer: &mut FractalBuffer, max_rows: usize) -> GenerationProgress {
        let steps = PassSteps::for_buffer(buffer);
        let mut rows_done = 0;

        while rows_done < max_rows {
            let Some((row, data)) = buffer.next_row_mut() else {
                break;
            };

            let (inside, min_seen) = self.fill_row(&steps, row, data);
            buffer.finish_row(inside, min_seen);
            rows_done += 1;
        }

        GenerationProgress {
            rows_done,
            complete: buffer.is_complete(),
        }
    }

    fn fill_row(&self, steps: &PassSteps, row: usize, data: &mut [u8]) -> (u32, u8) {
        let y0 = steps.min_y + steps.inc_y.mul_int(row as i32);
        let mut x0 = steps.min_x;
        let mut inside = 0;
        let mut min_seen = steps.max_stored;

        for pixel in data.iter_mut() {
            let escape = self.escape_time(x0, y0, steps.max_iterations, steps.use_cycle_detection);
            let value = escape.stored_value(steps.iteration_offset, steps.max_stored);

            if value == 0 {
                inside += 1;
            } else {
                min_seen = min_seen.min(value);
            }

            *pixel = value;
            x0 = x0 + steps.inc_x;
        }

        (inside, min_seen)
    }

    /// Iterates `z -> z^2 + c` from `z = c`.
    #[must_use]
    pub fn escape_time(
        &self,
        x0: Fixed,
        y0: Fixed,
        max_iterations: u16,
        use_cycle_detection: bool,
    ) -> Escape {
        let mut x = x0;
        let mut y = y0;
        let mut checkpoint = (x0, y0);

        for k in 1..max_iterations {
            let xx = x.square();
            let yy = y.square();

            if xx + yy > self.escape_radius_squared {
                return Escape::Escaped(k);
            }

            let next_y = x.mul(y).double() + y0;
            x = xx - yy + x0;
            y = next_y;

            if use_cycle_detection && k >= self.cycle.start_iteration {
                if x.abs_diff(checkpoint.0) <= self.tolerance_raw
                    && y.abs_diff(checkpoint.1) <= self.tolerance_raw
                {
                    return Escape::Periodic;
                }

                if k % self.cycle.checkpoint_interval == 0 {
                    checkpoint = (x, y);
                }
            }
        }

        Escape::Inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::generate_fractal::generate_fractal_rayon::generate_fractal_rayon;
    use crate::core::data::complex::Complex;
    use crate::core::data::fractal_buffer::PassParams;
    use crate::core::data::point::Point;
    use crate::core::fractals::mandelbrot::algorithm::MandelbrotAlgorithm;
    use crate::core::util::pixel_to_complex_coords::pixel_to_complex_coords;

    const ROWS: usize = 320;
    const COLS: usize = 320;

    fn default_bounds() -> ComplexRect {
        ComplexRect::from_bounds(-2.1, 1.2, -1.3, 1.3).unwrap()
    }

    fn params(use_cycle_detection: bool) -> PassParams {
        PassParams {
            world_bounds: default_bounds(),
            max_iterations: 224,
            iteration_offset: 0,
            use_cycle_detection,
        }
    }

    fn generated(use_cycle_detection: bool) -> FractalBuffer {
        let mut buffer = FractalBuffer::new(ROWS, COLS, params(use_cycle_detection)).unwrap();
        EscapeEngine::default().generate(&mut buffer);
        buffer
    }

    fn agreement_with_reference(buffer: &FractalBuffer) -> f64 {
        let algorithm = MandelbrotAlgorithm::new(buffer.grid(), default_bounds(), 224).unwrap();
        let reference = generate_fractal_rayon(buffer.grid(), &algorithm).unwrap();

        let matching = buffer
            .data()
            .iter()
            .zip(reference.iter())
            .filter(|(fixed, exact)| (**fixed == 0) == (**exact == 0))
            .count();

        matching as f64 / reference.len() as f64
    }

    #[test]
    fn classification_agrees_with_double_precision_reference() {
        let buffer = generated(false);

        let agreement = agreement_with_reference(&buffer);

        assert!(agreement >= 0.99, "agreement was {}", agreement);
    }

    #[test]
    fn cycle_detection_keeps_classification_agreement() {
        let buffer = generated(true);

        let agreement = agreement_with_reference(&buffer);

        assert!(agreement >= 0.99, "agreement was {}", agreement);
    }

    #[test]
    fn corner_pixel_escapes_on_first_iteration() {
        let buffer = generated(false);

        assert_eq!(buffer.get(0, 0), 1);
    }

    #[test]
    fn pixel_nearest_origin_is_inside() {
        let buffer = generated(false);
        let origin = buffer.pixel_of(Complex::new(0.0, 0.0)).unwrap();

        assert_eq!(buffer.get_point(origin), Some(0));
    }

    #[test]
    fn generation_is_idempotent() {
        let mut buffer = generated(true);
        let first = buffer.data().to_vec();

        buffer.begin_pass(params(true), 1).unwrap();
        EscapeEngine::default().generate(&mut buffer);

        assert_eq!(buffer.data(), first.as_slice());
    }

    #[test]
    fn incremental_rows_match_a_full_pass() {
        let full = generated(false);
        let mut partial = FractalBuffer::new(ROWS, COLS, params(false)).unwrap();
        let engine = EscapeEngine::default();

        let mut slices = 0;
        loop {
            let progress = engine.generate_rows(&mut partial, 7);
            slices += 1;
            if progress.complete {
                break;
            }
            assert_eq!(progress.rows_done, 7);
        }

        assert_eq!(slices, ROWS.div_ceil(7));
        assert_eq!(partial.data(), full.data());
        assert_eq!(partial.count_inside(), full.count_inside());
        assert_eq!(partial.min_iteration_seen(), full.min_iteration_seen());
    }

    #[test]
    fn generate_rows_on_complete_buffer_does_nothing() {
        let mut buffer = generated(false);

        let progress = EscapeEngine::default().generate_rows(&mut buffer, 10);

        assert_eq!(
            progress,
            GenerationProgress {
                rows_done: 0,
                complete: true
            }
        );
    }

    #[test]
    fn statistics_match_buffer_contents() {
        let buffer = generated(false);

        let zeros = buffer.data().iter().filter(|v| **v == 0).count() as u32;
        let min_nonzero = buffer.data().iter().copied().filter(|v| *v != 0).min();

        assert_eq!(buffer.count_inside(), zeros);
        assert_eq!(Some(buffer.min_iteration_seen()), min_nonzero);
        assert!(buffer.data().iter().all(|v| *v <= 224));
    }

    #[test]
    fn iteration_offset_is_subtracted_and_clamped() {
        let offset_params = PassParams {
            iteration_offset: 3,
            ..params(false)
        };
        let mut buffer = FractalBuffer::new(ROWS, COLS, offset_params).unwrap();
        EscapeEngine::default().generate(&mut buffer);
        let plain = generated(false);

        for (shifted, original) in buffer.data().iter().zip(plain.data().iter()) {
            match *original {
                0 => assert_eq!(*shifted, 0),
                v if v <= 4 => assert_eq!(*shifted, 1),
                v => assert_eq!(*shifted, v - 3),
            }
        }
    }

    #[test]
    fn known_escape_times() {
        let engine = EscapeEngine::default();

        assert_eq!(
            engine.escape_time(Fixed::ONE, Fixed::ZERO, 100, false),
            Escape::Escaped(3)
        );
        assert_eq!(
            engine.escape_time(Fixed::ZERO, Fixed::ZERO, 100, false),
            Escape::Inside
        );
    }

    #[test]
    fn attracting_fixed_point_is_detected_as_periodic() {
        let engine = EscapeEngine::default();
        let c = Fixed::from_f64(-0.1);

        assert_eq!(engine.escape_time(c, Fixed::ZERO, 1000, true), Escape::Periodic);
        assert_eq!(engine.escape_time(c, Fixed::ZERO, 1000, false), Escape::Inside);
    }

    #[test]
    fn escaping_points_are_never_reported_periodic() {
        let engine = EscapeEngine::default();
        let algorithm_rect = ComplexRect::from_bounds(-2.0, 2.0, -2.0, 2.0).unwrap();
        let grid = GridSize::new(41, 41);

        for y in 0..41 {
            for x in 0..41 {
                let c = pixel_to_complex_coords(Point::new(x, y), grid, algorithm_rect).unwrap();
                let plain = engine.escape_time(
                    Fixed::from_f64(c.real),
                    Fixed::from_f64(c.imag),
                    200,
                    false,
                );
                let detected = engine.escape_time(
                    Fixed::from_f64(c.real),
                    Fixed::from_f64(c.imag),
                    200,
                    true,
                );

                if detected == Escape::Periodic {
                    assert_eq!(plain, Escape::Inside, "c = {:?}", c);
                }
            }
        }
    }

    #[test]
    fn stored_value_clamps_to_range() {
        assert_eq!(Escape::Escaped(1).stored_value(5, 200), 1);
        assert_eq!(Escape::Escaped(300).stored_value(0, 224), 224);
        assert_eq!(Escape::Escaped(40).stored_value(8, 224), 32);
        assert_eq!(Escape::Inside.stored_value(0, 224), 0);
        assert_eq!(Escape::Periodic.stored_value(0, 224), 0);
    }
}

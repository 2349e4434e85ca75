use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::point::Point;
use crate::core::util::pixel_to_complex_coords::{
    GridSize, PixelToComplexCoordsError, pixel_to_complex_coords,
};
use std::error::Error;
use std::fmt;

/// Double-precision escape-time algorithm.
///
/// Uses the same iteration convention as the fixed-point engine (the orbit
/// starts at `c`, iterations count from 1) and returns the raw escape
/// iteration, or 0 when the point does not escape within `max_iterations`.
#[derive(Debug, Clone, PartialEq)]
pub struct MandelbrotAlgorithm {
    grid: GridSize,
    complex_rect: ComplexRect,
    max_iterations: u16,
}

#[derive(Debug)]
pub enum MandelbrotAlgorithmConstructorError {
    ZeroMaxIterationsError,
}

impl fmt::Display for MandelbrotAlgorithmConstructorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxIterationsError => {
                write!(f, "Maximum iterations must be greater than zero")
            }
        }
    }
}

impl Error for MandelbrotAlgorithmConstructorError {}

impl FractalAlgorithm for MandelbrotAlgorithm {
    type Success = u16;
    type Failure = PixelToComplexCoordsError;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
        let c = pixel_to_complex_coords(pixel, self.grid, self.complex_rect)?;
        Ok(escape_time_f64(c, self.max_iterations))
    }
}

impl MandelbrotAlgorithm {
    pub fn new(
        grid: GridSize,
        complex_rect: ComplexRect,
        max_iterations: u16,
    ) -> Result<Self, MandelbrotAlgorithmConstructorError> {
        if max_iterations == 0 {
            return Err(MandelbrotAlgorithmConstructorError::ZeroMaxIterationsError);
        }

        Ok(Self {
            grid,
            complex_rect,
            max_iterations,
        })
    }
}

#[must_use]
pub fn escape_time_f64(c: Complex, max_iterations: u16) -> u16 {
    let mut z = c;

    for iteration in 1..max_iterations {
        if z.magnitude_squared() > 4.0 {
            return iteration;
        }
        z = z * z + c;
    }

    0
}

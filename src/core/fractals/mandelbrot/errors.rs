use crate::core::data::complex_rect::ComplexRect;
use crate::core::fractals::mandelbrot::cycle::CycleDetectionError;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq)]
pub enum MandelbrotError {
    ZeroMaxIterationsError,
    BufferTooSmall { rows: usize, cols: usize },
    IterationsExceedStorage { max_iterations: u16 },
    BoundsOutOfRange { bounds: ComplexRect, limit: f64 },
    ZeroCycleEnableDivisor,
    CycleDetection(CycleDetectionError),
}

impl fmt::Display for MandelbrotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroMaxIterationsError => {
                write!(f, "Maximum iterations must be greater than zero")
            }
            Self::BufferTooSmall { rows, cols } => {
                write!(f, "fractal buffer must be at least 2x2, got {}x{}", cols, rows)
            }
            Self::IterationsExceedStorage { max_iterations } => {
                write!(
                    f,
                    "maximum iterations {} exceed the 255 values a buffer pixel can hold",
                    max_iterations
                )
            }
            Self::BoundsOutOfRange { bounds, limit } => {
                write!(
                    f,
                    "bounds ({}, {}) to ({}, {}) exceed the fixed-point range of +/-{}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.max_x(),
                    bounds.max_y(),
                    limit
                )
            }
            Self::ZeroCycleEnableDivisor => {
                write!(f, "cycle enable divisor must be greater than zero")
            }
            Self::CycleDetection(err) => write!(f, "{}", err),
        }
    }
}

impl Error for MandelbrotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CycleDetection(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CycleDetectionError> for MandelbrotError {
    fn from(err: CycleDetectionError) -> Self {
        Self::CycleDetection(err)
    }
}

use crate::core::data::point::Point;
use std::error::Error;

/// Per-pixel fractal computation, addressed by grid position.
pub trait FractalAlgorithm {
    type Success;
    type Failure: Error;

    fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure>;
}

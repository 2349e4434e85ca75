use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::point::Point;
use crate::core::util::pixel_to_complex_coords::GridSize;

/// Computes every grid pixel on the calling thread, in row-major order.
pub fn generate_fractal<Alg: FractalAlgorithm>(
    grid: GridSize,
    algorithm: &Alg,
) -> Result<Vec<Alg::Success>, Alg::Failure> {
    (0..grid.rows as i32)
        .flat_map(|y| (0..grid.cols as i32).map(move |x| Point { x, y }))
        .map(|pixel| algorithm.compute(pixel))
        .collect()
}

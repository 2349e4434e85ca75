use rayon::prelude::*;

use crate::core::actions::generate_fractal::ports::fractal_algorithm::FractalAlgorithm;
use crate::core::data::point::Point;
use crate::core::util::pixel_to_complex_coords::GridSize;

/// Generates fractal data with rows spread over rayon's work-stealing pool.
///
/// Only the offline reference path uses this; the live pipeline keeps to its
/// two execution contexts.
pub fn generate_fractal_rayon<Alg>(
    grid: GridSize,
    algorithm: &Alg,
) -> Result<Vec<Alg::Success>, Alg::Failure>
where
    Alg: FractalAlgorithm + Sync,
    Alg::Success: Send,
    Alg::Failure: Send,
{
    let rows: Result<Vec<Vec<Alg::Success>>, Alg::Failure> = (0..grid.rows as i32)
        .into_par_iter()
        .map(|y| {
            (0..grid.cols as i32)
                .map(|x| algorithm.compute(Point { x, y }))
                .collect()
        })
        .collect();

    rows.map(|rows| rows.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::generate_fractal::generate_fractal::generate_fractal;
    use crate::core::data::complex_rect::ComplexRect;
    use crate::core::fractals::mandelbrot::algorithm::MandelbrotAlgorithm;
    use std::fmt;

    /// Fails on one pixel, echoes the position everywhere else.
    struct FailsAt(Point);

    #[derive(Debug, PartialEq)]
    struct Unreachable(Point);

    impl fmt::Display for Unreachable {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "cannot compute {:?}", self.0)
        }
    }

    impl std::error::Error for Unreachable {}

    impl FractalAlgorithm for FailsAt {
        type Success = (i32, i32);
        type Failure = Unreachable;

        fn compute(&self, pixel: Point) -> Result<Self::Success, Self::Failure> {
            if pixel == self.0 {
                Err(Unreachable(pixel))
            } else {
                Ok((pixel.x, pixel.y))
            }
        }
    }

    #[test]
    fn matches_serial_generation_of_the_set() {
        let grid = GridSize::new(40, 52);
        let bounds = ComplexRect::from_bounds(-2.1, 1.2, -1.3, 1.3).unwrap();
        let algorithm = MandelbrotAlgorithm::new(grid, bounds, 96).unwrap();

        let serial = generate_fractal(grid, &algorithm).unwrap();
        let parallel = generate_fractal_rayon(grid, &algorithm).unwrap();

        assert_eq!(parallel.len(), grid.len());
        assert_eq!(parallel, serial);
        assert!(parallel.contains(&0), "some of the region is inside the set");
    }

    #[test]
    fn output_is_row_major() {
        let outside_grid = Point { x: -1, y: -1 };

        let results = generate_fractal_rayon(GridSize::new(2, 3), &FailsAt(outside_grid)).unwrap();

        assert_eq!(results, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn a_failing_pixel_fails_the_pass() {
        let bad = Point { x: 2, y: 3 };

        let result = generate_fractal_rayon(GridSize::new(4, 3), &FailsAt(bad));

        assert_eq!(result, Err(Unreachable(bad)));
    }
}

use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::point::Point;
use std::error::Error;
use std::fmt;

/// Size of a pixel grid. Row 0 maps to `min_y`, column 0 to `min_x`, and the
/// last row/column map exactly onto the opposite edges.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GridSize {
    pub rows: usize,
    pub cols: usize,
}

impl GridSize {
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols
            && (point.y as usize) < self.rows
    }

    /// World distance between adjacent columns.
    #[must_use]
    pub fn step_x(&self, rect: &ComplexRect) -> f64 {
        rect.width() / (self.cols - 1) as f64
    }

    /// World distance between adjacent rows.
    #[must_use]
    pub fn step_y(&self, rect: &ComplexRect) -> f64 {
        rect.height() / (self.rows - 1) as f64
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PixelToComplexCoordsError {
    PointOutsideGrid { point: Point, grid: GridSize },
}

impl fmt::Display for PixelToComplexCoordsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PointOutsideGrid { point, grid } => {
                write!(
                    f,
                    "point (x: {}, y: {}) is outside the {}x{} grid",
                    point.x, point.y, grid.cols, grid.rows
                )
            }
        }
    }
}

impl Error for PixelToComplexCoordsError {}

pub fn pixel_to_complex_coords(
    pixel_position: Point,
    grid: GridSize,
    complex_rect: ComplexRect,
) -> Result<Complex, PixelToComplexCoordsError> {
    if !grid.contains(pixel_position) {
        return Err(PixelToComplexCoordsError::PointOutsideGrid {
            point: pixel_position,
            grid,
        });
    }

    let real = complex_rect.min_x() + f64::from(pixel_position.x) * grid.step_x(&complex_rect);
    let imag = complex_rect.min_y() + f64::from(pixel_position.y) * grid.step_y(&complex_rect);

    Ok(Complex { real, imag })
}

/// Nearest grid pixel to `point`, or `None` when it lies outside the rect.
#[must_use]
pub fn complex_to_pixel_coords(
    point: Complex,
    grid: GridSize,
    complex_rect: ComplexRect,
) -> Option<Point> {
    if !complex_rect.contains_point(point) {
        return None;
    }

    let x = ((point.real - complex_rect.min_x()) / grid.step_x(&complex_rect)).round() as i32;
    let y = ((point.imag - complex_rect.min_y()) / grid.step_y(&complex_rect)).round() as i32;

    let x = x.clamp(0, grid.cols as i32 - 1);
    let y = y.clamp(0, grid.rows as i32 - 1);

    Some(Point { x, y })
}

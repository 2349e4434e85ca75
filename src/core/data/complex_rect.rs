use crate::core::data::complex::Complex;
use std::error::Error;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ComplexRectError {
    InvalidSize { width: f64, height: f64 },
}

impl fmt::Display for ComplexRectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSize { width, height } => {
                write!(
                    f,
                    "complex rect size must be positive: {}x{}",
                    width, height
                )
            }
        }
    }
}

impl Error for ComplexRectError {}

/// An axis-aligned rectangle in the fractal plane.
///
/// `top_left` holds the minimum real/imaginary corner and `bottom_right` the
/// maximum one, so buffer row 0 maps to `min_y`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ComplexRect {
    top_left: Complex,
    bottom_right: Complex,
}

impl ComplexRect {
    pub fn new(top_left: Complex, bottom_right: Complex) -> Result<Self, ComplexRectError> {
        let width = bottom_right.real - top_left.real;
        let height = bottom_right.imag - top_left.imag;

        // `!(x > 0.0)` also rejects NaN extents.
        if !(width > 0.0) || !(height > 0.0) {
            return Err(ComplexRectError::InvalidSize { width, height });
        }

        Ok(Self {
            top_left,
            bottom_right,
        })
    }

    /// Builds a rect from `(min_x, max_x, min_y, max_y)`.
    pub fn from_bounds(
        min_x: f64,
        max_x: f64,
        min_y: f64,
        max_y: f64,
    ) -> Result<Self, ComplexRectError> {
        Self::new(Complex::new(min_x, min_y), Complex::new(max_x, max_y))
    }

    pub fn from_center(
        center: Complex,
        half_width: f64,
        half_height: f64,
    ) -> Result<Self, ComplexRectError> {
        Self::new(
            Complex::new(center.real - half_width, center.imag - half_height),
            Complex::new(center.real + half_width, center.imag + half_height),
        )
    }

    #[must_use]
    pub fn top_left(&self) -> Complex {
        self.top_left
    }

    #[must_use]
    pub fn bottom_right(&self) -> Complex {
        self.bottom_right
    }

    #[must_use]
    pub fn min_x(&self) -> f64 {
        self.top_left.real
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.bottom_right.real
    }

    #[must_use]
    pub fn min_y(&self) -> f64 {
        self.top_left.imag
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.bottom_right.imag
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.bottom_right.real - self.top_left.real
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom_right.imag - self.top_left.imag
    }

    #[must_use]
    pub fn half_width(&self) -> f64 {
        self.width() * 0.5
    }

    #[must_use]
    pub fn half_height(&self) -> f64 {
        self.height() * 0.5
    }

    #[must_use]
    pub fn center(&self) -> Complex {
        Complex::new(
            (self.top_left.real + self.bottom_right.real) * 0.5,
            (self.top_left.imag + self.bottom_right.imag) * 0.5,
        )
    }

    #[must_use]
    pub fn contains_point(&self, point: Complex) -> bool {
        self.top_left.real <= point.real
            && self.top_left.imag <= point.imag
            && self.bottom_right.real >= point.real
            && self.bottom_right.imag >= point.imag
    }

    /// Four-edge containment check.
    #[must_use]
    pub fn contains_rect(&self, other: &ComplexRect) -> bool {
        self.min_x() <= other.min_x()
            && self.max_x() >= other.max_x()
            && self.min_y() <= other.min_y()
            && self.max_y() >= other.max_y()
    }
}

use crate::core::data::colour::Rgb565;
use crate::core::util::pixel_to_complex_coords::GridSize;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    SizeMismatch { grid_size: usize, pixel_count: usize },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch {
                grid_size,
                pixel_count,
            } => {
                write!(
                    f,
                    "grid size {} does not match pixel count {}",
                    grid_size, pixel_count
                )
            }
        }
    }
}

impl Error for FrameError {}

/// One complete displayed picture in the native RGB565 format.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    grid: GridSize,
    generation: u64,
    pixels: Vec<u16>,
}

impl DisplayFrame {
    #[must_use]
    pub fn new(grid: GridSize, generation: u64) -> Self {
        Self {
            grid,
            generation,
            pixels: vec![0; grid.len()],
        }
    }

    pub fn from_pixels(grid: GridSize, generation: u64, pixels: Vec<u16>) -> Result<Self, FrameError> {
        if pixels.len() != grid.len() {
            return Err(FrameError::SizeMismatch {
                grid_size: grid.len(),
                pixel_count: pixels.len(),
            });
        }

        Ok(Self {
            grid,
            generation,
            pixels,
        })
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Counts completed frames, starting at 1.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[u16] {
        let start = row * self.grid.cols;
        &self.pixels[start..start + self.grid.cols]
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Rgb565 {
        Rgb565(self.pixels[row * self.grid.cols + col])
    }
}

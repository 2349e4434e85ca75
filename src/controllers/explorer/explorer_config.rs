use crate::controllers::explorer::pipeline::ComputeMode;
use crate::core::actions::stream_frame::stream_frame::RenderColours;
use crate::core::fractals::mandelbrot::errors::MandelbrotError;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::core::util::pixel_to_complex_coords::GridSize;
use crate::core::zoom::limits::ZoomLimits;
use crate::core::zoom::target::TargetConfig;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const DEFAULT_DISPLAY_ROWS: usize = 240;
const DEFAULT_DISPLAY_COLS: usize = 240;
const DEFAULT_STEAL_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    pub rows: usize,
    pub cols: usize,
    pub colours: RenderColours,
    /// Buffer rows computed per idle-time steal in inline mode.
    pub steal_rows: usize,
}

impl DisplayConfig {
    #[must_use]
    pub fn grid(&self) -> GridSize {
        GridSize::new(self.rows, self.cols)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_DISPLAY_ROWS,
            cols: DEFAULT_DISPLAY_COLS,
            colours: RenderColours::default(),
            steal_rows: DEFAULT_STEAL_ROWS,
        }
    }
}

/// Everything a session needs. Validated once, before anything starts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ExplorerConfig {
    pub mandelbrot: MandelbrotConfig,
    pub zoom: ZoomLimits,
    pub target: TargetConfig,
    pub display: DisplayConfig,
    pub compute_mode: ComputeMode,
    /// Upper bound on waiting for a pass at a jump boundary; `None` waits
    /// indefinitely.
    pub swap_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Mandelbrot(MandelbrotError),
    DisplayTooSmall { rows: usize, cols: usize },
    ZeroStealRows,
    InvalidZoomStep { extent_ratio: f64, center_fraction: f64 },
    ZeroFramesPerJump,
    NonPositivePixelIncrement { increment: i32 },
    InvalidJoystickGain { gain: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mandelbrot(err) => write!(f, "{}", err),
            Self::DisplayTooSmall { rows, cols } => {
                write!(f, "display must be at least 2x2, got {}x{}", cols, rows)
            }
            Self::ZeroStealRows => write!(f, "steal rows must be greater than zero"),
            Self::InvalidZoomStep {
                extent_ratio,
                center_fraction,
            } => {
                write!(
                    f,
                    "zoom step needs extent ratio in (0, 1) and centre fraction in (0, 1], got {} and {}",
                    extent_ratio, center_fraction
                )
            }
            Self::ZeroFramesPerJump => write!(f, "frames per jump must be greater than zero"),
            Self::NonPositivePixelIncrement { increment } => {
                write!(f, "minimum pixel increment must be positive, got {}", increment)
            }
            Self::InvalidJoystickGain { gain } => {
                write!(f, "joystick gain must be finite and non-negative, got {}", gain)
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Mandelbrot(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MandelbrotError> for ConfigError {
    fn from(err: MandelbrotError) -> Self {
        Self::Mandelbrot(err)
    }
}

impl ExplorerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mandelbrot.validate()?;

        if self.display.rows < 2 || self.display.cols < 2 {
            return Err(ConfigError::DisplayTooSmall {
                rows: self.display.rows,
                cols: self.display.cols,
            });
        }

        if self.display.steal_rows == 0 {
            return Err(ConfigError::ZeroStealRows);
        }

        let step = self.zoom.coarse_step;
        let ratio_ok = step.extent_ratio > 0.0 && step.extent_ratio < 1.0;
        let fraction_ok = step.center_fraction > 0.0 && step.center_fraction <= 1.0;
        if !ratio_ok || !fraction_ok {
            return Err(ConfigError::InvalidZoomStep {
                extent_ratio: step.extent_ratio,
                center_fraction: step.center_fraction,
            });
        }

        if self.zoom.frames_per_jump == 0 {
            return Err(ConfigError::ZeroFramesPerJump);
        }

        if self.zoom.min_pixel_increment_raw <= 0 {
            return Err(ConfigError::NonPositivePixelIncrement {
                increment: self.zoom.min_pixel_increment_raw,
            });
        }

        let gain = self.target.joystick_gain;
        if !gain.is_finite() || gain < 0.0 {
            return Err(ConfigError::InvalidJoystickGain { gain });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::zoom::limits::ZoomStep;

    #[test]
    fn default_config_is_valid() {
        let config = ExplorerConfig::default();

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.display.grid(), GridSize::new(240, 240));
        assert_eq!(config.compute_mode, ComputeMode::Threaded);
    }

    #[test]
    fn mandelbrot_errors_are_wrapped() {
        let mut config = ExplorerConfig::default();
        config.mandelbrot.max_iterations = 0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::Mandelbrot(MandelbrotError::ZeroMaxIterationsError))
        );
    }

    #[test]
    fn rejects_degenerate_display() {
        let mut config = ExplorerConfig::default();
        config.display.cols = 0;

        assert_eq!(
            config.validate(),
            Err(ConfigError::DisplayTooSmall { rows: 240, cols: 0 })
        );
    }

    #[test]
    fn rejects_zoom_step_that_does_not_zoom_in() {
        let mut config = ExplorerConfig::default();
        config.zoom.coarse_step = ZoomStep {
            extent_ratio: 1.5,
            center_fraction: 0.5,
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidZoomStep { .. })
        ));
    }

    #[test]
    fn rejects_zero_counts() {
        let mut frames = ExplorerConfig::default();
        frames.zoom.frames_per_jump = 0;
        let mut steal = ExplorerConfig::default();
        steal.display.steal_rows = 0;
        let mut increment = ExplorerConfig::default();
        increment.zoom.min_pixel_increment_raw = 0;

        assert_eq!(frames.validate(), Err(ConfigError::ZeroFramesPerJump));
        assert_eq!(steal.validate(), Err(ConfigError::ZeroStealRows));
        assert_eq!(
            increment.validate(),
            Err(ConfigError::NonPositivePixelIncrement { increment: 0 })
        );
    }

    #[test]
    fn rejects_nan_joystick_gain() {
        let mut config = ExplorerConfig::default();
        config.target.joystick_gain = f64::NAN;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidJoystickGain { .. })
        ));
    }
}

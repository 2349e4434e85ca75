use crate::core::data::fixed::Fixed;
use std::error::Error;
use std::fmt;

const DEFAULT_START_ITERATION: u16 = 16;
const DEFAULT_CHECKPOINT_INTERVAL: u16 = 16;
const DEFAULT_TOLERANCE: f64 = 1.0 / (1u32 << 20) as f64;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CycleDetectionError {
    IntervalNotMultipleOfEight { interval: u16 },
    NegativeTolerance { tolerance: f64 },
}

impl fmt::Display for CycleDetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntervalNotMultipleOfEight { interval } => {
                write!(
                    f,
                    "cycle checkpoint interval must be a nonzero multiple of 8, got {}",
                    interval
                )
            }
            Self::NegativeTolerance { tolerance } => {
                write!(f, "cycle tolerance must be non-negative, got {}", tolerance)
            }
        }
    }
}

impl Error for CycleDetectionError {}

/// Tuning for periodic-orbit short-circuiting.
///
/// The orbit is snapshotted every `checkpoint_interval` iterations; from
/// `start_iteration` on, an orbit that comes back within `tolerance` of the
/// snapshot on both axes is treated as inside the set. These are empirical
/// values, not derived ones.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CycleDetection {
    pub start_iteration: u16,
    pub checkpoint_interval: u16,
    /// Per-axis tolerance in world units.
    pub tolerance: f64,
}

impl Default for CycleDetection {
    fn default() -> Self {
        Self {
            start_iteration: DEFAULT_START_ITERATION,
            checkpoint_interval: DEFAULT_CHECKPOINT_INTERVAL,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CycleDetection {
    pub fn validate(&self) -> Result<(), CycleDetectionError> {
        if self.checkpoint_interval == 0 || self.checkpoint_interval % 8 != 0 {
            return Err(CycleDetectionError::IntervalNotMultipleOfEight {
                interval: self.checkpoint_interval,
            });
        }

        if !(self.tolerance >= 0.0) {
            return Err(CycleDetectionError::NegativeTolerance {
                tolerance: self.tolerance,
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn tolerance_raw(&self) -> u32 {
        (self.tolerance / Fixed::ULP) as u32
    }
}

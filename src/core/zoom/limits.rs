use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;

/// One zoom step towards a target: half extents scale by `extent_ratio`
/// and the centre moves `center_fraction` of the way to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomStep {
    pub extent_ratio: f64,
    pub center_fraction: f64,
}

impl ZoomStep {
    /// Halves the extent and moves three quarters of the way to the target.
    pub const COARSE: Self = Self {
        extent_ratio: 0.5,
        center_fraction: 0.75,
    };

    /// The step that, repeated `frames` times, equals `self`.
    #[must_use]
    pub fn subdivide(&self, frames: u32) -> Self {
        let n = f64::from(frames.max(1));
        Self {
            extent_ratio: self.extent_ratio.powf(n.recip()),
            center_fraction: 1.0 - (1.0 - self.center_fraction).powf(n.recip()),
        }
    }

    /// `self` taken `times` times in a row towards a fixed target.
    #[must_use]
    pub fn repeated(&self, times: u32) -> Self {
        let n = i32::try_from(times).unwrap_or(i32::MAX);
        Self {
            extent_ratio: self.extent_ratio.powi(n),
            center_fraction: 1.0 - (1.0 - self.center_fraction).powi(n),
        }
    }

    /// The rect after one step towards `target`. A step that would collapse
    /// the rect leaves it unchanged.
    #[must_use]
    pub fn apply(&self, rect: &ComplexRect, target: Complex) -> ComplexRect {
        let center = rect.center().lerp(target, self.center_fraction);

        ComplexRect::from_center(
            center,
            rect.half_width() * self.extent_ratio,
            rect.half_height() * self.extent_ratio,
        )
        .unwrap_or(*rect)
    }

    /// Targets for which one step from `rect` stays inside `rect`.
    #[must_use]
    pub fn reachable(&self, rect: &ComplexRect) -> ComplexRect {
        let reach = (1.0 - self.extent_ratio) / self.center_fraction;

        ComplexRect::from_center(
            rect.center(),
            rect.half_width() * reach,
            rect.half_height() * reach,
        )
        .unwrap_or(*rect)
    }

    /// Moves `target` to the nearest point of [`Self::reachable`].
    #[must_use]
    pub fn clamp_target(&self, rect: &ComplexRect, target: Complex) -> Complex {
        let reachable = self.reachable(rect);

        Complex {
            real: target.real.clamp(reachable.min_x(), reachable.max_x()),
            imag: target.imag.clamp(reachable.min_y(), reachable.max_y()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    /// Step between consecutive computed buffers.
    pub coarse_step: ZoomStep,
    /// Displayed frames per coarse step.
    pub frames_per_jump: u32,
    /// Smallest per-pixel increment, in fixed-point units, worth computing.
    pub min_pixel_increment_raw: i32,
    /// Frames to hold the final view before restarting from the initial bounds.
    pub hold_frames: u32,
    /// Coarse steps before the zoom restarts; `None` zooms until the precision floor.
    pub max_jumps: Option<u32>,
}

impl ZoomLimits {
    #[must_use]
    pub fn fine_step(&self) -> ZoomStep {
        self.coarse_step.subdivide(self.frames_per_jump)
    }

    /// Moves `target` so that every displayed frame of a jump from `rect`
    /// stays inside `rect`, not only the frame the jump lands on.
    #[must_use]
    pub fn clamp_to_jump(&self, rect: &ComplexRect, target: Complex) -> Complex {
        let fine = self.fine_step();

        (1..=self.frames_per_jump).fold(target, |target, frames| {
            fine.repeated(frames).clamp_target(rect, target)
        })
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            coarse_step: ZoomStep::COARSE,
            frames_per_jump: 6,
            min_pixel_increment_raw: 4,
            hold_frames: 60,
            max_jumps: None,
        }
    }
}

use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::zoom::limits::ZoomStep;

/// The displayed view and its progress through the current coarse step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub display_bounds: ComplexRect,
    pub focus: Complex,
    pub fine_step: ZoomStep,
    pub frames_per_jump: u32,
    pub frame_in_jump: u32,
}

impl ViewportState {
    #[must_use]
    pub fn new(bounds: ComplexRect, fine_step: ZoomStep, frames_per_jump: u32) -> Self {
        Self {
            display_bounds: bounds,
            focus: bounds.center(),
            fine_step,
            frames_per_jump,
            frame_in_jump: 0,
        }
    }

    /// Starts a coarse step from `bounds` towards `focus`.
    pub fn start_jump(&mut self, bounds: ComplexRect, focus: Complex) {
        self.display_bounds = bounds;
        self.focus = focus;
        self.frame_in_jump = 0;
    }

    /// Stops on `bounds` with no further steps pending.
    pub fn hold_at(&mut self, bounds: ComplexRect) {
        self.display_bounds = bounds;
        self.focus = bounds.center();
        self.frame_in_jump = self.frames_per_jump;
    }

    #[must_use]
    pub fn jump_finished(&self) -> bool {
        self.frame_in_jump >= self.frames_per_jump
    }

    /// Returns the bounds to show this frame and moves one fine step on.
    /// Once the jump is finished the view stays put.
    pub fn advance(&mut self) -> ComplexRect {
        let shown = self.display_bounds;

        if !self.jump_finished() {
            self.frame_in_jump += 1;
            if !self.jump_finished() {
                self.display_bounds = self.fine_step.apply(&self.display_bounds, self.focus);
            }
        }

        shown
    }
}

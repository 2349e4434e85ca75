use crate::controllers::explorer::explorer_config::ExplorerConfig;
use crate::core::data::complex::Complex;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fractal_buffer::{FractalBuffer, PassParams};
use crate::core::fractals::mandelbrot::escape::pixel_increments;
use crate::core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
use crate::core::input::snapshot::InputSnapshot;
use crate::core::zoom::limits::ZoomLimits;
use crate::core::zoom::target::TargetSelector;
use crate::core::zoom::viewport::ViewportState;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    ExitRequested,
    PrecisionFloor,
    JumpLimit,
}

impl fmt::Display for HoldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExitRequested => write!(f, "exit requested"),
            Self::PrecisionFloor => write!(f, "precision floor reached"),
            Self::JumpLimit => write!(f, "jump limit reached"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomPhase {
    Zooming,
    Holding { reason: HoldReason, frames_left: u32 },
}

/// Decides what is shown each frame and what the next compute pass is.
///
/// The display walks from one buffer's bounds towards the target in
/// `frames_per_jump` fine steps. At the end of a jump the caller swaps in
/// the next buffer and asks [`Self::begin_jump`] for the pass after it. When
/// zooming can go no further the view holds, and after `hold_frames` frames
/// [`Self::reset_due`] asks for a restart from the initial bounds.
pub struct ViewportController {
    mandelbrot: MandelbrotConfig,
    limits: ZoomLimits,
    selector: TargetSelector,
    viewport: ViewportState,
    phase: ZoomPhase,
    paused: bool,
    exit_requested: bool,
    previous_input: InputSnapshot,
    iteration_offset: u16,
    use_cycle_detection: bool,
    jumps: u32,
}

impl ViewportController {
    #[must_use]
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            mandelbrot: config.mandelbrot,
            limits: config.zoom,
            selector: TargetSelector::new(config.target),
            viewport: ViewportState::new(
                config.mandelbrot.initial_bounds,
                config.zoom.fine_step(),
                config.zoom.frames_per_jump,
            ),
            phase: ZoomPhase::Zooming,
            paused: false,
            exit_requested: false,
            previous_input: InputSnapshot::default(),
            iteration_offset: 0,
            use_cycle_detection: false,
            jumps: 0,
        }
    }

    #[must_use]
    pub fn initial_pass(&self) -> PassParams {
        self.mandelbrot.initial_pass()
    }

    /// Applies this frame's input and returns the bounds to display.
    pub fn frame(&mut self, input: InputSnapshot) -> ComplexRect {
        if input.z && !self.previous_input.z && !self.exit_requested {
            log::info!("exit zoom requested");
            self.exit_requested = true;
        }

        if input.c && !self.previous_input.c {
            self.paused = !self.paused;
            log::info!("zoom {}", if self.paused { "paused" } else { "resumed" });
        }

        self.previous_input = input;

        if self.paused {
            return self.viewport.display_bounds;
        }

        if let ZoomPhase::Holding { frames_left, .. } = &mut self.phase {
            *frames_left = frames_left.saturating_sub(1);
        }

        self.viewport.advance()
    }

    /// Whether the current jump has shown all its frames and the next
    /// buffer is needed.
    #[must_use]
    pub fn jump_finished(&self) -> bool {
        !self.paused && self.phase == ZoomPhase::Zooming && self.viewport.jump_finished()
    }

    /// Starts a jump across `buffer`, the newly swapped-in read buffer, and
    /// returns the pass that computes the buffer the jump lands on. Returns
    /// `None` when the zoom stops here and the view starts holding.
    pub fn begin_jump(&mut self, buffer: &FractalBuffer, input: InputSnapshot) -> Option<PassParams> {
        self.update_iteration_budget(buffer);

        if self.exit_requested {
            self.hold(buffer, HoldReason::ExitRequested);
            return None;
        }

        if self.limits.max_jumps.is_some_and(|max| self.jumps >= max) {
            self.hold(buffer, HoldReason::JumpLimit);
            return None;
        }

        let bounds = buffer.world_bounds();
        let chosen = self
            .selector
            .choose(buffer, input, &self.limits.coarse_step);
        let target = self.limits.clamp_to_jump(&bounds, chosen);
        let next_bounds = self.limits.coarse_step.apply(&bounds, target);

        let (inc_x, inc_y) = pixel_increments(&next_bounds, buffer.grid());
        if inc_x.raw().min(inc_y.raw()) < self.limits.min_pixel_increment_raw {
            self.hold(buffer, HoldReason::PrecisionFloor);
            return None;
        }

        self.viewport.start_jump(bounds, target);
        self.jumps += 1;

        log::debug!(
            "jump {} towards ({}, {})",
            self.jumps,
            target.real,
            target.imag
        );

        Some(PassParams {
            world_bounds: next_bounds,
            max_iterations: self.mandelbrot.max_iterations + self.iteration_offset,
            iteration_offset: self.iteration_offset,
            use_cycle_detection: self.use_cycle_detection,
        })
    }

    fn update_iteration_budget(&mut self, buffer: &FractalBuffer) {
        let pixels = buffer.grid().len();
        let inside = buffer.count_inside() as usize;

        if self.mandelbrot.track_iteration_offset && inside < pixels {
            let headroom = u16::MAX - self.mandelbrot.max_iterations;
            let shift = u16::from(buffer.min_iteration_seen()).saturating_sub(1);
            self.iteration_offset = buffer
                .params()
                .iteration_offset
                .saturating_add(shift)
                .min(headroom);
        }

        self.use_cycle_detection =
            inside > pixels / self.mandelbrot.cycle_enable_divisor.max(1) as usize;
    }

    fn hold(&mut self, buffer: &FractalBuffer, reason: HoldReason) {
        log::info!("holding after {} jumps: {}", self.jumps, reason);

        self.viewport.hold_at(buffer.world_bounds());
        self.phase = ZoomPhase::Holding {
            reason,
            frames_left: self.limits.hold_frames,
        };
    }

    /// Whether the hold has lasted long enough to restart.
    #[must_use]
    pub fn reset_due(&self) -> bool {
        matches!(self.phase, ZoomPhase::Holding { frames_left: 0, .. })
    }

    /// Returns to the initial bounds and forgets all zoom state. Gives the
    /// pass to compute first.
    pub fn reset(&mut self) -> PassParams {
        log::info!("restarting from the initial bounds");

        self.phase = ZoomPhase::Zooming;
        self.exit_requested = false;
        self.iteration_offset = 0;
        self.use_cycle_detection = false;
        self.jumps = 0;
        self.selector.reset();
        self.viewport = ViewportState::new(
            self.mandelbrot.initial_bounds,
            self.limits.fine_step(),
            self.limits.frames_per_jump,
        );

        self.initial_pass()
    }

    #[must_use]
    pub fn phase(&self) -> ZoomPhase {
        self.phase
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn display_bounds(&self) -> ComplexRect {
        self.viewport.display_bounds
    }

    #[must_use]
    pub fn focus(&self) -> Complex {
        self.viewport.focus
    }

    #[must_use]
    pub fn iteration_offset(&self) -> u16 {
        self.iteration_offset
    }

    #[must_use]
    pub fn jumps(&self) -> u32 {
        self.jumps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fractals::mandelbrot::escape::EscapeEngine;
    use crate::core::zoom::target::TargetPolicy;

    fn config() -> ExplorerConfig {
        let mut config = ExplorerConfig::default();
        config.mandelbrot.buffer_rows = 48;
        config.mandelbrot.buffer_cols = 48;
        config.zoom.hold_frames = 3;
        config
    }

    fn computed(params: PassParams) -> FractalBuffer {
        let mut buffer = FractalBuffer::new(48, 48, params).unwrap();
        buffer.begin_pass(params, 1).unwrap();
        EscapeEngine::default().generate(&mut buffer);
        buffer
    }

    /// 4x4 buffer whose rows hold the given values, with matching statistics.
    fn buffer_with(values: [[u8; 4]; 4], params: PassParams) -> FractalBuffer {
        let mut buffer = FractalBuffer::new(4, 4, params).unwrap();
        buffer.begin_pass(params, 1).unwrap();

        for row in values {
            let (_, slice) = buffer.next_row_mut().unwrap();
            slice.copy_from_slice(&row);
            let inside = row.iter().filter(|v| **v == 0).count() as u32;
            let min = row.iter().copied().filter(|v| *v > 0).min().unwrap_or(u8::MAX);
            buffer.finish_row(inside, min);
        }

        buffer
    }

    fn press_z() -> InputSnapshot {
        InputSnapshot {
            z: true,
            ..InputSnapshot::default()
        }
    }

    fn press_c() -> InputSnapshot {
        InputSnapshot {
            c: true,
            ..InputSnapshot::default()
        }
    }

    #[test]
    fn jump_shows_each_fine_step_then_finishes() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());

        let next = controller.begin_jump(&first, InputSnapshot::default()).unwrap();

        let mut shown = Vec::new();
        while !controller.jump_finished() {
            shown.push(controller.frame(InputSnapshot::default()));
        }

        assert_eq!(shown.len(), 6);
        assert_eq!(shown[0], first.world_bounds());
        assert!(shown[5].width() > next.world_bounds.width());
        assert_eq!(controller.jumps(), 1);
    }

    #[test]
    fn next_pass_is_the_coarse_step_towards_the_focus() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());

        let next = controller.begin_jump(&first, InputSnapshot::default()).unwrap();
        let expected = config
            .zoom
            .coarse_step
            .apply(&first.world_bounds(), controller.focus());

        assert_eq!(next.world_bounds, expected);
        assert!((next.world_bounds.width() - first.world_bounds().width() * 0.5).abs() < 1e-12);
    }

    #[test]
    fn iteration_offset_follows_smallest_escape() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let buffer = buffer_with(
            [[5, 6, 7, 8], [9, 0, 0, 6], [7, 0, 0, 9], [8, 7, 6, 5]],
            controller.initial_pass(),
        );

        let next = controller.begin_jump(&buffer, InputSnapshot::default()).unwrap();

        assert_eq!(next.iteration_offset, 4);
        assert_eq!(next.max_iterations, 224 + 4);
        assert_eq!(controller.iteration_offset(), 4);
    }

    #[test]
    fn all_inside_buffer_keeps_offset_and_enables_cycle_detection() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let params = PassParams {
            iteration_offset: 10,
            max_iterations: 234,
            ..controller.initial_pass()
        };
        let buffer = buffer_with([[0; 4]; 4], params);

        let next = controller.begin_jump(&buffer, InputSnapshot::default()).unwrap();

        assert_eq!(next.iteration_offset, 0);
        assert!(next.use_cycle_detection);
    }

    #[test]
    fn offset_tracking_can_be_switched_off() {
        let mut config = config();
        config.mandelbrot.track_iteration_offset = false;
        let mut controller = ViewportController::new(&config);
        let buffer = buffer_with([[9; 4]; 4], controller.initial_pass());

        let next = controller.begin_jump(&buffer, InputSnapshot::default()).unwrap();

        assert_eq!(next.iteration_offset, 0);
        assert_eq!(next.max_iterations, 224);
        assert!(!next.use_cycle_detection);
    }

    #[test]
    fn precision_floor_stops_the_zoom() {
        let mut config = config();
        config.zoom.min_pixel_increment_raw = i32::MAX;
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());

        assert_eq!(controller.begin_jump(&first, InputSnapshot::default()), None);
        assert_eq!(
            controller.phase(),
            ZoomPhase::Holding {
                reason: HoldReason::PrecisionFloor,
                frames_left: 3
            }
        );
        assert_eq!(controller.frame(InputSnapshot::default()), first.world_bounds());
        assert!(!controller.jump_finished());
    }

    #[test]
    fn jump_limit_stops_the_zoom() {
        let mut config = config();
        config.zoom.max_jumps = Some(1);
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());

        let next = controller.begin_jump(&first, InputSnapshot::default()).unwrap();
        let second = computed(next);

        assert_eq!(controller.begin_jump(&second, InputSnapshot::default()), None);
        assert!(matches!(
            controller.phase(),
            ZoomPhase::Holding {
                reason: HoldReason::JumpLimit,
                ..
            }
        ));
    }

    #[test]
    fn exit_zoom_holds_then_resets_to_initial_bounds() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());
        controller.begin_jump(&first, InputSnapshot::default()).unwrap();

        controller.frame(press_z());
        while !controller.jump_finished() {
            controller.frame(InputSnapshot::default());
        }
        let second = computed(PassParams {
            world_bounds: config
                .zoom
                .coarse_step
                .apply(&first.world_bounds(), controller.focus()),
            ..controller.initial_pass()
        });

        assert_eq!(controller.begin_jump(&second, InputSnapshot::default()), None);
        assert!(!controller.reset_due());

        for _ in 0..3 {
            assert_eq!(controller.frame(InputSnapshot::default()), second.world_bounds());
        }
        assert!(controller.reset_due());

        let restart = controller.reset();
        assert_eq!(restart.world_bounds, config.mandelbrot.initial_bounds);
        assert_eq!(restart.iteration_offset, 0);
        assert_eq!(controller.display_bounds(), config.mandelbrot.initial_bounds);
        assert_eq!(controller.phase(), ZoomPhase::Zooming);
        assert_eq!(controller.jumps(), 0);
    }

    #[test]
    fn holding_z_down_is_a_single_request() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());
        controller.begin_jump(&first, InputSnapshot::default()).unwrap();

        controller.frame(press_z());
        controller.frame(press_z());
        controller.frame(InputSnapshot::default());

        assert!(controller.exit_requested);
    }

    #[test]
    fn c_toggles_pause_and_freezes_the_view() {
        let config = config();
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());
        controller.begin_jump(&first, InputSnapshot::default()).unwrap();
        controller.frame(InputSnapshot::default());

        let frozen = controller.frame(press_c());
        assert!(controller.is_paused());
        assert_eq!(controller.frame(press_c()), frozen);
        assert_eq!(controller.frame(InputSnapshot::default()), frozen);
        assert!(!controller.jump_finished());

        controller.frame(press_c());
        assert!(!controller.is_paused());
    }

    #[test]
    fn interactive_policy_follows_the_joystick() {
        let mut config = config();
        config.target.policy = TargetPolicy::Interactive;
        let mut controller = ViewportController::new(&config);
        let first = computed(controller.initial_pass());
        let input = InputSnapshot {
            joystick_x: 64,
            ..InputSnapshot::default()
        };

        controller.begin_jump(&first, input).unwrap();

        let bounds = first.world_bounds();
        assert!(controller.focus().real > bounds.center().real);
        assert_eq!(controller.focus().imag, bounds.center().imag);
    }
}

use crate::controllers::explorer::explorer_config::{ConfigError, ExplorerConfig};
use crate::controllers::explorer::pipeline::{DualCorePipeline, PipelineError};
use crate::controllers::explorer::ports::compute_context::ComputeContext;
use crate::controllers::explorer::viewport_controller::{ViewportController, ZoomPhase};
use crate::core::actions::stream_frame::ports::display_sink::DisplaySink;
use crate::core::actions::stream_frame::stream_frame::{FrameStats, StreamingRenderer};
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fractal_buffer::{FractalBufferError, PassParams};
use crate::core::fractals::mandelbrot::escape::EscapeEngine;
use crate::core::fractals::mandelbrot::palette::BandedPalette;
use crate::core::input::snapshot::{InputSnapshot, InputSource};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ExplorerError {
    Config(ConfigError),
    Pipeline(PipelineError),
    Buffer(FractalBufferError),
}

impl fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {}", err),
            Self::Pipeline(err) => write!(f, "pipeline failure: {}", err),
            Self::Buffer(err) => write!(f, "buffer allocation failed: {}", err),
        }
    }
}

impl Error for ExplorerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Pipeline(err) => Some(err),
            Self::Buffer(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ExplorerError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<PipelineError> for ExplorerError {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

impl From<FractalBufferError> for ExplorerError {
    fn from(err: FractalBufferError) -> Self {
        Self::Buffer(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub display_bounds: ComplexRect,
    pub phase: ZoomPhase,
    /// Pass id of the buffer the frame was sampled from.
    pub read_pass: u64,
    /// Whether a new buffer was swapped in after this frame.
    pub swapped: bool,
    /// Whether the render side had to block for that buffer.
    pub waited: bool,
    pub stats: FrameStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub frames: u64,
    pub swaps: u64,
    /// Swaps where the next buffer was not ready when the jump ended.
    pub late_swaps: u64,
    pub resets: u64,
    pub stolen_rows: usize,
    pub slot_waits: usize,
}

/// The render and control loop.
///
/// Each frame reads the input, streams the current view of the read buffer
/// to the display and, at the end of a jump, swaps in the next buffer and
/// starts computing the one after it.
pub struct Explorer<S: DisplaySink, I: InputSource> {
    config: ExplorerConfig,
    controller: ViewportController,
    pipeline: DualCorePipeline<Box<dyn ComputeContext + Send>>,
    renderer: StreamingRenderer,
    palette: BandedPalette,
    sink: S,
    input: I,
    frames: u64,
    resets: u64,
}

impl<S: DisplaySink, I: InputSource> Explorer<S, I> {
    /// Validates `config`, starts the compute context and computes the
    /// first buffer, so the first frame has something to show.
    pub fn new(config: ExplorerConfig, sink: S, input: I) -> Result<Self, ExplorerError> {
        config.validate()?;

        let controller = ViewportController::new(&config);
        let engine = EscapeEngine::new(config.mandelbrot.cycle_detection);
        let pipeline = DualCorePipeline::new(
            config.compute_mode.build(engine),
            config.mandelbrot.buffer_rows,
            config.mandelbrot.buffer_cols,
            controller.initial_pass(),
        )?;

        log::info!(
            "exploring with a {}x{} buffer on a {}x{} display ({:?} compute, {:?} targets)",
            config.mandelbrot.buffer_cols,
            config.mandelbrot.buffer_rows,
            config.display.cols,
            config.display.rows,
            config.compute_mode,
            config.target.policy
        );

        let mut explorer = Self {
            renderer: StreamingRenderer::new(config.display.grid(), config.display.colours),
            palette: BandedPalette::new(),
            config,
            controller,
            pipeline,
            sink,
            input,
            frames: 0,
            resets: 0,
        };

        let input = explorer.input.snapshot();
        let initial = explorer.controller.initial_pass();
        explorer.start_sequence(initial, input)?;

        Ok(explorer)
    }

    /// Computes `params` synchronously and starts the first jump from it.
    fn start_sequence(&mut self, params: PassParams, input: InputSnapshot) -> Result<(), ExplorerError> {
        if self.pipeline.in_flight().is_some() {
            self.pipeline.wait_swap()?;
        }

        self.pipeline.submit(params)?;
        self.pipeline.wait_swap()?;
        self.begin_next_jump(input)
    }

    fn begin_next_jump(&mut self, input: InputSnapshot) -> Result<(), ExplorerError> {
        if let Some(next) = self.controller.begin_jump(self.pipeline.read(), input) {
            self.pipeline.submit(next)?;
        }

        Ok(())
    }

    /// Waits for the in-flight pass. A timeout is not fatal: the current
    /// view stays up and the wait is retried next frame.
    fn wait_for_pass(&mut self) -> Result<bool, ExplorerError> {
        let result = match self.config.swap_timeout {
            Some(timeout) => self.pipeline.wait_swap_timeout(timeout),
            None => self.pipeline.wait_swap(),
        };

        match result {
            Ok(()) => Ok(true),
            Err(PipelineError::Timeout { slot }) => {
                log::warn!("pass into buffer {} is late, holding the view", slot);
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Renders one frame and advances the zoom.
    pub fn step_frame(&mut self) -> Result<FrameReport, ExplorerError> {
        let input = self.input.snapshot();

        if self.controller.reset_due() {
            let params = self.controller.reset();
            self.start_sequence(params, input)?;
            self.resets += 1;
        }

        debug_assert!(self.pipeline.has_valid_read());

        let display_bounds = self.controller.frame(input);
        let read_pass = self.pipeline.read().pass_id();
        let read_slot = self.pipeline.read_slot();

        let (buffer, mut steal) = self.pipeline.frame_parts(self.config.display.steal_rows);
        let stats = self.renderer.stream_frame(
            &mut self.sink,
            buffer,
            &display_bounds,
            &self.palette,
            &mut steal,
        );

        let mut swapped = false;
        let mut waited = false;
        if self.controller.jump_finished() && self.pipeline.in_flight().is_some() {
            swapped = self.pipeline.poll_swap();
            if !swapped {
                waited = true;
                swapped = self.wait_for_pass()?;
            }

            if swapped {
                self.begin_next_jump(input)?;
            }
        }

        self.frames += 1;

        log::trace!(
            "frame {}: pass {} in buffer {}, {} rows sampled, {} blanked, {} stolen",
            self.frames,
            read_pass,
            read_slot,
            stats.rows_sampled,
            stats.rows_blanked,
            stats.stolen_rows
        );

        Ok(FrameReport {
            frame: self.frames,
            display_bounds,
            phase: self.controller.phase(),
            read_pass,
            swapped,
            waited,
            stats,
        })
    }

    /// Runs `frames` frames and sums up what happened.
    pub fn run(&mut self, frames: u64) -> Result<RunSummary, ExplorerError> {
        let swaps_before = self.pipeline.swaps();
        let resets_before = self.resets;
        let mut summary = RunSummary::default();

        for _ in 0..frames {
            let report = self.step_frame()?;
            summary.frames += 1;
            if report.swapped && report.waited {
                summary.late_swaps += 1;
            }
            summary.stolen_rows += report.stats.stolen_rows;
            summary.slot_waits += report.stats.slot_waits;
        }

        summary.swaps = self.pipeline.swaps() - swaps_before;
        summary.resets = self.resets - resets_before;

        log::info!(
            "ran {} frames: {} swaps ({} late), {} resets, {} stolen rows, {} slot waits",
            summary.frames,
            summary.swaps,
            summary.late_swaps,
            summary.resets,
            summary.stolen_rows,
            summary.slot_waits
        );

        Ok(summary)
    }

    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    #[must_use]
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

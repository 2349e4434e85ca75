mod adapters;
mod controllers;
mod core;
#[cfg(feature = "gui")]
mod input;
mod presenters;
mod storage;

pub use controllers::explorer::pipeline::ComputeMode;
pub use controllers::explorer::ports::frame_publisher::FramePublisher;
pub use controllers::explorer::{
    ConfigError, DisplayConfig, Explorer, ExplorerConfig, ExplorerError, FrameReport, HoldReason,
    RunSummary, ZoomPhase,
};
pub use controllers::verify::{VerifyReport, verify_controller};
pub use core::actions::stream_frame::ports::display_sink::{DisplaySink, OutputSlot};
pub use core::actions::stream_frame::ports::idle_work::{IdleWork, NoIdleWork};
pub use core::actions::stream_frame::stream_frame::{FrameStats, RenderColours, StreamingRenderer};
pub use core::data::complex::Complex;
pub use core::data::complex_rect::ComplexRect;
pub use core::data::fractal_buffer::{FractalBuffer, PassParams};
pub use core::data::frame::DisplayFrame;
pub use core::fractals::mandelbrot::cycle::CycleDetection;
pub use core::fractals::mandelbrot::escape::EscapeEngine;
pub use core::fractals::mandelbrot::mandelbrot_config::MandelbrotConfig;
pub use core::fractals::mandelbrot::palette::BandedPalette;
pub use core::input::{InputDevice, InputSampler, InputSnapshot, InputSource, NoInput, SharedInput};
pub use core::util::pixel_to_complex_coords::GridSize;
pub use core::zoom::{TargetConfig, TargetPolicy, ZoomLimits};
pub use presenters::memory::display::MemoryDisplay;
pub use storage::write_ppm::write_ppm;

#[cfg(feature = "gui")]
pub use input::gui::commands::run_gui::RunGuiCommand;
#[cfg(feature = "gui")]
pub use presenters::pixels::factory::PixelsPresenterFactory;

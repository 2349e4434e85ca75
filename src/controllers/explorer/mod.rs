#[allow(clippy::module_inception)]
pub mod explorer;
pub mod explorer_config;
pub mod pipeline;
pub mod ports;
pub mod viewport_controller;

pub use explorer::{Explorer, ExplorerError, FrameReport, RunSummary};
pub use explorer_config::{ConfigError, DisplayConfig, ExplorerConfig};
pub use viewport_controller::{HoldReason, ZoomPhase};

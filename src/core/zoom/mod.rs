pub mod coverage;
pub mod limits;
pub mod target;
pub mod viewport;

pub use limits::ZoomLimits;
pub use target::{TargetConfig, TargetPolicy};

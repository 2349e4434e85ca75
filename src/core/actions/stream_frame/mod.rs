pub mod ports;
pub mod resample;
#[allow(clippy::module_inception)]
pub mod stream_frame;

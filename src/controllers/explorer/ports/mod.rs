pub mod compute_context;
pub mod frame_publisher;

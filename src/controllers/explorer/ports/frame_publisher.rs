use crate::core::data::frame::DisplayFrame;

/// Receives every frame a display completes.
pub trait FramePublisher: Send + Sync {
    fn publish(&self, frame: &DisplayFrame);
}

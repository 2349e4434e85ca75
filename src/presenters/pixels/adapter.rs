use crate::controllers::explorer::ports::frame_publisher::FramePublisher;
use crate::core::data::frame::DisplayFrame;
use crate::input::gui::events::GuiEvent;
use std::sync::{Mutex, PoisonError};
use winit::event_loop::EventLoopProxy;

/// Hands the latest published frame to the window thread. Frames published
/// faster than the window draws them replace each other.
pub struct PixelsAdapter {
    latest: Mutex<Option<DisplayFrame>>,
    event_loop_proxy: Mutex<EventLoopProxy<GuiEvent>>,
}

impl FramePublisher for PixelsAdapter {
    fn publish(&self, frame: &DisplayFrame) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(frame.clone());

        let proxy = self
            .event_loop_proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let _ = proxy.send_event(GuiEvent::Wake);
    }
}

impl PixelsAdapter {
    pub fn new(event_loop_proxy: EventLoopProxy<GuiEvent>) -> Self {
        Self {
            latest: Mutex::new(None),
            event_loop_proxy: Mutex::new(event_loop_proxy),
        }
    }

    pub fn take_frame(&self) -> Option<DisplayFrame> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

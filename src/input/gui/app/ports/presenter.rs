use crate::controllers::explorer::ports::frame_publisher::FramePublisher;
use crate::core::util::pixel_to_complex_coords::GridSize;
use crate::input::gui::events::GuiEvent;
use std::sync::Arc;
use winit::{event_loop::EventLoopProxy, window::Window};

pub trait GuiPresenterPort {
    fn new(window: &'static Window, display: GridSize, event_loop_proxy: EventLoopProxy<GuiEvent>) -> Self;
    fn render(&mut self) -> Result<(), pixels::Error>;
    fn share_publisher(&self) -> Arc<dyn FramePublisher>;
    fn resize(&mut self, width: u32, height: u32);
}

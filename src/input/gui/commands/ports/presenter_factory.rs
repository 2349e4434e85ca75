use crate::core::util::pixel_to_complex_coords::GridSize;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::input::gui::events::GuiEvent;
use winit::{event_loop::EventLoopProxy, window::Window};

pub trait GuiPresenterFactoryPort<T: GuiPresenterPort> {
    fn build(&self, window: &'static Window, display: GridSize, event_loop_proxy: EventLoopProxy<GuiEvent>) -> T;
}

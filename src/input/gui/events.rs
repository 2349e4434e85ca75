/// Custom user events for the GUI event loop.
#[derive(Debug, Clone)]
pub enum GuiEvent {
    /// A new frame has been published by the render thread.
    Wake,
}

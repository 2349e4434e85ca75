use crate::adapters::pixel_format::copy_rgb565_to_rgba;
use crate::controllers::explorer::ports::frame_publisher::FramePublisher;
use crate::core::data::frame::DisplayFrame;
use crate::core::util::pixel_to_complex_coords::GridSize;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::input::gui::events::GuiEvent;
use crate::presenters::pixels::adapter::PixelsAdapter;
use pixels::Pixels;
use pixels::SurfaceTexture;
use std::sync::Arc;
use winit::event_loop::EventLoopProxy;
use winit::window::Window;

/// Shows published frames in the window. The framebuffer has the display's
/// resolution and pixels scales it to the window.
pub struct PixelsPresenter {
    pixels: Pixels<'static>,
    adapter: Arc<PixelsAdapter>,
    display: GridSize,
    width: u32,
    height: u32,
    has_frame: bool,
    last_presented_generation: u64,
}

impl GuiPresenterPort for PixelsPresenter {
    fn new(
        window: &'static Window,
        display: GridSize,
        event_loop_proxy: EventLoopProxy<GuiEvent>,
    ) -> Self {
        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window);

        let pixels = Pixels::new(display.cols as u32, display.rows as u32, surface_texture)
            .expect("Failed to create pixels surface");

        Self {
            pixels,
            adapter: Arc::new(PixelsAdapter::new(event_loop_proxy)),
            display,
            width: size.width,
            height: size.height,
            has_frame: false,
            last_presented_generation: 0,
        }
    }

    fn share_publisher(&self) -> Arc<dyn FramePublisher> {
        Arc::clone(&self.adapter) as Arc<dyn FramePublisher>
    }

    fn render(&mut self) -> Result<(), pixels::Error> {
        if self.width == 0 || self.height == 0 {
            return Ok(());
        }

        self.maybe_draw_frame();

        if !self.has_frame {
            self.draw_placeholder();
        }

        self.pixels.render()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;

        if let Err(err) = self.pixels.resize_surface(width, height) {
            log::warn!("cannot resize surface to {}x{}: {}", width, height, err);
        }
    }
}

impl PixelsPresenter {
    fn draw_placeholder(&mut self) {
        for pixel in self.pixels.frame_mut().chunks_exact_mut(4) {
            pixel.copy_from_slice(&[0, 0, 0, 255]);
        }
    }

    fn maybe_draw_frame(&mut self) {
        let Some(frame) = self.adapter.take_frame() else {
            return;
        };

        if frame.generation() > self.last_presented_generation && frame.grid() == self.display {
            self.copy_frame_into_pixels(&frame);
            self.has_frame = true;
            self.last_presented_generation = frame.generation();
        }
    }

    fn copy_frame_into_pixels(&mut self, frame: &DisplayFrame) {
        copy_rgb565_to_rgba(frame.pixels(), self.pixels.frame_mut());
    }
}

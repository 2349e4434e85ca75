use crate::controllers::explorer::explorer_config::ExplorerConfig;
use crate::input::gui::app::gui_app::GuiApp;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::input::gui::commands::ports::presenter_factory::GuiPresenterFactoryPort;
use crate::input::gui::events::GuiEvent;
use std::marker::PhantomData;
use std::time::Duration;
use winit::dpi::LogicalSize;
use winit::event::{Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoopBuilder;
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowBuilder};

/// Window pixels per display pixel at start-up.
const WINDOW_SCALE: f64 = 3.0;

pub struct RunGuiCommand<F, P>
where
    P: GuiPresenterPort,
    F: GuiPresenterFactoryPort<P>,
{
    presenter_factory: F,
    config: ExplorerConfig,
    pixel_time: Duration,
    _phantom: PhantomData<fn() -> P>,
}

impl<F, P> RunGuiCommand<F, P>
where
    P: GuiPresenterPort,
    F: GuiPresenterFactoryPort<P>,
{
    pub fn new(presenter_factory: F, config: ExplorerConfig, pixel_time: Duration) -> Self {
        Self {
            presenter_factory,
            config,
            pixel_time,
            _phantom: PhantomData,
        }
    }

    pub fn execute(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.config.validate()?;

        let event_loop = EventLoopBuilder::<GuiEvent>::with_user_event().build()?;
        let event_loop_proxy = event_loop.create_proxy();
        let display = self.config.display.grid();

        let window: &'static Window = Box::leak(Box::new(
            WindowBuilder::new()
                .with_title("Fractal Zoomer")
                .with_inner_size(LogicalSize::new(
                    display.cols as f64 * WINDOW_SCALE,
                    display.rows as f64 * WINDOW_SCALE,
                ))
                .with_min_inner_size(LogicalSize::new(display.cols as f64, display.rows as f64))
                .build(&event_loop)?,
        ));

        let presenter: P = self.presenter_factory.build(window, display, event_loop_proxy);
        let mut app = GuiApp::new(presenter, self.config, self.pixel_time);

        event_loop.run(move |event, elwt| match event {
            Event::UserEvent(GuiEvent::Wake) => window.request_redraw(),
            Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    app.shutdown();
                    elwt.exit();
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(key_code),
                            state,
                            ..
                        },
                    ..
                } => app.handle_key(key_code, state),
                WindowEvent::Focused(false) => app.release_keys(),
                WindowEvent::RedrawRequested => {
                    if let Err(err) = app.render() {
                        log::error!("render error: {}", err);
                        app.shutdown();
                        elwt.exit();
                    }
                }
                WindowEvent::Resized(size) => {
                    app.resize(size.width, size.height);
                    window.request_redraw();
                }
                _ => {}
            },
            _ => {}
        })?;

        Ok(())
    }
}

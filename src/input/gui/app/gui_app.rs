use crate::controllers::explorer::explorer::Explorer;
use crate::controllers::explorer::explorer_config::ExplorerConfig;
use crate::core::input::shared::SharedInput;
use crate::input::gui::app::joystick_input::JoystickInputState;
use crate::input::gui::app::ports::presenter::GuiPresenterPort;
use crate::presenters::memory::display::MemoryDisplay;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Window-side state. The explorer itself runs on its own thread, draws
/// into a simulated display and publishes finished frames to the presenter.
pub struct GuiApp<T: GuiPresenterPort> {
    presenter: T,
    input: Arc<SharedInput>,
    keyboard: JoystickInputState,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<T: GuiPresenterPort> GuiApp<T> {
    pub fn new(presenter: T, config: ExplorerConfig, pixel_time: Duration) -> Self {
        let input = Arc::new(SharedInput::new());
        let stop = Arc::new(AtomicBool::new(false));

        let publisher = presenter.share_publisher();
        let worker_input = Arc::clone(&input);
        let worker_stop = Arc::clone(&stop);

        let worker = thread::Builder::new()
            .name("render".to_string())
            .spawn(move || {
                let display = MemoryDisplay::new(pixel_time).with_publisher(publisher);
                let mut explorer = match Explorer::new(config, display, worker_input) {
                    Ok(explorer) => explorer,
                    Err(err) => {
                        log::error!("cannot start explorer: {}", err);
                        return;
                    }
                };

                while !worker_stop.load(Ordering::Relaxed) {
                    if let Err(err) = explorer.step_frame() {
                        log::error!("explorer stopped: {}", err);
                        break;
                    }
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("cannot spawn render thread: {}", err);
                None
            }
        };

        Self {
            presenter,
            input,
            keyboard: JoystickInputState::default(),
            stop,
            worker,
        }
    }

    pub fn handle_key(&mut self, key_code: KeyCode, state: ElementState) {
        self.keyboard.handle_key_event(key_code, state);
        self.input.store(self.keyboard.snapshot());
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn release_keys(&mut self) {
        self.keyboard.reset();
        self.input.store(self.keyboard.snapshot());
    }

    pub fn render(&mut self) -> Result<(), pixels::Error> {
        self.presenter.render()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.presenter.resize(width, height);
    }

    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::error!("render thread panicked");
            }
        }
    }
}

impl<T: GuiPresenterPort> Drop for GuiApp<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

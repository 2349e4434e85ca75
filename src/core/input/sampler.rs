use crate::core::input::shared::SharedInput;
use crate::core::input::snapshot::InputDevice;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Polls an [`InputDevice`] on a fixed period into a [`SharedInput`].
pub struct InputSampler {
    shared: Arc<SharedInput>,
    shutdown: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl InputSampler {
    pub fn spawn<D>(mut device: D, period: Duration) -> Self
    where
        D: InputDevice + 'static,
    {
        let shared = Arc::new(SharedInput::new());
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker_shared = Arc::clone(&shared);
        let worker_shutdown = Arc::clone(&shutdown);

        let worker = thread::Builder::new()
            .name("input".to_string())
            .spawn(move || {
                while !worker_shutdown.load(Ordering::Acquire) {
                    worker_shared.store(device.read());
                    thread::sleep(period);
                }
            })
            .ok();

        if worker.is_none() {
            log::warn!("failed to spawn input sampler; input stays centred");
        }

        Self {
            shared,
            shutdown,
            worker,
        }
    }

    /// Handle for the render side.
    #[must_use]
    pub fn input(&self) -> Arc<SharedInput> {
        Arc::clone(&self.shared)
    }

    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InputSampler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

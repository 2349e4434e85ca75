use crate::core::input::snapshot::{InputSnapshot, InputSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};

/// Latest input, written by one thread and read by another.
///
/// Each field is its own atomic, so a reader may see a mix of two
/// consecutive samples. That is fine for steering.
#[derive(Debug, Default)]
pub struct SharedInput {
    joystick_x: AtomicI8,
    joystick_y: AtomicI8,
    z: AtomicBool,
    c: AtomicBool,
}

impl SharedInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, snapshot: InputSnapshot) {
        self.joystick_x.store(snapshot.joystick_x, Ordering::Relaxed);
        self.joystick_y.store(snapshot.joystick_y, Ordering::Relaxed);
        self.z.store(snapshot.z, Ordering::Relaxed);
        self.c.store(snapshot.c, Ordering::Relaxed);
    }

    #[must_use]
    pub fn load(&self) -> InputSnapshot {
        InputSnapshot {
            joystick_x: self.joystick_x.load(Ordering::Relaxed),
            joystick_y: self.joystick_y.load(Ordering::Relaxed),
            z: self.z.load(Ordering::Relaxed),
            c: self.c.load(Ordering::Relaxed),
        }
    }
}

impl InputSource for SharedInput {
    fn snapshot(&self) -> InputSnapshot {
        self.load()
    }
}

impl InputSource for Arc<SharedInput> {
    fn snapshot(&self) -> InputSnapshot {
        self.load()
    }
}

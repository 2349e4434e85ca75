use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

struct SlotState<T> {
    item: Option<T>,
    closed: bool,
}

/// A depth-1 blocking slot between two threads.
///
/// `send` waits until the slot is empty, `recv` waits until it is full. At
/// most one value is ever in transit, so items are delivered strictly in the
/// order they were sent. Closing wakes every waiter; values already in the
/// slot can still be received.
pub struct Handshake<T> {
    state: Mutex<SlotState<T>>,
    changed: Condvar,
}

impl<T> Default for Handshake<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Handshake<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                item: None,
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until the slot is free, then stores `item`. Returns the item
    /// back if the handshake has been closed.
    pub fn send(&self, item: T) -> Result<(), T> {
        let mut guard = self.lock();

        while guard.item.is_some() && !guard.closed {
            guard = self
                .changed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if guard.closed {
            return Err(item);
        }

        guard.item = Some(item);
        drop(guard);
        self.changed.notify_all();

        Ok(())
    }

    /// Blocks until an item arrives. `None` once closed and drained.
    pub fn recv(&self) -> Option<T> {
        let mut guard = self.lock();

        loop {
            if let Some(item) = guard.item.take() {
                drop(guard);
                self.changed.notify_all();
                return Some(item);
            }

            if guard.closed {
                return None;
            }

            guard = self
                .changed
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn try_recv(&self) -> Option<T> {
        let item = self.lock().item.take();

        if item.is_some() {
            self.changed.notify_all();
        }

        item
    }

    /// Like [`Self::recv`] but gives up after `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut guard = self.lock();

        loop {
            if let Some(item) = guard.item.take() {
                drop(guard);
                self.changed.notify_all();
                return Some(item);
            }

            let now = Instant::now();
            if guard.closed || now >= deadline {
                return None;
            }

            guard = self
                .changed
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    pub fn close(&self) {
        self.lock().closed = true;
        self.changed.notify_all();
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    #[cfg(test)]
    pub fn is_occupied(&self) -> bool {
        self.lock().item.is_some()
    }
}

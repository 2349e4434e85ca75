/// Work the renderer may do instead of blocking on a busy output slot.
pub trait IdleWork {
    /// Performs one bounded unit of work and returns how many rows it
    /// covered. Zero means there is nothing left to do.
    fn do_idle_work(&mut self) -> usize;
}

/// Idle hook for configurations where waiting is simply waiting.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdleWork;

impl IdleWork for NoIdleWork {
    fn do_idle_work(&mut self) -> usize {
        0
    }
}

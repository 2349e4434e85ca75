use crate::core::data::fractal_buffer::FractalBuffer;
use std::fmt;
use std::time::Duration;

/// Names one of the two buffers a session owns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferSlot {
    A,
    B,
}

impl BufferSlot {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for BufferSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// A buffer on its way to or from the compute context. Whoever holds the job
/// holds the only reference to the buffer.
#[derive(Debug)]
pub struct ComputeJob {
    pub slot: BufferSlot,
    pub buffer: Box<FractalBuffer>,
}

/// Where compute passes run.
///
/// At most one job is outstanding at a time. A job handed to `dispatch`
/// comes back, with its pass complete, from exactly one of `poll`, `wait` or
/// `wait_timeout`.
pub trait ComputeContext {
    /// Hands a job over. Gives it back if the context can no longer accept work.
    fn dispatch(&mut self, job: ComputeJob) -> Result<(), ComputeJob>;

    /// Returns the finished job if it is ready, without blocking.
    fn poll(&mut self) -> Option<ComputeJob>;

    /// Blocks until the outstanding job is finished. `None` if there is no
    /// outstanding job or the context has gone away.
    fn wait(&mut self) -> Option<ComputeJob>;

    fn wait_timeout(&mut self, timeout: Duration) -> Option<ComputeJob>;

    /// Does up to `max_rows` rows of the outstanding job on the caller's
    /// thread. Returns the number of rows done.
    fn steal(&mut self, max_rows: usize) -> usize;
}

pub mod dual_core;
pub mod inline;
pub mod threaded;

use crate::controllers::explorer::ports::compute_context::{ComputeContext, ComputeJob};
use crate::core::fractals::mandelbrot::escape::EscapeEngine;
use std::time::Duration;

pub use dual_core::{DualCorePipeline, PipelineError};
pub use inline::InlineCompute;
pub use threaded::ThreadedCompute;

/// How compute passes are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputeMode {
    /// A dedicated compute thread next to the render thread.
    #[default]
    Threaded,
    /// Everything on the render thread; passes advance in idle time.
    Inline,
}

impl ComputeMode {
    #[must_use]
    pub fn build(self, engine: EscapeEngine) -> Box<dyn ComputeContext + Send> {
        match self {
            Self::Threaded => Box::new(ThreadedCompute::new(engine)),
            Self::Inline => Box::new(InlineCompute::new(engine)),
        }
    }
}

impl<C: ComputeContext + ?Sized> ComputeContext for Box<C> {
    fn dispatch(&mut self, job: ComputeJob) -> Result<(), ComputeJob> {
        (**self).dispatch(job)
    }

    fn poll(&mut self) -> Option<ComputeJob> {
        (**self).poll()
    }

    fn wait(&mut self) -> Option<ComputeJob> {
        (**self).wait()
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Option<ComputeJob> {
        (**self).wait_timeout(timeout)
    }

    fn steal(&mut self, max_rows: usize) -> usize {
        (**self).steal(max_rows)
    }
}

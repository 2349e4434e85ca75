use crate::controllers::explorer::ports::compute_context::{ComputeContext, ComputeJob};
use crate::core::fractals::mandelbrot::escape::EscapeEngine;
use std::time::{Duration, Instant};

/// Single-context compute: passes advance only when the render loop steals
/// rows, or when it waits and the remainder is finished on the spot.
pub struct InlineCompute {
    engine: EscapeEngine,
    pending: Option<ComputeJob>,
}

impl InlineCompute {
    #[must_use]
    pub fn new(engine: EscapeEngine) -> Self {
        Self {
            engine,
            pending: None,
        }
    }

    #[cfg(test)]
    pub fn rows_remaining(&self) -> usize {
        self.pending
            .as_ref()
            .map_or(0, |job| job.buffer.rows() - job.buffer.next_row())
    }
}

impl ComputeContext for InlineCompute {
    fn dispatch(&mut self, job: ComputeJob) -> Result<(), ComputeJob> {
        if self.pending.is_some() {
            return Err(job);
        }

        self.pending = Some(job);
        Ok(())
    }

    fn poll(&mut self) -> Option<ComputeJob> {
        if self.pending.as_ref()?.buffer.is_complete() {
            return self.pending.take();
        }

        None
    }

    fn wait(&mut self) -> Option<ComputeJob> {
        let mut job = self.pending.take()?;
        self.engine.generate(&mut job.buffer);
        Some(job)
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Option<ComputeJob> {
        let deadline = Instant::now() + timeout;

        loop {
            let job = self.pending.as_mut()?;
            if job.buffer.is_complete() {
                return self.pending.take();
            }

            if Instant::now() >= deadline {
                return None;
            }

            self.engine.generate_rows(&mut job.buffer, 1);
        }
    }

    fn steal(&mut self, max_rows: usize) -> usize {
        match self.pending.as_mut() {
            Some(job) => self.engine.generate_rows(&mut job.buffer, max_rows).rows_done,
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::explorer::ports::compute_context::BufferSlot;
    use crate::core::data::complex_rect::ComplexRect;
    use crate::core::data::fractal_buffer::{FractalBuffer, PassParams};

    fn job() -> ComputeJob {
        let params = PassParams {
            world_bounds: ComplexRect::from_bounds(-2.0, 1.0, -1.0, 1.0).unwrap(),
            max_iterations: 32,
            iteration_offset: 0,
            use_cycle_detection: false,
        };

        ComputeJob {
            slot: BufferSlot::A,
            buffer: Box::new(FractalBuffer::new(10, 6, params).unwrap()),
        }
    }

    #[test]
    fn steal_advances_the_pending_pass() {
        let mut compute = InlineCompute::new(EscapeEngine::default());
        compute.dispatch(job()).unwrap();

        assert_eq!(compute.steal(3), 3);
        assert_eq!(compute.rows_remaining(), 7);
        assert!(compute.poll().is_none());

        assert_eq!(compute.steal(100), 7);
        assert_eq!(compute.steal(100), 0);
        assert!(compute.poll().unwrap().buffer.is_complete());
    }

    #[test]
    fn steal_without_job_does_nothing() {
        let mut compute = InlineCompute::new(EscapeEngine::default());

        assert_eq!(compute.steal(5), 0);
    }

    #[test]
    fn wait_finishes_remaining_rows() {
        let mut compute = InlineCompute::new(EscapeEngine::default());
        compute.dispatch(job()).unwrap();
        compute.steal(4);

        let done = compute.wait().unwrap();

        assert!(done.buffer.is_complete());
        assert!(compute.wait().is_none());
    }

    #[test]
    fn second_dispatch_is_refused() {
        let mut compute = InlineCompute::new(EscapeEngine::default());
        compute.dispatch(job()).unwrap();

        assert!(compute.dispatch(job()).is_err());
    }

    #[test]
    fn wait_timeout_with_zero_duration_keeps_job() {
        let mut compute = InlineCompute::new(EscapeEngine::default());
        compute.dispatch(job()).unwrap();

        assert!(compute.wait_timeout(Duration::ZERO).is_none());
        assert!(compute.wait_timeout(Duration::from_secs(5)).is_some());
    }
}

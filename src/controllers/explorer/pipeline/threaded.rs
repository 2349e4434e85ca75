use crate::controllers::explorer::ports::compute_context::{ComputeContext, ComputeJob};
use crate::core::actions::handshake::Handshake;
use crate::core::data::fractal_buffer::FractalBuffer;
use crate::core::fractals::mandelbrot::escape::EscapeEngine;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

struct SharedState {
    jobs: Handshake<ComputeJob>,
    completed: Handshake<ComputeJob>,
}

/// Runs compute passes on one dedicated worker thread.
pub struct ThreadedCompute {
    shared: Arc<SharedState>,
    worker: Option<JoinHandle<()>>,
    outstanding: bool,
}

impl ThreadedCompute {
    #[must_use]
    pub fn new(engine: EscapeEngine) -> Self {
        Self::with_runner(move |buffer| engine.generate(buffer))
    }

    /// Uses `runner` to complete each pass instead of an [`EscapeEngine`].
    pub fn with_runner<F>(runner: F) -> Self
    where
        F: Fn(&mut FractalBuffer) + Send + 'static,
    {
        let shared = Arc::new(SharedState {
            jobs: Handshake::new(),
            completed: Handshake::new(),
        });

        let worker_shared = Arc::clone(&shared);

        let worker = thread::Builder::new()
            .name("compute".to_string())
            .spawn(move || Self::worker_loop(&worker_shared, &runner))
            .ok();

        if worker.is_none() {
            log::error!("failed to spawn compute thread");
            shared.jobs.close();
        }

        Self {
            shared,
            worker,
            outstanding: false,
        }
    }

    pub fn shutdown(&mut self) {
        self.shared.jobs.close();
        self.shared.completed.close();

        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }

    fn worker_loop<F>(shared: &SharedState, runner: &F)
    where
        F: Fn(&mut FractalBuffer),
    {
        while let Some(mut job) = shared.jobs.recv() {
            let start = Instant::now();
            runner(&mut job.buffer);

            log::trace!(
                "pass {} into buffer {} took {:?}",
                job.buffer.pass_id(),
                job.slot,
                start.elapsed()
            );

            if shared.completed.send(job).is_err() {
                return;
            }
        }
    }

    fn take_completed(&mut self, job: Option<ComputeJob>) -> Option<ComputeJob> {
        if job.is_some() {
            self.outstanding = false;
        }
        job
    }
}

impl ComputeContext for ThreadedCompute {
    fn dispatch(&mut self, job: ComputeJob) -> Result<(), ComputeJob> {
        self.shared.jobs.send(job)?;
        self.outstanding = true;
        Ok(())
    }

    fn poll(&mut self) -> Option<ComputeJob> {
        let job = self.shared.completed.try_recv();
        self.take_completed(job)
    }

    fn wait(&mut self) -> Option<ComputeJob> {
        if !self.outstanding {
            return None;
        }

        let job = self.shared.completed.recv();
        self.take_completed(job)
    }

    fn wait_timeout(&mut self, timeout: Duration) -> Option<ComputeJob> {
        if !self.outstanding {
            return None;
        }

        let job = self.shared.completed.recv_timeout(timeout);
        self.take_completed(job)
    }

    fn steal(&mut self, _max_rows: usize) -> usize {
        0
    }
}

impl Drop for ThreadedCompute {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::explorer::ports::compute_context::BufferSlot;
    use crate::core::data::complex_rect::ComplexRect;
    use crate::core::data::fractal_buffer::PassParams;

    fn job(pass_id: u64) -> ComputeJob {
        let params = PassParams {
            world_bounds: ComplexRect::from_bounds(-2.0, 1.0, -1.0, 1.0).unwrap(),
            max_iterations: 32,
            iteration_offset: 0,
            use_cycle_detection: false,
        };
        let mut buffer = FractalBuffer::new(8, 8, params).unwrap();
        buffer.begin_pass(params, pass_id).unwrap();

        ComputeJob {
            slot: BufferSlot::B,
            buffer: Box::new(buffer),
        }
    }

    #[test]
    fn completes_dispatched_job() {
        let mut compute = ThreadedCompute::new(EscapeEngine::default());

        compute.dispatch(job(1)).unwrap();
        let done = compute.wait().unwrap();

        assert!(done.buffer.is_complete());
        assert_eq!(done.buffer.pass_id(), 1);
        assert_eq!(done.slot, BufferSlot::B);
    }

    #[test]
    fn wait_without_job_returns_none() {
        let mut compute = ThreadedCompute::new(EscapeEngine::default());

        assert!(compute.wait().is_none());
        assert!(compute.wait_timeout(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn poll_does_not_block_on_slow_runner() {
        let mut compute = ThreadedCompute::with_runner(|buffer| {
            thread::sleep(Duration::from_millis(50));
            EscapeEngine::default().generate(buffer);
        });

        compute.dispatch(job(2)).unwrap();

        assert!(compute.poll().is_none());
        assert!(compute.wait_timeout(Duration::from_millis(1)).is_none());
        assert!(compute.wait().is_some());
    }

    #[test]
    fn steal_is_a_no_op() {
        let mut compute = ThreadedCompute::new(EscapeEngine::default());

        assert_eq!(compute.steal(10), 0);
    }

    #[test]
    fn dispatch_after_shutdown_returns_job() {
        let mut compute = ThreadedCompute::new(EscapeEngine::default());
        compute.shutdown();

        let rejected = compute.dispatch(job(3)).unwrap_err();

        assert_eq!(rejected.buffer.pass_id(), 3);
    }
}

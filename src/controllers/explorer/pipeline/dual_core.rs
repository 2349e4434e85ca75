use crate::controllers::explorer::ports::compute_context::{BufferSlot, ComputeContext, ComputeJob};
use crate::core::actions::stream_frame::ports::idle_work::IdleWork;
use crate::core::data::fractal_buffer::{FractalBuffer, FractalBufferError, PassParams};
use std::error::Error;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    JobInFlight { slot: BufferSlot },
    NoJobInFlight,
    Timeout { slot: BufferSlot },
    ComputeContextGone,
    InvalidPass(FractalBufferError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JobInFlight { slot } => {
                write!(f, "a compute pass into buffer {} is already in flight", slot)
            }
            Self::NoJobInFlight => write!(f, "no compute pass is in flight"),
            Self::Timeout { slot } => {
                write!(f, "timed out waiting for the pass into buffer {}", slot)
            }
            Self::ComputeContextGone => write!(f, "the compute context has shut down"),
            Self::InvalidPass(err) => write!(f, "invalid pass: {}", err),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPass(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FractalBufferError> for PipelineError {
    fn from(err: FractalBufferError) -> Self {
        Self::InvalidPass(err)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct InFlight {
    slot: BufferSlot,
    pass_id: u64,
}

/// Double buffering between the render loop and a [`ComputeContext`].
///
/// The pipeline owns the read buffer, and the spare buffer while no pass is
/// running. A pass moves the spare buffer into the compute context; the
/// buffers swap roles only once the finished buffer has come back, so the
/// render side can never see a buffer that is still being written.
pub struct DualCorePipeline<C: ComputeContext> {
    compute: C,
    read: Box<FractalBuffer>,
    read_slot: BufferSlot,
    spare: Option<Box<FractalBuffer>>,
    in_flight: Option<InFlight>,
    next_pass_id: u64,
    swaps: u64,
}

impl<C: ComputeContext> DualCorePipeline<C> {
    /// Allocates both buffers. Neither holds valid data until the first swap.
    pub fn new(
        compute: C,
        rows: usize,
        cols: usize,
        params: PassParams,
    ) -> Result<Self, FractalBufferError> {
        let read = Box::new(FractalBuffer::new(rows, cols, params)?);
        let spare = Box::new(FractalBuffer::new(rows, cols, params)?);

        Ok(Self {
            compute,
            read,
            read_slot: BufferSlot::A,
            spare: Some(spare),
            in_flight: None,
            next_pass_id: 1,
            swaps: 0,
        })
    }

    /// Starts a pass into the spare buffer and returns the slot being written.
    pub fn submit(&mut self, params: PassParams) -> Result<BufferSlot, PipelineError> {
        if let Some(in_flight) = self.in_flight {
            return Err(PipelineError::JobInFlight {
                slot: in_flight.slot,
            });
        }

        let Some(mut buffer) = self.spare.take() else {
            return Err(PipelineError::ComputeContextGone);
        };

        let pass_id = self.next_pass_id;
        if let Err(err) = buffer.begin_pass(params, pass_id) {
            self.spare = Some(buffer);
            return Err(err.into());
        }

        let slot = self.read_slot.other();
        if let Err(job) = self.compute.dispatch(ComputeJob { slot, buffer }) {
            self.spare = Some(job.buffer);
            return Err(PipelineError::ComputeContextGone);
        }

        self.next_pass_id += 1;
        self.in_flight = Some(InFlight { slot, pass_id });

        log::debug!(
            "submitted pass {} into buffer {}: {}x{} at ({}, {}) max {} offset {}{}",
            pass_id,
            slot,
            params.world_bounds.width(),
            params.world_bounds.height(),
            params.world_bounds.center().real,
            params.world_bounds.center().imag,
            params.max_iterations,
            params.iteration_offset,
            if params.use_cycle_detection { " with cycle detection" } else { "" }
        );

        Ok(slot)
    }

    /// Swaps if the in-flight pass has finished. Returns whether it did.
    pub fn poll_swap(&mut self) -> bool {
        if self.in_flight.is_none() {
            return false;
        }

        match self.compute.poll() {
            Some(job) => {
                self.complete_swap(job);
                true
            }
            None => false,
        }
    }

    /// Blocks until the in-flight pass finishes, then swaps.
    pub fn wait_swap(&mut self) -> Result<(), PipelineError> {
        if self.in_flight.is_none() {
            return Err(PipelineError::NoJobInFlight);
        }

        let job = self.compute.wait().ok_or(PipelineError::ComputeContextGone)?;
        self.complete_swap(job);

        Ok(())
    }

    pub fn wait_swap_timeout(&mut self, timeout: Duration) -> Result<(), PipelineError> {
        let Some(in_flight) = self.in_flight else {
            return Err(PipelineError::NoJobInFlight);
        };

        let job = self
            .compute
            .wait_timeout(timeout)
            .ok_or(PipelineError::Timeout {
                slot: in_flight.slot,
            })?;
        self.complete_swap(job);

        Ok(())
    }

    fn complete_swap(&mut self, job: ComputeJob) {
        debug_assert_eq!(
            self.in_flight.map(|f| (f.slot, f.pass_id)),
            Some((job.slot, job.buffer.pass_id()))
        );
        debug_assert!(job.buffer.is_complete());

        let previous = std::mem::replace(&mut self.read, job.buffer);
        self.spare = Some(previous);
        self.read_slot = job.slot;
        self.in_flight = None;
        self.swaps += 1;

        log::debug!(
            "swapped to buffer {} (pass {}): {} inside, min iteration {}",
            self.read_slot,
            self.read.pass_id(),
            self.read.count_inside(),
            self.read.min_iteration_seen()
        );
    }

    /// The buffer the render side may read.
    #[must_use]
    pub fn read(&self) -> &FractalBuffer {
        &self.read
    }

    #[must_use]
    pub fn read_slot(&self) -> BufferSlot {
        self.read_slot
    }

    /// Whether the read buffer holds a finished pass.
    #[must_use]
    pub fn has_valid_read(&self) -> bool {
        self.swaps > 0
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<BufferSlot> {
        self.in_flight.map(|f| f.slot)
    }

    #[must_use]
    pub fn swaps(&self) -> u64 {
        self.swaps
    }

    /// Borrows the read buffer alongside an idle-work hook that steals
    /// `steal_rows` rows of the in-flight pass per call.
    pub fn frame_parts(&mut self, steal_rows: usize) -> (&FractalBuffer, StealWork<'_, C>) {
        (
            &self.read,
            StealWork {
                compute: &mut self.compute,
                rows_per_call: steal_rows,
            },
        )
    }
}

/// Idle-time hook that advances the in-flight pass on the render thread.
pub struct StealWork<'a, C: ComputeContext> {
    compute: &'a mut C,
    rows_per_call: usize,
}

impl<C: ComputeContext> IdleWork for StealWork<'_, C> {
    fn do_idle_work(&mut self) -> usize {
        self.compute.steal(self.rows_per_call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::explorer::pipeline::inline::InlineCompute;
    use crate::controllers::explorer::pipeline::threaded::ThreadedCompute;
    use crate::core::data::complex_rect::ComplexRect;
    use crate::core::fractals::mandelbrot::escape::EscapeEngine;
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::thread;

    fn params(scale: f64) -> PassParams {
        PassParams {
            world_bounds: ComplexRect::from_bounds(-2.0 * scale, scale, -scale, scale).unwrap(),
            max_iterations: 64,
            iteration_offset: 0,
            use_cycle_detection: false,
        }
    }

    fn threaded_pipeline() -> DualCorePipeline<ThreadedCompute> {
        DualCorePipeline::new(ThreadedCompute::new(EscapeEngine::default()), 24, 24, params(1.0))
            .unwrap()
    }

    fn inline_pipeline() -> DualCorePipeline<InlineCompute> {
        DualCorePipeline::new(InlineCompute::new(EscapeEngine::default()), 24, 24, params(1.0))
            .unwrap()
    }

    #[test]
    fn first_swap_makes_read_buffer_valid() {
        let mut pipeline = threaded_pipeline();
        assert!(!pipeline.has_valid_read());

        let slot = pipeline.submit(params(1.0)).unwrap();
        assert_eq!(slot, BufferSlot::B);
        assert_eq!(pipeline.in_flight(), Some(BufferSlot::B));

        pipeline.wait_swap().unwrap();

        assert!(pipeline.has_valid_read());
        assert_eq!(pipeline.read_slot(), BufferSlot::B);
        assert_eq!(pipeline.read().pass_id(), 1);
        assert!(pipeline.read().is_complete());
        assert_eq!(pipeline.in_flight(), None);
    }

    #[test]
    fn slots_alternate_between_passes() {
        let mut pipeline = inline_pipeline();

        for expected in [BufferSlot::B, BufferSlot::A, BufferSlot::B] {
            assert_eq!(pipeline.submit(params(1.0)).unwrap(), expected);
            pipeline.wait_swap().unwrap();
            assert_eq!(pipeline.read_slot(), expected);
        }

        assert_eq!(pipeline.swaps(), 3);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let mut pipeline = threaded_pipeline();
        pipeline.submit(params(1.0)).unwrap();

        assert_eq!(
            pipeline.submit(params(0.5)),
            Err(PipelineError::JobInFlight {
                slot: BufferSlot::B
            })
        );

        pipeline.wait_swap().unwrap();
        assert!(pipeline.submit(params(0.5)).is_ok());
    }

    #[test]
    fn wait_without_submit_is_an_error() {
        let mut pipeline = inline_pipeline();

        assert_eq!(pipeline.wait_swap(), Err(PipelineError::NoJobInFlight));
        assert!(!pipeline.poll_swap());
    }

    #[test]
    fn invalid_pass_keeps_spare_buffer() {
        let mut pipeline = inline_pipeline();
        let bad = PassParams {
            iteration_offset: 64,
            ..params(1.0)
        };

        assert!(matches!(
            pipeline.submit(bad),
            Err(PipelineError::InvalidPass(_))
        ));
        assert!(pipeline.submit(params(1.0)).is_ok());
    }

    #[test]
    fn timeout_reports_slot_and_keeps_job_in_flight() {
        let compute = ThreadedCompute::with_runner(|buffer| {
            thread::sleep(Duration::from_millis(100));
            EscapeEngine::default().generate(buffer);
        });
        let mut pipeline = DualCorePipeline::new(compute, 8, 8, params(1.0)).unwrap();
        pipeline.submit(params(1.0)).unwrap();

        assert_eq!(
            pipeline.wait_swap_timeout(Duration::from_millis(1)),
            Err(PipelineError::Timeout {
                slot: BufferSlot::B
            })
        );
        assert_eq!(pipeline.in_flight(), Some(BufferSlot::B));
        assert!(pipeline.wait_swap().is_ok());
    }

    #[test]
    fn stealing_completes_inline_pass_incrementally() {
        let mut pipeline = inline_pipeline();
        pipeline.submit(params(1.0)).unwrap();

        let (_, mut work) = pipeline.frame_parts(5);
        assert_eq!(work.do_idle_work(), 5);
        assert_eq!(work.do_idle_work(), 5);
        assert!(!pipeline.poll_swap());

        let (_, mut work) = pipeline.frame_parts(100);
        assert_eq!(work.do_idle_work(), 14);
        assert!(pipeline.poll_swap());
        assert_eq!(pipeline.read().pass_id(), 1);
    }

    #[test]
    fn inline_and_threaded_produce_identical_buffers() {
        let mut threaded = threaded_pipeline();
        let mut inline = inline_pipeline();

        for scale in [1.0, 0.5, 0.25] {
            threaded.submit(params(scale)).unwrap();
            inline.submit(params(scale)).unwrap();
            inline.frame_parts(3).1.do_idle_work();

            threaded.wait_swap().unwrap();
            inline.wait_swap().unwrap();

            assert_eq!(threaded.read().data(), inline.read().data());
            assert_eq!(threaded.read().count_inside(), inline.read().count_inside());
        }
    }

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    enum PassState {
        Writing,
        Written,
    }

    #[derive(Debug, Clone)]
    enum Op {
        Submit,
        Poll,
        Wait,
        Read,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Submit),
            Just(Op::Poll),
            Just(Op::Wait),
            Just(Op::Read),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn render_side_never_reads_a_buffer_being_written(
            delays in proptest::collection::vec(0u64..3, 1..8),
            ops in proptest::collection::vec(op_strategy(), 1..40),
        ) {
            let ledger: Arc<Mutex<HashMap<u64, PassState>>> = Arc::new(Mutex::new(HashMap::new()));
            let runner_ledger = Arc::clone(&ledger);
            let delays = Arc::new(delays);
            let runner_delays = Arc::clone(&delays);

            let compute = ThreadedCompute::with_runner(move |buffer| {
                let pass_id = buffer.pass_id();
                runner_ledger.lock().unwrap().insert(pass_id, PassState::Writing);

                let delay = runner_delays[pass_id as usize % runner_delays.len()];
                thread::sleep(Duration::from_millis(delay));
                EscapeEngine::default().generate(buffer);
                thread::sleep(Duration::from_millis(delay));

                runner_ledger.lock().unwrap().insert(pass_id, PassState::Written);
            });
            let mut pipeline = DualCorePipeline::new(compute, 6, 6, params(1.0)).unwrap();

            for op in ops {
                match op {
                    Op::Submit => {
                        let was_in_flight = pipeline.in_flight().is_some();
                        let result = pipeline.submit(params(1.0));
                        prop_assert_eq!(result.is_err(), was_in_flight);
                    }
                    Op::Poll => {
                        pipeline.poll_swap();
                    }
                    Op::Wait => {
                        if pipeline.in_flight().is_some() {
                            pipeline.wait_swap().unwrap();
                        }
                    }
                    Op::Read => {}
                }

                if pipeline.has_valid_read() {
                    let read = pipeline.read();
                    let state = ledger.lock().unwrap().get(&read.pass_id()).copied();

                    prop_assert_eq!(state, Some(PassState::Written));
                    prop_assert!(read.is_complete());
                    if let Some(writing) = pipeline.in_flight() {
                        prop_assert_ne!(writing, pipeline.read_slot());
                    }
                }
            }
        }
    }
}

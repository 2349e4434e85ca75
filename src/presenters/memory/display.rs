use crate::controllers::explorer::ports::frame_publisher::FramePublisher;
use crate::core::actions::stream_frame::ports::display_sink::{DisplaySink, OutputSlot};
use crate::core::data::frame::DisplayFrame;
use crate::core::util::pixel_to_complex_coords::GridSize;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// A display held in memory.
///
/// Transfers share one link and complete in order: each takes
/// `pixel_time` per pixel, starting once the link is free. A slot is busy
/// until its last transfer has completed, which gives the renderer the same
/// busy/wait pattern a real panel would. Finished frames are kept and, when
/// a publisher is attached, handed on.
pub struct MemoryDisplay {
    pixel_time: Duration,
    grid: GridSize,
    staging: Vec<u16>,
    cursor: usize,
    link_free_at: Instant,
    slot_done_at: [Instant; 2],
    generation: u64,
    last_frame: Option<DisplayFrame>,
    publisher: Option<Arc<dyn FramePublisher>>,
}

impl MemoryDisplay {
    #[must_use]
    pub fn new(pixel_time: Duration) -> Self {
        let now = Instant::now();

        Self {
            pixel_time,
            grid: GridSize::new(0, 0),
            staging: Vec::new(),
            cursor: 0,
            link_free_at: now,
            slot_done_at: [now; 2],
            generation: 0,
            last_frame: None,
            publisher: None,
        }
    }

    /// A display whose transfers complete immediately.
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub fn with_publisher(mut self, publisher: Arc<dyn FramePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.last_frame.as_ref()
    }

    #[must_use]
    pub fn frames_completed(&self) -> u64 {
        self.generation
    }

    fn transfer(&mut self, slot: OutputSlot, pixels: usize) -> &mut [u16] {
        let start = self.link_free_at.max(Instant::now());
        let count = u32::try_from(pixels).unwrap_or(u32::MAX);
        let done = start + self.pixel_time * count;

        self.link_free_at = done;
        self.slot_done_at[slot.index()] = done;

        let begin = (self.cursor * self.grid.cols).min(self.staging.len());
        let end = (begin + pixels).min(self.staging.len());
        self.cursor += 1;

        &mut self.staging[begin..end]
    }
}

impl Default for MemoryDisplay {
    fn default() -> Self {
        Self::instant()
    }
}

impl DisplaySink for MemoryDisplay {
    fn begin_pixels(&mut self, rows: usize, cols: usize) {
        self.grid = GridSize::new(rows, cols);
        self.staging.clear();
        self.staging.resize(rows * cols, 0);
        self.cursor = 0;
    }

    fn slot_busy(&self, slot: OutputSlot) -> bool {
        Instant::now() < self.slot_done_at[slot.index()]
    }

    fn wait_slot(&mut self, slot: OutputSlot) {
        let remaining = self.slot_done_at[slot.index()].saturating_duration_since(Instant::now());

        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }

    fn queue_row(&mut self, slot: OutputSlot, pixels: &[u16]) {
        let target = self.transfer(slot, pixels.len());
        let len = target.len();
        target.copy_from_slice(&pixels[..len]);
    }

    fn repeat_pixel(&mut self, slot: OutputSlot, pixel: u16, count: usize) {
        self.transfer(slot, count).fill(pixel);
    }

    fn end_pixels(&mut self) {
        self.generation += 1;

        let pixels = std::mem::take(&mut self.staging);
        let frame = match DisplayFrame::from_pixels(self.grid, self.generation, pixels) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("dropping frame {}: {}", self.generation, err);
                return;
            }
        };

        if let Some(publisher) = &self.publisher {
            publisher.publish(&frame);
        }

        log::trace!("frame {} complete", self.generation);
        self.last_frame = Some(frame);
    }
}

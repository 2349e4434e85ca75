/// One of the two alternating output transfer slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutputSlot {
    First,
    Second,
}

impl OutputSlot {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A pixel display fed row by row through two transfer slots.
///
/// Transfers complete in the order they were queued. A slot is busy from the
/// moment something is queued on it until that transfer has drained.
pub trait DisplaySink {
    fn begin_pixels(&mut self, rows: usize, cols: usize);

    fn slot_busy(&self, slot: OutputSlot) -> bool;

    /// Blocks until `slot` has drained.
    fn wait_slot(&mut self, slot: OutputSlot);

    fn queue_row(&mut self, slot: OutputSlot, pixels: &[u16]);

    /// Sends `pixel` `count` times without a row buffer.
    fn repeat_pixel(&mut self, slot: OutputSlot, pixel: u16, count: usize);

    /// Waits for outstanding transfers and closes the pixel stream.
    fn end_pixels(&mut self);
}

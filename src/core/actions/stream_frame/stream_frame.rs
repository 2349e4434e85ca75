use crate::core::actions::stream_frame::ports::colour_map::ColourMap;
use crate::core::actions::stream_frame::ports::display_sink::{DisplaySink, OutputSlot};
use crate::core::actions::stream_frame::ports::idle_work::IdleWork;
use crate::core::actions::stream_frame::resample::Resample;
use crate::core::data::colour::Rgb565;
use crate::core::data::complex_rect::ComplexRect;
use crate::core::data::fractal_buffer::FractalBuffer;
use crate::core::util::pixel_to_complex_coords::GridSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderColours {
    /// Shown for pixels inside the set.
    pub background: Rgb565,
    /// Shown where the buffer does not cover the display.
    pub outside: Rgb565,
}

impl Default for RenderColours {
    fn default() -> Self {
        Self {
            background: Rgb565::BLACK,
            outside: Rgb565::from_channels(2, 4, 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub rows_sampled: usize,
    pub rows_blanked: usize,
    pub inside_pixels: usize,
    pub stolen_rows: usize,
    pub slot_waits: usize,
}

/// Streams resampled buffer views to a [`DisplaySink`].
///
/// Rows alternate between the two output slots, so one row can be prepared
/// while the previous one drains. When the next slot is still busy the
/// renderer hands the time to an [`IdleWork`] hook, and only blocks once the
/// hook has nothing left to do.
pub struct StreamingRenderer {
    display: GridSize,
    colours: RenderColours,
    row_buffers: [Vec<u16>; 2],
}

impl StreamingRenderer {
    #[must_use]
    pub fn new(display: GridSize, colours: RenderColours) -> Self {
        Self {
            display,
            colours,
            row_buffers: [vec![0; display.cols], vec![0; display.cols]],
        }
    }

    #[must_use]
    pub fn display(&self) -> GridSize {
        self.display
    }

    #[must_use]
    pub fn colours(&self) -> RenderColours {
        self.colours
    }

    pub fn stream_frame<S, M, W>(
        &mut self,
        sink: &mut S,
        buffer: &FractalBuffer,
        display_bounds: &ComplexRect,
        palette: &M,
        idle: &mut W,
    ) -> FrameStats
    where
        S: DisplaySink + ?Sized,
        M: ColourMap + ?Sized,
        W: IdleWork + ?Sized,
    {
        let resample = Resample::new(display_bounds, self.display, buffer);
        let covered_cols = resample.covered_cols();
        let outside = self.colours.outside.0;
        let background = self.colours.background.0;
        let mut stats = FrameStats::default();
        let mut slot = OutputSlot::First;

        sink.begin_pixels(self.display.rows, self.display.cols);

        for row in 0..self.display.rows {
            acquire_slot(sink, slot, idle, &mut stats);

            if resample.coverage.is_empty() || !resample.coverage.rows.contains(&row) {
                sink.repeat_pixel(slot, outside, self.display.cols);
                stats.rows_blanked += 1;
            } else {
                let pixels = &mut self.row_buffers[slot.index()];
                let source = buffer.row(resample.buffer_row(row));

                pixels[..covered_cols.start].fill(outside);
                pixels[covered_cols.end..].fill(outside);

                for (pixel, col) in pixels[covered_cols.clone()]
                    .iter_mut()
                    .zip(resample.buffer_cols())
                {
                    *pixel = match source[col] {
                        0 => {
                            stats.inside_pixels += 1;
                            background
                        }
                        value => palette.map(value).0,
                    };
                }

                sink.queue_row(slot, pixels);
                stats.rows_sampled += 1;
            }

            slot = slot.other();
        }

        sink.end_pixels();

        stats
    }
}

fn acquire_slot<S, W>(sink: &mut S, slot: OutputSlot, idle: &mut W, stats: &mut FrameStats)
where
    S: DisplaySink + ?Sized,
    W: IdleWork + ?Sized,
{
    while sink.slot_busy(slot) {
        let rows = idle.do_idle_work();
        stats.stolen_rows += rows;

        if rows == 0 {
            sink.wait_slot(slot);
            stats.slot_waits += 1;
            break;
        }
    }
}

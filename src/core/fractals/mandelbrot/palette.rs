use crate::core::actions::stream_frame::ports::colour_map::ColourMap;
use crate::core::data::colour::Rgb565;

const BLUE_RAMP_START: u8 = 0x01;
const GREEN_RAMP_START: u8 = 0x20;
const RED_RAMP_START: u8 = 0x80;
const BLUE_FADE_START: u8 = 0xa0;
const PALETTE_END: u8 = 0xe0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PaletteBand {
    BlueRamp,
    GreenRamp,
    RedRamp,
    BlueFade,
}

impl PaletteBand {
    #[must_use]
    pub fn of(value: u8) -> Self {
        match value.min(PALETTE_END - 1) {
            v if v < GREEN_RAMP_START => Self::BlueRamp,
            v if v < RED_RAMP_START => Self::GreenRamp,
            v if v < BLUE_FADE_START => Self::RedRamp,
            _ => Self::BlueFade,
        }
    }

    #[must_use]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Four contiguous bands over the iteration byte, each ramping one channel:
/// blue up, green up, red up, then blue back down. Every band starts one step
/// past the previous band's last colour. Values from 0xE0 upwards share the
/// last colour.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BandedPalette;

impl BandedPalette {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn band(&self, value: u8) -> PaletteBand {
        PaletteBand::of(value)
    }
}

impl ColourMap for BandedPalette {
    fn map(&self, value: u8) -> Rgb565 {
        let value = value.clamp(BLUE_RAMP_START, PALETTE_END - 1);

        match PaletteBand::of(value) {
            PaletteBand::BlueRamp => Rgb565::from_channels(0, 0, value),
            PaletteBand::GreenRamp => {
                let step = u16::from(value - GREEN_RAMP_START);
                let span = u16::from(RED_RAMP_START - GREEN_RAMP_START - 1);
                let green = 1 + step * u16::from(Rgb565::MAX_GREEN - 1) / span;
                Rgb565::from_channels(0, green as u8, Rgb565::MAX_BLUE)
            }
            PaletteBand::RedRamp => {
                let step = u16::from(value - RED_RAMP_START);
                let span = u16::from(BLUE_FADE_START - RED_RAMP_START - 1);
                let red = 1 + step * u16::from(Rgb565::MAX_RED - 1) / span;
                Rgb565::from_channels(red as u8, Rgb565::MAX_GREEN, Rgb565::MAX_BLUE)
            }
            PaletteBand::BlueFade => {
                let span = u16::from(PALETTE_END - BLUE_FADE_START - 1);
                let remaining = span - u16::from(value - BLUE_FADE_START);
                let blue = remaining * u16::from(Rgb565::MAX_BLUE - 1) / span;
                Rgb565::from_channels(Rgb565::MAX_RED, Rgb565::MAX_GREEN, blue as u8)
            }
        }
    }

    fn display_name(&self) -> &str {
        "Banded"
    }
}

/// 8-bit-per-channel colour, used when frames leave the display format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Native display colour: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(0xffff);

    pub const MAX_RED: u8 = 0x1f;
    pub const MAX_GREEN: u8 = 0x3f;
    pub const MAX_BLUE: u8 = 0x1f;

    /// Packs channel values; each is masked to its field width.
    #[must_use]
    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        let r = (r & Self::MAX_RED) as u16;
        let g = (g & Self::MAX_GREEN) as u16;
        let b = (b & Self::MAX_BLUE) as u16;
        Self((r << 11) | (g << 5) | b)
    }

    #[must_use]
    pub const fn red(self) -> u8 {
        ((self.0 >> 11) & 0x1f) as u8
    }

    #[must_use]
    pub const fn green(self) -> u8 {
        ((self.0 >> 5) & 0x3f) as u8
    }

    #[must_use]
    pub const fn blue(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    /// Expands to 8 bits per channel by replicating the high bits.
    #[must_use]
    pub const fn to_colour(self) -> Colour {
        let r = self.red();
        let g = self.green();
        let b = self.blue();
        Colour {
            r: (r << 3) | (r >> 2),
            g: (g << 2) | (g >> 4),
            b: (b << 3) | (b >> 2),
        }
    }
}

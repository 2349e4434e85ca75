use crate::core::data::colour::Rgb565;

/// Maps a nonzero iteration byte to a display colour.
///
/// Implementations must be total over `1..=255`; the renderer substitutes the
/// background colour for 0 before calling.
pub trait ColourMap {
    fn map(&self, value: u8) -> Rgb565;

    fn display_name(&self) -> &str;
}

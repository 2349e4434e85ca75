use crate::adapters::pixel_format::rgb565_to_rgb;
use crate::core::data::frame::DisplayFrame;
use std::io::Write;
use std::path::Path;

pub fn write_ppm(frame: &DisplayFrame, filepath: impl AsRef<Path>) -> std::io::Result<()> {
    let file = std::fs::File::create(filepath)?;
    let mut writer = std::io::BufWriter::new(file);

    encode_ppm(frame, &mut writer)?;
    writer.flush()
}

/// PPM header: P6 means binary RGB, then width height max_colour.
pub fn encode_ppm(frame: &DisplayFrame, out: &mut impl Write) -> std::io::Result<()> {
    let grid = frame.grid();

    writeln!(out, "P6")?;
    writeln!(out, "{} {}", grid.cols, grid.rows)?;
    writeln!(out, "255")?;
    out.write_all(&rgb565_to_rgb(frame.pixels()))?;

    Ok(())
}

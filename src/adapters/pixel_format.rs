//! Pixel format conversion helpers for presentation adapters.

use crate::core::data::colour::Rgb565;

/// Expands RGB565 pixels to packed RGB, 3 bytes per pixel.
#[must_use]
pub fn rgb565_to_rgb(src: &[u16]) -> Vec<u8> {
    let mut dst = Vec::with_capacity(src.len() * 3);

    for pixel in src {
        let colour = Rgb565(*pixel).to_colour();
        dst.extend_from_slice(&[colour.r, colour.g, colour.b]);
    }

    dst
}

/// Copies RGB565 pixel data to RGBA format, setting alpha to 255.
///
/// # Panics
/// Panics if `dst.len()` is not `src.len() * 4`.
pub fn copy_rgb565_to_rgba(src: &[u16], dst: &mut [u8]) {
    let expected_dst_len = src.len() * 4;
    assert_eq!(
        dst.len(),
        expected_dst_len,
        "dst length {} does not match expected {}",
        dst.len(),
        expected_dst_len
    );

    for (src_pixel, dst_pixel) in src.iter().zip(dst.chunks_exact_mut(4)) {
        let colour = Rgb565(*src_pixel).to_colour();
        dst_pixel[0] = colour.r;
        dst_pixel[1] = colour.g;
        dst_pixel[2] = colour.b;
        dst_pixel[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_to_rgb_known_values() {
        let src = vec![0xf800, 0x07e0, 0x001f, 0xffff, 0x0000];

        assert_eq!(
            rgb565_to_rgb(&src),
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255, 0, 0, 0]
        );
    }

    #[test]
    fn test_copy_rgb565_to_rgba_known_values() {
        let src = vec![0xf800, 0x001f];
        let mut dst = vec![0; 8];

        copy_rgb565_to_rgba(&src, &mut dst);

        assert_eq!(dst, vec![255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn test_copy_rgb565_to_rgba_empty_buffers() {
        let src: Vec<u16> = vec![];
        let mut dst: Vec<u8> = vec![];

        copy_rgb565_to_rgba(&src, &mut dst);

        assert!(dst.is_empty());
    }

    #[test]
    #[should_panic(expected = "does not match expected")]
    fn test_copy_rgb565_to_rgba_rejects_wrong_length() {
        let mut dst = vec![0; 3];

        copy_rgb565_to_rgba(&[0x1234], &mut dst);
    }
}

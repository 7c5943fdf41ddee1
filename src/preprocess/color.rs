//! Luma/chroma split for luminance-only enhancement.
//!
//! Uses full-range BT.601 YCbCr so chroma planes pass through untouched while
//! the luma plane is equalized.

use crate::util::math::saturate_u8;
use image::{GrayImage, Luma, Rgb, RgbImage};

/// Splits RGB into Y, Cb and Cr planes.
pub(crate) fn split_ycbcr(src: &RgbImage) -> [GrayImage; 3] {
    let (width, height) = src.dimensions();
    let mut y_plane = GrayImage::new(width, height);
    let mut cb_plane = GrayImage::new(width, height);
    let mut cr_plane = GrayImage::new(width, height);
    for (x, y, pixel) in src.enumerate_pixels() {
        let [r, g, b] = pixel.0.map(f32::from);
        let luma = 0.299 * r + 0.587 * g + 0.114 * b;
        let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
        let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
        y_plane.put_pixel(x, y, Luma([saturate_u8(luma)]));
        cb_plane.put_pixel(x, y, Luma([saturate_u8(cb)]));
        cr_plane.put_pixel(x, y, Luma([saturate_u8(cr)]));
    }
    [y_plane, cb_plane, cr_plane]
}

/// Reassembles RGB from Y, Cb and Cr planes of equal size.
pub(crate) fn merge_ycbcr(planes: &[GrayImage; 3]) -> RgbImage {
    let [y_plane, cb_plane, cr_plane] = planes;
    RgbImage::from_fn(y_plane.width(), y_plane.height(), |x, y| {
        let luma = y_plane.get_pixel(x, y).0[0] as f32;
        let cb = cb_plane.get_pixel(x, y).0[0] as f32 - 128.0;
        let cr = cr_plane.get_pixel(x, y).0[0] as f32 - 128.0;
        Rgb([
            saturate_u8(luma + 1.402 * cr),
            saturate_u8(luma - 0.344_136 * cb - 0.714_136 * cr),
            saturate_u8(luma + 1.772 * cb),
        ])
    })
}

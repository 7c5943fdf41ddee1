//! Template rotation about the image center.

use crate::util::math::sin_cos_deg;
use image::{GrayImage, Luma};
use std::borrow::Cow;

/// Rotates a grayscale template using bilinear sampling.
///
/// Rotation is performed about the image center with
/// `cx = (w - 1) / 2` and `cy = (h - 1) / 2` in floating-point coordinates.
/// Each destination pixel center `(x, y)` is mapped to the source coordinate
/// using inverse rotation. Samples outside the source bounds are filled with
/// `fill`. The output image has the same dimensions as the input.
///
/// An angle of exactly zero borrows the input unchanged.
pub fn rotate_gray_bilinear(src: &GrayImage, angle_deg: f32, fill: u8) -> Cow<'_, GrayImage> {
    if angle_deg == 0.0 {
        return Cow::Borrowed(src);
    }
    let (w, h) = src.dimensions();
    let width = w as usize;
    let height = h as usize;
    let data = src.as_raw();

    let (sin_a, cos_a) = sin_cos_deg(angle_deg);
    let cx = (width as f32 - 1.0) * 0.5;
    let cy = (height as f32 - 1.0) * 0.5;
    let max_x = width as f32 - 1.0;
    let max_y = height as f32 - 1.0;

    let out = GrayImage::from_fn(w, h, |x, y| {
        let dx = x as f32 - cx;
        let dy = y as f32 - cy;
        let src_x = cos_a * dx + sin_a * dy + cx;
        let src_y = -sin_a * dx + cos_a * dy + cy;

        let epsilon = 1e-6;
        if !src_x.is_finite()
            || !src_y.is_finite()
            || src_x < -epsilon
            || src_y < -epsilon
            || src_x > max_x + epsilon
            || src_y > max_y + epsilon
        {
            return Luma([fill]);
        }

        let src_x = src_x.clamp(0.0, max_x);
        let src_y = src_y.clamp(0.0, max_y);
        let x0 = src_x.floor() as usize;
        let y0 = src_y.floor() as usize;
        let x1 = (x0 + 1).min(width - 1);
        let y1 = (y0 + 1).min(height - 1);
        let fx = src_x - x0 as f32;
        let fy = src_y - y0 as f32;

        let a = data[y0 * width + x0] as f32;
        let b = data[y0 * width + x1] as f32;
        let c = data[y1 * width + x0] as f32;
        let d = data[y1 * width + x1] as f32;

        let value = a * (1.0 - fx) * (1.0 - fy) + b * fx * (1.0 - fy) + c * (1.0 - fx) * fy + d * fx * fy;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    });

    Cow::Owned(out)
}
